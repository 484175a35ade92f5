use std::sync::Arc;

use manage_bridge::app_state::build_app_state;
use manage_bridge::config::ApiToken;
use manage_bridge::startup::run;
use serde_json::Value;
use tokio::net::TcpListener;

use crate::common::deployment_client::RecordingDeploymentClient;

pub const API_TOKEN: &str = "test-token";

pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub cluster: Arc<RecordingDeploymentClient>,
    server_handle: tokio::task::JoinHandle<anyhow::Result<()>>,
}

impl TestApp {
    pub async fn manage(&self, body: &Value) -> reqwest::Response {
        self.manage_with_auth(body, Some(format!("Bearer {API_TOKEN}").as_str()))
            .await
    }

    pub async fn manage_with_auth(&self, body: &Value, authorization: Option<&str>) -> reqwest::Response {
        let mut request = self.api_client.post(format!("{}/manage", self.address)).json(body);
        if let Some(value) = authorization {
            request = request.header(reqwest::header::AUTHORIZATION, value);
        }
        request.send().await.expect("Failed to execute request.")
    }

    pub async fn manage_raw(&self, body: &'static str) -> reqwest::Response {
        self.api_client
            .post(format!("{}/manage", self.address))
            .bearer_auth(API_TOKEN)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.server_handle.abort();
    }
}

pub async fn spawn_test_app(cluster: RecordingDeploymentClient) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let cluster = Arc::new(cluster);
    let state = build_app_state(cluster.clone(), ApiToken::new(API_TOKEN).unwrap());
    let server_handle = tokio::spawn(run(listener, state));

    TestApp {
        address: format!("http://127.0.0.1:{port}"),
        api_client: reqwest::Client::new(),
        cluster,
        server_handle,
    }
}
