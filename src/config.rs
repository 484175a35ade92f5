//! Process configuration, read once at startup from the environment (and `.env`).

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

const ENV_PREFIX: &str = "MANAGE_BRIDGE_";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(String),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

/// The shared bearer secret. Never printed.
#[derive(Clone)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: key("API_TOKEN"),
                reason: "token must not be empty".into(),
            });
        }
        Ok(Self(token))
    }

    /// Full `Authorization` header value a caller must present.
    pub fn expected_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(***)")
    }
}

/// Where the Kubernetes credentials come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KubeMode {
    /// Local kubeconfig, like `kubectl` with its default context.
    #[default]
    Kubeconfig,
    /// Service-account credentials mounted into the pod.
    InCluster,
    /// Whatever kube detects first (in-cluster env, then kubeconfig).
    Infer,
}

impl FromStr for KubeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kubeconfig" | "local" => Ok(KubeMode::Kubeconfig),
            "in-cluster" | "incluster" => Ok(KubeMode::InCluster),
            "infer" => Ok(KubeMode::Infer),
            other => Err(format!(
                "unknown mode '{other}' (expected kubeconfig, in-cluster or infer)"
            )),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct KubeSettings {
    pub mode: KubeMode,
    /// Kubeconfig context override; ignored outside kubeconfig mode.
    pub context: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub api_token: ApiToken,
    pub kube: KubeSettings,
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Loads `.env` (if present) and then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(&key(name))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_token = get("API_TOKEN")
            .ok_or_else(|| ConfigError::Missing(key("API_TOKEN")))
            .and_then(ApiToken::new)?;

        let host = get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                key: key("PORT"),
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let mode = match get("KUBE_MODE") {
            Some(raw) => raw.parse::<KubeMode>().map_err(|reason| ConfigError::Invalid {
                key: key("KUBE_MODE"),
                reason,
            })?,
            None => KubeMode::default(),
        };

        Ok(Self {
            host,
            port,
            api_token,
            kube: KubeSettings {
                mode,
                context: get("KUBE_CONTEXT"),
            },
            log_dir: get("LOG_DIR").map(PathBuf::from),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn key(name: &str) -> String {
    format!("{ENV_PREFIX}{name}")
}
