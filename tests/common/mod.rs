#![allow(dead_code)]

pub mod deployment_client;
pub mod test_app;
