//! HTTP bridge that turns scale / restart / status / update_resources requests into
//! Kubernetes Deployment API calls, gated by a shared bearer token.

pub mod api;
pub mod app_state;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod routes;
pub mod startup;
