pub mod auth;
pub mod controller;
pub mod routes;
pub mod util;
