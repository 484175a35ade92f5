//! API route declarations

pub mod manage_routes;
