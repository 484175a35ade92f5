pub mod manage_service;
pub mod patches;
