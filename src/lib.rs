pub mod capability_probe;
pub mod config;
pub mod credential;
pub mod error;
pub mod local_health_probe;
pub mod models;
pub mod probe;
pub mod report;
pub mod runner;
pub mod service;
pub mod session_probe;
pub mod transport;

