pub mod config;
pub mod dataset;
pub mod driver;
pub mod engine;
pub mod error;
pub mod orchestrator;
pub mod record;
pub mod types;
pub mod validate;
// cmd and reports are binary modules (see main.rs).
