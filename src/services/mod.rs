// src/services/mod.rs
pub mod history;
pub mod query_builder;
pub mod renderer;
pub mod report_client;
pub mod session_manager;
