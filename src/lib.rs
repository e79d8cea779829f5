pub mod config;
pub mod error;
pub mod pace;
pub mod pipeline;
pub mod routes;
pub mod state;
pub mod training;
pub mod types;
