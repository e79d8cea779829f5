pub mod activity;
pub mod aggregate;
pub mod geo;
