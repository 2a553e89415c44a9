// src/lib.rs
pub mod types;
pub mod config;
pub mod metrics;
pub mod publishing;
pub mod providers;
pub mod snapshot;
pub mod signal;
pub mod risk;
pub mod monitor;
