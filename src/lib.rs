//! Library exports for appmon, shared between the binary and tests.

pub mod config;
pub mod constants;
pub mod metrics;
pub mod models;
pub mod routes;
pub mod services;
pub mod startup;
pub mod state;
pub mod utils;
