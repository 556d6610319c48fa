pub mod app;
pub mod coerce;
pub mod config;
pub mod navigator;
pub mod prompt;
pub mod registry;
pub mod shared;
pub mod store;
