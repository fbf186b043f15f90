pub mod api;
pub mod config;
pub mod error;
pub mod geo;
pub mod models;
pub mod observability;
pub mod routing;
pub mod shipments;
pub mod state;
pub mod store;
