//! HTTP API handlers for rqa-va

pub mod health;
pub mod metrics;
pub mod validate;

pub use health::health_routes;
pub use metrics::metrics_routes;
pub use validate::validate_routes;
