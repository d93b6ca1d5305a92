//! HTTP API handlers for rqa-ks

pub mod health;
pub mod interactions;
pub mod knowledge;
pub mod search;
pub mod validate;

pub use health::health_routes;
pub use interactions::interaction_routes;
pub use knowledge::knowledge_routes;
pub use search::search_routes;
pub use validate::validate_routes;
