//! # RQA Common Library
//!
//! Shared code for the three RQA microservices:
//! - Error and result types
//! - Configuration resolution (CLI → ENV → TOML → compiled defaults)
//! - Tracing initialization and graceful shutdown
//! - API wire types exchanged between services
//! - Knowledge store HTTP client
//! - Text helpers used by the scoring heuristics

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod shutdown;
pub mod text;

pub use client::KnowledgeStoreClient;
pub use error::{Error, Result};
