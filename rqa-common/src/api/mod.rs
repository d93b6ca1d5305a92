//! Shared API types
//!
//! Wire types exchanged between the RQA services.

pub mod types;

pub use types::{AnswerSource, KnowledgeMatch, MemoryAnswer, MemoryOrigin};
