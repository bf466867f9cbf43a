//! Chat module - orchestration of persona replies
//!
//! Sequences gender lookup, prompt assembly, key rotation, and the Gemini
//! call, and folds every failure into one fixed fallback string.

pub mod service;
pub mod types;

// Re-export key types for external use
pub use service::{ChatService, FALLBACK_MESSAGE};
pub use types::{ChatTurn, Speaker};
