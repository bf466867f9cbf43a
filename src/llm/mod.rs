// src/llm/mod.rs
// LLM module exports and submodule declarations

pub mod client;
pub mod gender;

// Export the main client and the generation seam
pub use client::{GeminiClient, GenerationOptions, LlmError, TextGenerator};
pub use gender::{Gender, GenderClassifier};
