// src/prompt/mod.rs

pub mod builder;

pub use builder::{build_krishna_prompt, CONTEXT_WINDOW_TURNS};
