// src/persona/mod.rs
// Persona text for the Krishna voice. Only one persona exists today; the
// module split keeps the fixed text apart from the assembly logic.

pub mod krishna;

pub use krishna::{HISTORY_CLOSE, HISTORY_OPEN, PERSONA_LABEL, QUESTION_CLOSE};
