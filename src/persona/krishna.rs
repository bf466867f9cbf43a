// src/persona/krishna.rs
//! Fixed markers of the Krishna prompt document.
//!
//! These are part of the behavioral contract with the downstream model: the
//! instruction template tells it where the prior conversation ends and where
//! the current question lives. User text is interpolated verbatim around
//! them, with no escaping, so a message containing one of these lines will
//! collide with the markers.

/// Speaker label for persona turns in the rendered history block.
pub const PERSONA_LABEL: &str = "KRISHNA";

pub const HISTORY_OPEN: &str = "=== CONVERSACIÓN PREVIA ===";
pub const HISTORY_CLOSE: &str = "=== FIN DE CONVERSACIÓN PREVIA ===";

pub const QUESTION_CLOSE: &str = "--- FIN DE LA PREGUNTA ---";
