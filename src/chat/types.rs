// src/chat/types.rs

use serde::{Deserialize, Serialize};

/// One turn of the dialogue, as recorded by the caller. The core never
/// mutates history; it only reads a bounded window of it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatTurn {
    pub speaker: Speaker,
    pub text: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Persona,
}
