//! Grammatical-gender lookup for the caller's name.
//!
//! One Gemini call, one rotated key. The result only picks the honorific
//! ("querido"/"querida") in the persona prompt, so a failed lookup is never
//! worth failing the chat over: any error defaults to masculine.

use std::sync::Arc;
use tracing::warn;

use crate::keys::KeyRotator;
use crate::llm::client::{GenerationOptions, LlmError, TextGenerator};

const GENDER_INSTRUCTION: &str = "Analiza el siguiente nombre y determina el género (masculino o femenino) de la persona. Responde únicamente con \"masculino\" o \"femenino\".";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Masculine,
    Feminine,
}

impl Gender {
    /// Map the endpoint's answer to a tag. Only an exact (trimmed,
    /// lowercased) "femenino" counts as feminine; anything else - empty,
    /// multi-token, or off-script - is masculine.
    pub fn from_response(text: &str) -> Self {
        if text.trim().to_lowercase() == "femenino" {
            Gender::Feminine
        } else {
            Gender::Masculine
        }
    }

    pub fn honorific(&self) -> &'static str {
        match self {
            Gender::Masculine => "querido",
            Gender::Feminine => "querida",
        }
    }
}

pub struct GenderClassifier {
    generator: Arc<dyn TextGenerator>,
    rotator: Arc<KeyRotator>,
}

impl GenderClassifier {
    pub fn new(generator: Arc<dyn TextGenerator>, rotator: Arc<KeyRotator>) -> Self {
        Self { generator, rotator }
    }

    /// Fail-open wrapper: the default-to-masculine policy lives here and
    /// nowhere else.
    pub async fn classify(&self, name: &str) -> Gender {
        match self.try_classify(name).await {
            Ok(gender) => gender,
            Err(e) => {
                warn!("Gender classification failed for '{}', defaulting to masculine: {}", name, e);
                Gender::Masculine
            }
        }
    }

    async fn try_classify(&self, name: &str) -> Result<Gender, LlmError> {
        let key = self.rotator.next();
        let prompt = format!("{} Nombre: {}", GENDER_INSTRUCTION, name);
        // No generation overrides on this call; the endpoint defaults apply
        let text = self
            .generator
            .generate(&key.secret, &prompt, &GenerationOptions::default())
            .await?;
        Ok(Gender::from_response(&text))
    }
}
