// src/chat/service.rs
// The orchestrator behind the caller-facing API. `respond` always resolves
// to a string: either the model's reply, untouched, or the fixed fallback.

use std::sync::Arc;
use tracing::{error, info};

use crate::chat::types::ChatTurn;
use crate::keys::KeyRotator;
use crate::llm::client::{GenerationOptions, LlmError, TextGenerator};
use crate::llm::gender::GenderClassifier;
use crate::prompt::build_krishna_prompt;

/// Shown to the user whenever generation fails, whatever the cause.
pub const FALLBACK_MESSAGE: &str = "Lo siento, algo salió mal. Por favor, inténtalo de nuevo.";

pub struct ChatService {
    generator: Arc<dyn TextGenerator>,
    rotator: Arc<KeyRotator>,
    classifier: GenderClassifier,
    options: GenerationOptions,
}

impl ChatService {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        rotator: Arc<KeyRotator>,
        options: GenerationOptions,
    ) -> Self {
        let classifier = GenderClassifier::new(generator.clone(), rotator.clone());
        Self {
            generator,
            rotator,
            classifier,
            options,
        }
    }

    /// Produce the persona's reply to `message`. Never returns an error:
    /// any failure is logged and collapsed into [`FALLBACK_MESSAGE`].
    pub async fn respond(&self, message: &str, name: &str, history: &[ChatTurn]) -> String {
        match self.try_respond(message, name, history).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("Chat generation failed: {}", e);
                FALLBACK_MESSAGE.to_string()
            }
        }
    }

    /// Single attempt, two dependent calls: the gender lookup must resolve
    /// before the prompt can be assembled. Each call consumes one rotated
    /// key; there is no retry and no mid-call rotation.
    async fn try_respond(
        &self,
        message: &str,
        name: &str,
        history: &[ChatTurn],
    ) -> Result<String, LlmError> {
        let gender = self.classifier.classify(name).await;
        let prompt = build_krishna_prompt(message, name, gender, history);

        let key = self.rotator.next();
        info!("Generating reply with API key: {}", key.label);
        self.generator
            .generate(&key.secret, &prompt, &self.options)
            .await
    }
}
