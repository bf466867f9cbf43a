// src/keys/mod.rs
// Round-robin handout of Gemini API keys. Every outbound call consumes one
// key; the cursor advances modulo the pool size, so with more than one key
// the same key is never handed out twice in a row.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// A named Gemini API key. The label is only used for logging and the
/// `/status` endpoint; the secret never leaves the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKey {
    pub label: String,
    pub secret: String,
}

impl ApiKey {
    /// Parse the `GEMINI_API_KEYS` value: comma-separated `label:secret`
    /// pairs. Empty entries are skipped; a pair without a secret is a
    /// configuration error.
    pub fn parse_list(raw: &str) -> Result<Vec<ApiKey>> {
        let mut keys = Vec::new();
        for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (label, secret) = entry
                .split_once(':')
                .with_context(|| format!("invalid API key entry '{}', expected label:secret", entry))?;
            let label = label.trim();
            let secret = secret.trim();
            if label.is_empty() || secret.is_empty() {
                bail!("invalid API key entry '{}', expected label:secret", entry);
            }
            keys.push(ApiKey {
                label: label.to_string(),
                secret: secret.to_string(),
            });
        }
        Ok(keys)
    }
}

/// Snapshot of the rotation state, served at `GET /status`.
#[derive(Debug, Clone, Serialize)]
pub struct RotationStatus {
    pub next_key: String,
    pub total_keys: usize,
}

/// Deterministic round-robin over a fixed key pool. The cursor is atomic, so
/// concurrent callers still see strict round-robin order in aggregate.
pub struct KeyRotator {
    keys: Vec<ApiKey>,
    cursor: AtomicUsize,
}

impl KeyRotator {
    /// An empty pool is fatal; callers check this at startup, not per call.
    pub fn new(keys: Vec<ApiKey>) -> Result<Self> {
        if keys.is_empty() {
            bail!("no Gemini API keys configured (set GEMINI_API_KEYS)");
        }
        Ok(Self {
            keys,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Returns the key at the cursor, then advances the cursor by one.
    pub fn next(&self) -> &ApiKey {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.keys.len();
        let key = &self.keys[index];
        debug!("Using API key: {}", key.label);
        key
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub fn status(&self) -> RotationStatus {
        let next = self.cursor.load(Ordering::Relaxed) % self.keys.len();
        RotationStatus {
            next_key: self.keys[next].label.clone(),
            total_keys: self.keys.len(),
        }
    }
}
