// src/config/mod.rs
// All tunables come from the environment; secrets are never embedded in source.

use once_cell::sync::Lazy;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct KrishnaiConfig {
    // ── Gemini Configuration
    pub gemini_base_url: String,
    pub model: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
    pub request_timeout_secs: u64,

    // ── Credentials (label:secret pairs, comma-separated)
    pub gemini_api_keys: String,

    // ── Server Configuration
    pub host: String,
    pub port: u16,

    // ── Logging Configuration
    pub log_level: String,
}

fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => {
            // Tolerate trailing comments and whitespace in .env values
            let clean_val = val.split('#').next().unwrap_or("").trim();
            match clean_val.parse::<T>() {
                Ok(parsed) => parsed,
                Err(_) => {
                    eprintln!("Config: {} = '{}' (parse failed, using default)", key, val);
                    default
                }
            }
        }
        Err(_) => default,
    }
}

impl KrishnaiConfig {
    pub fn from_env() -> Self {
        // Load from .env file first if it exists
        if dotenvy::dotenv().is_err() {
            eprintln!("Warning: .env file not found. Using environment variables and defaults.");
        }

        Self {
            gemini_base_url: env_var_or(
                "GEMINI_BASE_URL",
                "https://generativelanguage.googleapis.com".to_string(),
            ),
            model: env_var_or("GEMINI_MODEL", "gemini-1.5-flash".to_string()),
            max_output_tokens: env_var_or("KRISHNAI_MAX_OUTPUT_TOKENS", 1200),
            temperature: env_var_or("KRISHNAI_TEMPERATURE", 0.1),
            request_timeout_secs: env_var_or("GEMINI_TIMEOUT_SECS", 30),
            gemini_api_keys: env_var_or("GEMINI_API_KEYS", String::new()),
            host: env_var_or("KRISHNAI_HOST", "0.0.0.0".to_string()),
            port: env_var_or("KRISHNAI_PORT", 3000),
            log_level: env_var_or("KRISHNAI_LOG_LEVEL", "info".to_string()),
        }
    }

    /// Get server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Per-request timeout for Gemini calls
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// Global config instance - loaded once at startup
pub static CONFIG: Lazy<KrishnaiConfig> = Lazy::new(KrishnaiConfig::from_env);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_var_uses_default() {
        let value: u32 = env_var_or("KRISHNAI_TEST_UNSET_VAR", 7);
        assert_eq!(value, 7);
    }

    #[test]
    fn test_bind_address() {
        let config = KrishnaiConfig {
            gemini_base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-1.5-flash".to_string(),
            max_output_tokens: 1200,
            temperature: 0.1,
            request_timeout_secs: 30,
            gemini_api_keys: String::new(),
            host: "127.0.0.1".to_string(),
            port: 3000,
            log_level: "info".to_string(),
        };
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }
}
