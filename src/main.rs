// src/main.rs

use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use krishnai::api::{create_router, AppState};
use krishnai::chat::ChatService;
use krishnai::config::CONFIG;
use krishnai::keys::{ApiKey, KeyRotator};
use krishnai::llm::{GeminiClient, GenerationOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::new(&CONFIG.log_level))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting KrishnAI chat service");
    info!("Model: {}", CONFIG.model);

    // An empty or malformed key pool is fatal here, not at request time
    let keys = ApiKey::parse_list(&CONFIG.gemini_api_keys)?;
    let rotator = Arc::new(KeyRotator::new(keys)?);
    info!("Credential pool loaded: {} keys", rotator.key_count());

    let client = Arc::new(GeminiClient::new(
        CONFIG.gemini_base_url.clone(),
        CONFIG.model.clone(),
        CONFIG.request_timeout(),
    ));
    let options = GenerationOptions {
        max_output_tokens: Some(CONFIG.max_output_tokens),
        temperature: Some(CONFIG.temperature),
    };
    let chat = ChatService::new(client, rotator.clone(), options);
    let state = Arc::new(AppState { chat, rotator });

    let app = create_router(state);
    let bind_address = CONFIG.bind_address();
    info!("Listening on {}", bind_address);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
