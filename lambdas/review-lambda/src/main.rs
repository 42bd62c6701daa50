use lambda_runtime::{run, service_fn, Error};
use std::sync::Arc;

mod handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        // Lambda log lines already carry a timestamp
        .without_time()
        .init();

    let state = Arc::new(amity_shared::AppState::from_env().await);
    let moderation_client =
        Arc::new(moderation_block::client::ModerationApiClient::from_env());

    tracing::info!("🚀 Review worker starting");

    run(service_fn(move |event| {
        let state = state.clone();
        let moderation_client = moderation_client.clone();
        async move { handler::function_handler(event, state, moderation_client).await }
    }))
    .await
}
