mod config;
mod routes;
mod services;
mod state;

#[tokio::main]
async fn main() {
    // Missing .env is fine; real environment variables take precedence.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::ServerConfig::from_env().expect("invalid server configuration");
    let port = config.port;
    for provider in &config.providers {
        tracing::info!(provider = %provider.name, "oauth provider configured");
    }
    if config.providers.is_empty() {
        tracing::warn!("no OAUTH_PROVIDERS configured; connect links will return 404");
    }

    let state = state::AppState::new(config);
    let app = routes::leptos_app(state).expect("leptos app init failed");
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "account server listening");
    axum::serve(listener, app).await.expect("server failed");
}
