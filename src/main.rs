mod config;
mod message;
mod routes;
mod services;
mod state;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = config::Config::from_env()?;
    let port = config.port;
    tracing::info!(
        throttle_ms = u64::try_from(config.counter_throttle.as_millis()).unwrap_or(u64::MAX),
        queue_capacity = config.client_queue_capacity,
        static_dir = ?config.static_dir,
        "configuration loaded"
    );

    let state = state::AppState::new(config);
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;

    tracing::info!(%port, "globe relay listening");
    axum::serve(listener, app).await?;
    Ok(())
}
