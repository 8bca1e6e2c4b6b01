use aurora_server::{Config, Server, ServerState, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. .env, configuration, logging
    dotenv::dotenv().ok();
    let config = Config::from_env();
    setup_environment(&config)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        "Aurora server starting..."
    );

    // 2. Database and shared state
    let state = ServerState::initialize(&config).await?;

    // 3. Serve until Ctrl-C / SIGTERM
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
