//! `switchboard server`: Start the HTTP server.

use switchboard_server::ServerConfig;

use super::init_registry;

pub async fn run(config: ServerConfig) -> Result<(), String> {
    let registry = init_registry()?;

    println!("Starting {} server on {}:{}...", config.server_name, config.host, config.port);

    let addr = switchboard_server::start_server(config, registry).await?;
    println!("Listening on http://{}", addr);

    // Keep the process running until interrupted
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("Failed to listen for Ctrl+C: {}", e))?;

    println!("\nShutting down...");
    Ok(())
}
