mod config;
mod error;
mod log_entry;
mod server;
mod sms_log;
mod types;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting parsert-server");

    // Parse command-line arguments
    let cli = config::Cli::parse();

    // Load configuration
    let config = config::load_config(&cli)?;
    info!("Configuration loaded successfully");

    let state = server::AppState::new(sms_log::SmsLog::new(config.log_file.clone()));
    info!("SMS log file: {:?}", state.log.path());

    let addr = config.listen_addr();
    let listener = server::bind(addr).await.context("Failed to start HTTP listener")?;
    info!("Listening on {}", addr);

    println!("parserT Test Server running on http://localhost:{}", config.port);
    println!("Configure your app to use: http://YOUR_IP:{}", config.port);
    println!("Press Ctrl+C to stop");

    server::serve(listener, state, server::shutdown_signal())
        .await
        .context("HTTP server terminated unexpectedly")?;

    println!("\nServer stopped");

    Ok(())
}
