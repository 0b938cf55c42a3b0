//! Multi-user Text Chat Relay - Entry Point
//!
//! Starts the ChatServer actor and the raw TCP and WebSocket listeners.

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use chat_relay::transport::{accept_loop, tcp::handle_tcp, ws::handle_websocket};
use chat_relay::{ChatServer, Config, TransportProfile};

/// Channel buffer size for server commands
const CHANNEL_BUFFER_SIZE: usize = 256;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging with environment filter
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=chat_relay=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chat_relay=info")),
        )
        .init();

    let config = Config::from_env()?;

    // Create ChatServer actor channel and start
    let (cmd_tx, cmd_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
    tokio::spawn(ChatServer::new(cmd_rx).run());

    info!("ChatServer actor started");

    let mut listeners = Vec::new();

    if let Some(addr) = &config.tcp_addr {
        let listener = TcpListener::bind(addr).await?;
        info!("Line chat listening on {}", addr);
        let profile = TransportProfile::line_stream().with_echo_private(config.echo_private);
        listeners.push(tokio::spawn(accept_loop(
            listener,
            cmd_tx.clone(),
            profile,
            handle_tcp,
        )));
    }

    if let Some(addr) = &config.ws_addr {
        let listener = TcpListener::bind(addr).await?;
        info!("WebSocket chat listening on {}", addr);
        let profile = TransportProfile::message_framed().with_echo_private(config.echo_private);
        listeners.push(tokio::spawn(accept_loop(
            listener,
            cmd_tx.clone(),
            profile,
            handle_websocket,
        )));
    }

    if listeners.is_empty() {
        warn!("No listeners enabled, exiting");
        return Ok(());
    }

    for listener in listeners {
        listener.await?;
    }

    Ok(())
}
