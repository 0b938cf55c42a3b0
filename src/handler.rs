//! Connection handler
//!
//! Drives one connection once its transport has produced a stream of
//! inbound lines and a sink for outbound lines: registers it with the
//! ChatServer, pumps lines both ways, and reports the disconnect.

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::error::AppError;
use crate::message::ServerMessage;
use crate::profile::TransportProfile;
use crate::server::ServerCommand;
use crate::types::SessionId;

/// Capacity of each session's outbound queue
pub const OUTBOUND_BUFFER_SIZE: usize = 32;

/// Serve one connection until either direction ends
///
/// A read error is treated the same as a clean close.
pub async fn serve_lines<I, O>(
    inbound: I,
    outbound: O,
    profile: TransportProfile,
    cmd_tx: mpsc::Sender<ServerCommand>,
) -> Result<(), AppError>
where
    I: Stream<Item = Result<String, AppError>> + Send + 'static,
    O: Sink<String, Error = AppError> + Send + 'static,
{
    let session_id = SessionId::new();

    // Create channel for server -> client messages
    let (msg_tx, mut msg_rx) = mpsc::channel::<ServerMessage>(OUTBOUND_BUFFER_SIZE);

    // Register with ChatServer
    cmd_tx
        .send(ServerCommand::Connect {
            session_id,
            sender: msg_tx,
            profile,
        })
        .await
        .map_err(|_| AppError::ChannelSend)?;

    // Clone cmd_tx for read task
    let cmd_tx_read = cmd_tx.clone();

    // Spawn read task (lines -> ServerCommand)
    let mut read_task = tokio::spawn(async move {
        let mut inbound = Box::pin(inbound);
        while let Some(line) = inbound.next().await {
            match line {
                Ok(text) => {
                    let cmd = ServerCommand::Line { session_id, text };
                    if cmd_tx_read.send(cmd).await.is_err() {
                        debug!("Server closed, ending read task for {}", session_id);
                        break;
                    }
                }
                Err(e) => {
                    debug!("Read error for {}: {}", session_id, e);
                    break;
                }
            }
        }
        debug!("Read task ended for {}", session_id);
    });

    // Spawn write task (ServerMessage -> lines)
    let mut write_task = tokio::spawn(async move {
        let mut outbound = Box::pin(outbound);
        while let Some(msg) = msg_rx.recv().await {
            if let Err(e) = outbound.send(msg.to_string()).await {
                debug!("Send failed for {}: {}", session_id, e);
                break;
            }
        }
        debug!("Write task ended for {}", session_id);

        let _ = outbound.close().await;
    });

    // Wait for either task to complete, then stop the other
    tokio::select! {
        _ = &mut read_task => {
            write_task.abort();
        }
        _ = &mut write_task => {
            read_task.abort();
        }
    }

    // Report the disconnect by identity
    let _ = cmd_tx.send(ServerCommand::Disconnect { session_id }).await;

    info!("Session {} closed", session_id);

    Ok(())
}
