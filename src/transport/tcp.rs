//! Raw TCP transport
//!
//! Newline-delimited text over a plain stream socket.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::{Framed, LinesCodec};
use tracing::debug;

use crate::error::AppError;
use crate::handler::serve_lines;
use crate::profile::TransportProfile;
use crate::server::ServerCommand;

/// Longest accepted inbound line, in bytes
pub const MAX_LINE_LENGTH: usize = 4096;

/// Handle a new raw TCP connection
pub async fn handle_tcp(
    stream: TcpStream,
    cmd_tx: mpsc::Sender<ServerCommand>,
    profile: TransportProfile,
) -> Result<(), AppError> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    debug!("New line-stream connection from {}", peer_addr);

    let framed = Framed::new(stream, LinesCodec::new_with_max_length(MAX_LINE_LENGTH));
    let (sink, lines) = framed.split::<String>();

    let inbound = lines.map(|line| line.map_err(AppError::from));
    let outbound = sink.sink_map_err(AppError::from);

    serve_lines(inbound, outbound, profile, cmd_tx).await
}
