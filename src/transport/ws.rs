//! WebSocket transport
//!
//! Performs the WebSocket handshake and maps text frames to lines.
//! A frame carrying line breaks yields one line per piece, so no relayed
//! message can span several lines on a line-stream client.

use futures_util::{future, stream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::debug;

use crate::error::AppError;
use crate::handler::serve_lines;
use crate::profile::TransportProfile;
use crate::server::ServerCommand;

/// Handle a new WebSocket connection
///
/// A close frame ends the inbound stream. Ping, pong and binary frames
/// are ignored; tungstenite answers pings on its own.
pub async fn handle_websocket(
    stream: TcpStream,
    cmd_tx: mpsc::Sender<ServerCommand>,
    profile: TransportProfile,
) -> Result<(), AppError> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    // WebSocket handshake
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    debug!("WebSocket handshake completed with {}", peer_addr);

    let (ws_sender, ws_receiver) = ws_stream.split();

    let inbound = ws_receiver
        .take_while(|msg| future::ready(!matches!(msg, Ok(Message::Close(_)))))
        .flat_map(|msg| {
            let lines: Vec<Result<String, AppError>> = match msg {
                Ok(Message::Text(text)) => frame_lines(&text).into_iter().map(Ok).collect(),
                Ok(_) => Vec::new(),
                Err(e) => vec![Err(AppError::from(e))],
            };
            stream::iter(lines)
        });

    let outbound = ws_sender
        .with(|line: String| future::ready(Ok::<_, AppError>(Message::Text(line.into()))));

    serve_lines(inbound, outbound, profile, cmd_tx).await
}

/// Split a text frame into lines on `\n`, `\r\n` or a lone `\r`
///
/// One trailing line break is dropped, so `"hi\n"` is the single line `"hi"`.
fn frame_lines(text: &str) -> Vec<String> {
    let text = text
        .strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .or_else(|| text.strip_suffix('\r'))
        .unwrap_or(text);

    text.split("\r\n")
        .flat_map(|part| part.split(['\n', '\r']))
        .map(str::to_string)
        .collect()
}
