//! Transport adapters
//!
//! Each adapter turns an accepted TCP stream into a line stream and a
//! line sink, then hands both to [`serve_lines`](crate::handler::serve_lines).

pub mod tcp;
pub mod ws;

use std::future::Future;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::error::AppError;
use crate::profile::TransportProfile;
use crate::server::ServerCommand;

/// Accept connections forever, spawning one handler task per connection
///
/// Accept errors are logged and do not stop the loop.
pub async fn accept_loop<F, Fut>(
    listener: TcpListener,
    cmd_tx: mpsc::Sender<ServerCommand>,
    profile: TransportProfile,
    handle: F,
) where
    F: Fn(TcpStream, mpsc::Sender<ServerCommand>, TransportProfile) -> Fut,
    Fut: Future<Output = Result<(), AppError>> + Send + 'static,
{
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                info!("New connection from {}", addr);
                let fut = handle(stream, cmd_tx.clone(), profile);

                tokio::spawn(async move {
                    if let Err(e) = fut.await {
                        error!("Connection handler error: {}", e);
                    }
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}
