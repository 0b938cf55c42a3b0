//! Multi-user Text Chat Relay Library
//!
//! A chat relay built on tokio where clients claim a unique display name
//! and exchange broadcast and private messages, using the Actor pattern
//! for state management.
//!
//! # Features
//! - Raw TCP transport (one line per message)
//! - WebSocket transport (one text frame per message)
//! - Unique display names
//! - Broadcast messaging
//! - Private messages (`/pm <user> <message>`)
//! - Online users listing (`/users`)
//! - Join and leave notices
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `ChatServer` is the central actor owning the `Registry` of names
//! - Each connection has a `handler` task communicating with the server
//! - Transports only turn sockets into lines; routing is transport-agnostic
//! - Outbound delivery never blocks the actor (bounded queues, `try_send`)
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use tokio::sync::mpsc;
//! use chat_relay::transport::{accept_loop, tcp::handle_tcp};
//! use chat_relay::{ChatServer, TransportProfile};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:5000").await.unwrap();
//!     let (cmd_tx, cmd_rx) = mpsc::channel(256);
//!
//!     tokio::spawn(ChatServer::new(cmd_rx).run());
//!     accept_loop(listener, cmd_tx, TransportProfile::line_stream(), handle_tcp).await;
//! }
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod handler;
pub mod message;
pub mod profile;
pub mod registry;
pub mod server;
pub mod session;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use command::Command;
pub use config::Config;
pub use error::{AppError, ChatError, ConfigError, SendError, ValidationError};
pub use handler::serve_lines;
pub use message::ServerMessage;
pub use profile::{ConflictPolicy, NameGrammar, TransportProfile};
pub use registry::Registry;
pub use server::{ChatServer, ServerCommand};
pub use session::Session;
pub use types::SessionId;
