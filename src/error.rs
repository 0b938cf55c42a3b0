//! Error types for the chat relay
//!
//! Defines routing errors reported back to clients as notices,
//! delivery errors, and fatal connection-level errors.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Connection-level errors (fatal for the affected connection only)
#[derive(Debug, Error)]
pub enum AppError {
    /// WebSocket protocol error
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Line framing error on the raw TCP transport
    #[error("Line codec error: {0}")]
    Codec(#[from] tokio_util::codec::LinesCodecError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Channel send error (the router is gone)
    #[error("Channel send error")]
    ChannelSend,
}

/// Routing errors
///
/// All of these are recoverable: they are reported to the affected
/// session as a notice and never close the connection on their own.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    /// Malformed input from the client
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Requested display name is already registered
    #[error("Username '{0}' is already taken.")]
    NameConflict(String),

    /// Private message recipient is not online
    #[error("User '{0}' not found.")]
    TargetNotFound(String),

    /// Transport write failed for one recipient
    #[error("Delivery failed: {0}")]
    DeliveryFailure(#[from] SendError),
}

/// Input validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Empty or whitespace-only display name
    #[error("Invalid username.")]
    EmptyName,

    /// Text sent before a name was set (prefixed grammar only)
    #[error("Set your username first with /name yourname")]
    NameRequired,

    /// `/pm` without both a target and a body
    #[error("Invalid private message. Use /pm username message")]
    MalformedPrivateMessage,

    /// `/name` from a session that already has one
    #[error("Username already set; names cannot be changed.")]
    NameAlreadySet,
}

/// Message send errors
///
/// Occurs when an outbound queue cannot accept a message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    /// The receiving end of the channel has been closed
    #[error("Channel closed")]
    ChannelClosed,

    /// The recipient is not draining its queue fast enough
    #[error("Outbound queue full")]
    Full,
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable holds a value that cannot be interpreted
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}
