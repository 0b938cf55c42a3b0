//! Outbound message definitions
//!
//! Every message the router sends to a client is a `ServerMessage`.
//! Transports render it to a single line of text via `Display`.

use std::fmt;

use crate::error::ChatError;
use crate::profile::NameGrammar;

/// Tag prepended to system notices
pub const SERVER_TAG: &str = "SERVER: ";

/// Server → Client message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// Greeting sent when the connection opens
    Prompt { grammar: NameGrammar },
    /// Display name registered
    NameAccepted { name: String },
    /// Another user joined
    Joined { name: String },
    /// Another user left
    Left { name: String },
    /// Broadcast relay
    Chat { from: String, body: String },
    /// Private message addressed to the recipient
    Private { from: String, body: String },
    /// Confirmation of a private message, to its sender
    PrivateSent { to: String, body: String },
    /// Online users listing
    Users { names: Vec<String> },
    /// Error notice
    Error(ChatError),
}

impl fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerMessage::Prompt { grammar } => f.write_str(grammar.prompt()),
            ServerMessage::NameAccepted { name } => {
                write!(f, "Welcome {}! You can now chat", name)
            }
            ServerMessage::Joined { name } => write!(f, "{} joined the chat", name),
            ServerMessage::Left { name } => write!(f, "{} left the chat", name),
            ServerMessage::Chat { from, body } => write!(f, "{}: {}", from, body),
            ServerMessage::Private { from, body } => {
                write!(f, "[PRIVATE] {} -> you: {}", from, body)
            }
            ServerMessage::PrivateSent { to, body } => {
                write!(f, "[PRIVATE] you -> {}: {}", to, body)
            }
            ServerMessage::Users { names } => write!(f, "ONLINE USERS: {}", names.join(", ")),
            ServerMessage::Error(err) => write!(f, "{}{}", SERVER_TAG, err),
        }
    }
}

/// Convert ChatError to ServerMessage for client notification
impl From<ChatError> for ServerMessage {
    fn from(err: ChatError) -> Self {
        ServerMessage::Error(err)
    }
}
