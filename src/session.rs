//! Session struct definition
//!
//! Represents one connected client and its outbound delivery handle.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::error::SendError;
use crate::message::ServerMessage;
use crate::types::SessionId;

/// Connected client information
///
/// The session holds only the sending half of its outbound queue;
/// the transport's write task owns the receiving half and the socket.
#[derive(Debug, Clone)]
pub struct Session {
    /// Unique identifier for this connection
    pub id: SessionId,
    /// Display name (None until registered)
    display_name: Option<String>,
    /// Server → Client message channel
    outbound: mpsc::Sender<ServerMessage>,
}

impl Session {
    /// Create a new unnamed session with the given ID and sender channel
    pub fn new(id: SessionId, outbound: mpsc::Sender<ServerMessage>) -> Self {
        Self {
            id,
            display_name: None,
            outbound,
        }
    }

    /// Deliver a message to this client without waiting
    ///
    /// A full queue is reported rather than awaited so that one slow
    /// peer cannot hold up the router.
    pub fn deliver(&self, msg: ServerMessage) -> Result<(), SendError> {
        self.outbound.try_send(msg).map_err(|e| match e {
            TrySendError::Full(_) => SendError::Full,
            TrySendError::Closed(_) => SendError::ChannelClosed,
        })
    }

    /// Display name, if set
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Copy of this session carrying the given display name
    ///
    /// A name, once set, is never changed on the same session.
    pub fn named(&self, name: &str) -> Self {
        debug_assert!(self.display_name.is_none());
        Self {
            id: self.id,
            display_name: Some(name.to_string()),
            outbound: self.outbound.clone(),
        }
    }
}
