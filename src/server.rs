//! ChatServer Actor implementation
//!
//! The central actor that owns the user registry and the state of every
//! connection. Uses the Actor pattern with mpsc channels for message passing,
//! so registry access is serialized by the event loop.
//!
//! Per-connection state machine:
//!
//! ```text
//! Unnamed --(name accepted)--> Active --(disconnect)--> Closed
//!    |                                                    ^
//!    +--------------------(disconnect)--------------------+
//! ```

use std::collections::HashMap;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::command::{self, Command};
use crate::error::{ChatError, SendError};
use crate::message::ServerMessage;
use crate::profile::{ConflictPolicy, TransportProfile};
use crate::registry::Registry;
use crate::session::Session;
use crate::types::SessionId;

/// Commands sent from connection handlers to the ChatServer actor
#[derive(Debug)]
pub enum ServerCommand {
    /// New connection accepted
    Connect {
        session_id: SessionId,
        sender: mpsc::Sender<ServerMessage>,
        profile: TransportProfile,
    },
    /// One line of text received
    Line {
        session_id: SessionId,
        text: String,
    },
    /// Connection closed (cleanly or not)
    Disconnect {
        session_id: SessionId,
    },
}

/// Lifecycle phase of a live connection
///
/// `Closed` is represented by the connection's absence.
#[derive(Debug)]
enum Phase {
    /// Waiting for a valid, free display name
    Unnamed(Session),
    /// Registered; the session carries its display name
    Active(Session),
}

#[derive(Debug)]
struct Connection {
    profile: TransportProfile,
    phase: Phase,
}

/// The main ChatServer actor
pub struct ChatServer {
    /// Registered users: display name -> Session
    registry: Registry,
    /// Live connections: SessionId -> Connection
    connections: HashMap<SessionId, Connection>,
    /// Command receiver channel
    receiver: mpsc::Receiver<ServerCommand>,
}

impl ChatServer {
    /// Create a new ChatServer with the given command receiver
    pub fn new(receiver: mpsc::Receiver<ServerCommand>) -> Self {
        Self {
            registry: Registry::new(),
            connections: HashMap::new(),
            receiver,
        }
    }

    /// Run the ChatServer event loop
    ///
    /// Continuously receives and processes commands until all senders are dropped.
    pub async fn run(mut self) {
        info!("ChatServer started");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd);
        }

        info!("ChatServer shutting down");
    }

    /// Process a single command
    fn handle_command(&mut self, cmd: ServerCommand) {
        match cmd {
            ServerCommand::Connect {
                session_id,
                sender,
                profile,
            } => {
                self.handle_connect(session_id, sender, profile);
            }
            ServerCommand::Line { session_id, text } => {
                self.handle_line(session_id, &text);
            }
            ServerCommand::Disconnect { session_id } => {
                self.handle_disconnect(session_id);
            }
        }
    }

    /// Handle a new connection: greet it and wait for a name
    fn handle_connect(
        &mut self,
        session_id: SessionId,
        sender: mpsc::Sender<ServerMessage>,
        profile: TransportProfile,
    ) {
        info!("Session {} connected", session_id);
        let session = Session::new(session_id, sender);

        report_failure(
            session_id,
            session.deliver(ServerMessage::Prompt {
                grammar: profile.grammar,
            }),
        );

        self.connections.insert(
            session_id,
            Connection {
                profile,
                phase: Phase::Unnamed(session),
            },
        );
        debug!(
            "Total connections: {}, Registered users: {}",
            self.connections.len(),
            self.registry.len()
        );
    }

    /// Handle one inbound line according to the connection's phase
    fn handle_line(&mut self, session_id: SessionId, text: &str) {
        let Some(conn) = self.connections.get(&session_id) else {
            debug!("Line from unknown session {} dropped", session_id);
            return;
        };
        let profile = conn.profile;

        match &conn.phase {
            Phase::Unnamed(session) => {
                let session = session.clone();
                match command::parse(text, false, profile.grammar) {
                    Ok(Command::SetName(name)) => self.handle_set_name(session, name, profile),
                    Ok(_) => {}
                    Err(e) => reply(&session, ChatError::from(e).into()),
                }
            }
            Phase::Active(session) => {
                let Some(name) = session.display_name().map(str::to_string) else {
                    return;
                };
                match command::parse(text, true, profile.grammar) {
                    Ok(Command::ListUsers) => self.handle_list_users(&name),
                    Ok(Command::PrivateMessage { target, body }) => {
                        self.handle_private(&name, &target, body, profile)
                    }
                    Ok(Command::Broadcast(body)) => self.handle_broadcast(&name, body),
                    Ok(Command::SetName(_)) => {}
                    Err(e) => self.reply_to(&name, ChatError::from(e).into()),
                }
            }
        }
    }

    /// Unnamed → Active, if the name is free
    fn handle_set_name(&mut self, session: Session, name: String, profile: TransportProfile) {
        let session_id = session.id;

        let registered = session.named(&name);

        if !self.registry.try_register(&name, registered.clone()) {
            info!("Session {} requested taken name '{}'", session_id, name);
            reply(&session, ChatError::NameConflict(name).into());

            if profile.on_conflict == ConflictPolicy::Disconnect {
                // Dropping the last sender ends the transport's write task,
                // which closes the connection after flushing the notice.
                self.connections.remove(&session_id);
                info!("Session {} closed after name conflict", session_id);
            }
            return;
        }

        if let Some(conn) = self.connections.get_mut(&session_id) {
            conn.phase = Phase::Active(registered);
        }
        info!("Session {} registered as '{}'", session_id, name);

        reply(&session, ServerMessage::NameAccepted { name: name.clone() });
        self.fan_out(Some(&name), ServerMessage::Joined { name: name.clone() });
    }

    /// Reply to the requester with every registered name
    fn handle_list_users(&self, requester: &str) {
        let names = self.registry.snapshot_names();
        self.reply_to(requester, ServerMessage::Users { names });
    }

    /// Deliver to exactly one target, or report it missing to the sender
    fn handle_private(&self, from: &str, target: &str, body: String, profile: TransportProfile) {
        let Some(recipient) = self.registry.lookup(target) else {
            debug!("Private message from '{}' to absent '{}'", from, target);
            self.reply_to(from, ChatError::TargetNotFound(target.to_string()).into());
            return;
        };

        debug!("Private message '{}' -> '{}'", from, target);
        report_failure(
            recipient.id,
            recipient.deliver(ServerMessage::Private {
                from: from.to_string(),
                body: body.clone(),
            }),
        );

        if profile.echo_private {
            self.reply_to(
                from,
                ServerMessage::PrivateSent {
                    to: target.to_string(),
                    body,
                },
            );
        }
    }

    /// Relay to everyone except the sender
    fn handle_broadcast(&self, from: &str, body: String) {
        debug!("{}: {}", from, body);
        self.fan_out(
            Some(from),
            ServerMessage::Chat {
                from: from.to_string(),
                body,
            },
        );
    }

    /// Active/Unnamed → Closed; a second disconnect is a no-op
    fn handle_disconnect(&mut self, session_id: SessionId) {
        let Some(conn) = self.connections.remove(&session_id) else {
            debug!("Disconnect for closed session {} ignored", session_id);
            return;
        };
        info!("Session {} disconnected", session_id);

        if let Phase::Active(session) = conn.phase {
            if let Some(name) = session.display_name() {
                // Deregister first so the leaver is neither notified nor listed.
                self.registry.remove(name);
                info!("'{}' left the chat", name);
                self.fan_out(
                    None,
                    ServerMessage::Left {
                        name: name.to_string(),
                    },
                );
            }
        }

        debug!(
            "Total connections: {}, Registered users: {}",
            self.connections.len(),
            self.registry.len()
        );
    }

    /// Deliver `msg` to every registered session except `excluded`
    ///
    /// Each delivery is independent; one failed recipient never stops the rest.
    fn fan_out(&self, excluded: Option<&str>, msg: ServerMessage) {
        self.registry.for_each_except(excluded, |_, session| {
            report_failure(session.id, session.deliver(msg.clone()));
        });
    }

    /// Deliver to a registered name
    fn reply_to(&self, name: &str, msg: ServerMessage) {
        if let Some(session) = self.registry.lookup(name) {
            reply(session, msg);
        }
    }
}

fn reply(session: &Session, msg: ServerMessage) {
    report_failure(session.id, session.deliver(msg));
}

/// Log and drop a failed delivery
fn report_failure(session_id: SessionId, result: Result<(), SendError>) {
    if let Err(e) = result {
        warn!(
            "Dropped message for session {}: {}",
            session_id,
            ChatError::DeliveryFailure(e)
        );
    }
}
