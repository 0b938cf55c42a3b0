//! Per-transport policies
//!
//! Each transport adapter picks a `TransportProfile` describing how
//! clients name themselves and how the router reacts to name conflicts.

/// How an unnamed client supplies its display name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameGrammar {
    /// The first line is the name itself
    Bare,
    /// The name is given with `/name <name>`
    Prefixed,
}

impl NameGrammar {
    /// Literal prefix for the `Prefixed` grammar
    pub const NAME_PREFIX: &'static str = "/name ";

    /// Prompt sent when the connection opens
    pub fn prompt(self) -> &'static str {
        match self {
            NameGrammar::Bare => "Welcome! Please enter your username",
            NameGrammar::Prefixed => "Welcome! Please set your username with /name yourname",
        }
    }
}

/// What happens when a requested name is already taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Report the conflict and let the client try another name
    Retry,
    /// Report the conflict and close the connection
    Disconnect,
}

/// Policies for one connection, chosen by its transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportProfile {
    pub grammar: NameGrammar,
    pub on_conflict: ConflictPolicy,
    /// Confirm private messages back to their sender
    pub echo_private: bool,
}

impl TransportProfile {
    /// Raw line stream: bare names, close on conflict
    pub fn line_stream() -> Self {
        Self {
            grammar: NameGrammar::Bare,
            on_conflict: ConflictPolicy::Disconnect,
            echo_private: false,
        }
    }

    /// Message-framed transport: `/name` prefix, retry on conflict
    pub fn message_framed() -> Self {
        Self {
            grammar: NameGrammar::Prefixed,
            on_conflict: ConflictPolicy::Retry,
            echo_private: false,
        }
    }

    pub fn with_echo_private(mut self, echo: bool) -> Self {
        self.echo_private = echo;
        self
    }
}
