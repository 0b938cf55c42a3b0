//! Inbound command parsing
//!
//! Classifies one line of client text into a `Command`. Parsing is pure;
//! whether the sender already has a name is passed in by the caller.

use crate::error::ValidationError;
use crate::profile::NameGrammar;

/// A parsed inbound line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Requested display name (unnamed sessions only)
    SetName(String),
    /// `/users`
    ListUsers,
    /// `/pm <target> <body...>`
    PrivateMessage { target: String, body: String },
    /// Anything else, relayed to everyone but the sender
    Broadcast(String),
}

/// Parse a line of text
///
/// `named` selects between the naming phase and the command phase.
pub fn parse(line: &str, named: bool, grammar: NameGrammar) -> Result<Command, ValidationError> {
    let line = line.trim();

    if !named {
        return parse_name(line, grammar);
    }

    if line.eq_ignore_ascii_case("/users") {
        return Ok(Command::ListUsers);
    }

    if let Some(args) = strip_keyword(line, "/pm") {
        return parse_private(args);
    }

    if grammar == NameGrammar::Prefixed
        && strip_keyword(line, NameGrammar::NAME_PREFIX.trim_end()).is_some()
    {
        return Err(ValidationError::NameAlreadySet);
    }

    Ok(Command::Broadcast(line.to_string()))
}

fn parse_name(line: &str, grammar: NameGrammar) -> Result<Command, ValidationError> {
    let name = match grammar {
        NameGrammar::Bare => line,
        NameGrammar::Prefixed => {
            strip_keyword(line, NameGrammar::NAME_PREFIX.trim_end())
                .ok_or(ValidationError::NameRequired)?
        }
    };

    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(Command::SetName(name.to_string()))
}

fn parse_private(args: &str) -> Result<Command, ValidationError> {
    let args = args.trim_start();
    let (target, body) = args
        .split_once(char::is_whitespace)
        .ok_or(ValidationError::MalformedPrivateMessage)?;

    let body = body.trim_start();
    if target.is_empty() || body.is_empty() {
        return Err(ValidationError::MalformedPrivateMessage);
    }

    Ok(Command::PrivateMessage {
        target: target.to_string(),
        body: body.to_string(),
    })
}

/// Remainder of `line` after `keyword`, if `line` starts with it as a whole word
fn strip_keyword<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(keyword)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest)
    } else {
        None
    }
}
