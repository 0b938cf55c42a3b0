//! Registry of online users
//!
//! Maps display names to their sessions. The registry is owned by the
//! `ChatServer` actor, so every operation on it is serialized by the
//! actor's event loop.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::session::Session;

/// Directory of registered display names
///
/// At most one session is registered per name at any time.
#[derive(Debug, Default)]
pub struct Registry {
    sessions: HashMap<String, Session>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `session` under `name` if the name is free
    ///
    /// Returns false and leaves the registry untouched if the name is taken.
    pub fn try_register(&mut self, name: &str, session: Session) -> bool {
        match self.sessions.entry(name.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(session);
                true
            }
        }
    }

    /// Remove `name` if present; removing an absent name is a no-op
    pub fn remove(&mut self, name: &str) -> Option<Session> {
        self.sessions.remove(name)
    }

    /// Current session for `name`
    pub fn lookup(&self, name: &str) -> Option<&Session> {
        self.sessions.get(name)
    }

    /// Sorted list of all registered names
    pub fn snapshot_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sessions.keys().cloned().collect();
        names.sort();
        names
    }

    /// Apply `f` to every entry except `excluded`
    ///
    /// The registry is borrowed immutably for the whole walk, so `f`
    /// cannot mutate it.
    pub fn for_each_except<F>(&self, excluded: Option<&str>, mut f: F)
    where
        F: FnMut(&str, &Session),
    {
        for (name, session) in &self.sessions {
            if Some(name.as_str()) != excluded {
                f(name, session);
            }
        }
    }

    /// Number of registered names
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
