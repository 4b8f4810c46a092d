//! Opaque identifiers for roles and champions.
//!
//! The engine never interprets these values; they are carried through from
//! ingestion to recommendations unchanged. Both are ordered so they can key
//! `BTreeMap` tables deterministically, and `ChampionId`'s `Ord` supplies
//! the ranking tie-break.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A draft role identifier (e.g. "MID", "JUNGLE").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(String);

impl RoleId {
    /// Creates a role id from a string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the identifier is empty after trimming.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RoleId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RoleId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// An opaque champion identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChampionId(String);

impl ChampionId {
    /// Creates a champion id from a string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChampionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChampionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ChampionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for ChampionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn champion_ids_order_lexicographically() {
        let mut ids = vec![
            ChampionId::from("Zed"),
            ChampionId::from("Ahri"),
            ChampionId::from("Jinx"),
        ];
        ids.sort();
        let names: Vec<&str> = ids.iter().map(ChampionId::as_str).collect();
        assert_eq!(names, vec!["Ahri", "Jinx", "Zed"]);
    }

    #[test]
    fn serde_is_transparent() {
        let role = RoleId::from("MID");
        assert_eq!(serde_json::to_string(&role).unwrap(), "\"MID\"");
        let back: RoleId = serde_json::from_str("\"MID\"").unwrap();
        assert_eq!(back, role);
    }

    #[test]
    fn blank_roles_are_detected() {
        assert!(RoleId::from("  ").is_blank());
        assert!(!RoleId::from("TOP").is_blank());
    }
}
