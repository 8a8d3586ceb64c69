//! Core type definitions used throughout the engine

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Content identifier for a card definition.
///
/// Piles hold card-definition references, not independent mutable copies;
/// card identity is always by definition id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(pub String);

impl CardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CardId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Content identifier for an aspect template
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AspectId(pub String);

impl AspectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for AspectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AspectId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Unique identifier for one live encounter instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncounterId(pub Uuid);

impl EncounterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EncounterId {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn counter within an encounter (starts at 1)
pub type Turn = u32;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id_equality() {
        let a = CardId::from("steady-breath");
        let b = CardId::new("steady-breath");
        let c = CardId::from("cold-clarity");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_card_id_hash() {
        use std::collections::HashMap;
        let mut map: HashMap<CardId, u32> = HashMap::new();
        map.insert(CardId::from("steady-breath"), 1);
        assert_eq!(map.get(&CardId::from("steady-breath")), Some(&1));
    }

    #[test]
    fn test_encounter_ids_unique() {
        assert_ne!(EncounterId::new(), EncounterId::new());
    }
}
