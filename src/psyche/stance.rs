//! Persona stances: named modifier bundles the player can adopt

use serde::{Deserialize, Serialize};

/// Bonus pressure for cards carrying a keyword tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordBonus {
    pub tag: String,
    pub pressure_bonus: i32,
}

/// A named modifier bundle altering encounter mechanics
///
/// The focus bonus is applied to the focus meter's maximum while the stance
/// is adopted, so the per-turn refill regenerates more.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaStance {
    pub name: String,
    #[serde(default)]
    pub focus_bonus: i32,
    #[serde(default)]
    pub keyword_bonus: Option<KeywordBonus>,
}

impl PersonaStance {
    /// Pressure bonus this stance grants a card with the given tags
    pub fn pressure_bonus_for(&self, tags: &[String]) -> i32 {
        match &self.keyword_bonus {
            Some(bonus) if tags.iter().any(|t| *t == bonus.tag) => bonus.pressure_bonus,
            _ => 0,
        }
    }
}
