//! Immutable card definitions supplied by the content provider

use serde::{Deserialize, Serialize};

use crate::core::types::CardId;

/// Card category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardCategory {
    Expression,
    Technique,
    Insight,
    Trauma,
}

/// Mechanical effect of a played card
///
/// A closed set dispatched by exhaustive match, so a content-authoring
/// mistake (a card with no effect implementation) cannot exist at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardEffect {
    /// Deal pressure to the aspect; its composure absorbs first
    Pressure { amount: i32 },
    /// Build the aspect's resonance toward its goal
    BuildResonance { amount: i32 },
    /// Raise the player's encounter-scoped composure shield
    GainComposure { amount: i32 },
    /// Restore player integrity
    RestoreIntegrity { amount: i32 },
    /// Reduce the aspect's dissonance buildup
    EaseDissonance { amount: i32 },
    /// Draw additional cards immediately
    Draw { count: usize },
    /// Regain focus this turn
    FocusSurge { amount: i32 },
    /// Gain hope
    KindleHope { amount: i32 },
}

/// Drawback applied the moment a Trauma card is drawn, before the player acts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OnDrawEffect {
    LoseFocus { amount: i32 },
    GainDespair { amount: i32 },
}

/// Minimum attunement score required to play a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttunementRequirement {
    pub attunement: String,
    pub min: i32,
}

/// An immutable card definition
///
/// Decks, hands, and discard piles hold references to these by id; the
/// definitions themselves are never mutated by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardDefinition {
    pub id: CardId,
    pub name: String,
    pub category: CardCategory,
    /// Primary attunement tag, e.g. "empathy" or "defiance"
    pub attunement: String,
    pub focus_cost: i32,
    /// Keyword tags used for trait-trigger and stance matching
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: String,
    pub effects: Vec<CardEffect>,
    /// Present on Trauma cards with a drawback that fires on draw
    #[serde(default)]
    pub on_draw: Option<OnDrawEffect>,
    /// Optional attunement gate checked before play
    #[serde(default)]
    pub requirement: Option<AttunementRequirement>,
}

impl CardDefinition {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn is_trauma(&self) -> bool {
        self.category == CardCategory::Trauma
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_card() -> CardDefinition {
        CardDefinition {
            id: CardId::from("steady-breath"),
            name: "Steady Breath".to_string(),
            category: CardCategory::Technique,
            attunement: "stillness".to_string(),
            focus_cost: 1,
            tags: vec!["grounding".to_string()],
            description: String::new(),
            effects: vec![CardEffect::GainComposure { amount: 3 }],
            on_draw: None,
            requirement: None,
        }
    }

    #[test]
    fn test_tag_lookup() {
        let card = sample_card();
        assert!(card.has_tag("grounding"));
        assert!(!card.has_tag("challenge"));
    }

    #[test]
    fn test_trauma_detection() {
        let mut card = sample_card();
        assert!(!card.is_trauma());
        card.category = CardCategory::Trauma;
        assert!(card.is_trauma());
    }
}
