//! Immutable aspect templates: traits, intents, rewards

use serde::{Deserialize, Serialize};

use crate::core::types::{AspectId, CardId};

/// Passive or reactive modifier carried by an aspect
///
/// Hidden traits are mechanically identical to visible ones; hiding only
/// affects what the presentation layer is shown until a reveal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraitEffect {
    /// Flat reduction applied to every incoming pressure hit
    PressureResistance { amount: i32 },
    /// Composure gained at every aspect-turn start
    ComposureRegen { amount: i32 },
    /// Composure gained at aspect-turn start if the aspect took pressure
    /// during the preceding player turn
    Grudge { composure_gain: i32 },
    /// Bonus resonance from cards carrying a keyword tag
    ResonanceAffinity { tag: String, bonus: i32 },
    /// When resolve falls below `resolve_percent` of max and a card with
    /// `tag` is played, the named intent executes immediately and `status`
    /// (if any) is applied to the aspect
    Retaliation {
        resolve_percent: u32,
        tag: String,
        intent: String,
        status: Option<StatusEffect>,
    },
}

/// A named trait definition on an aspect template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraitDef {
    pub name: String,
    /// Hidden traits are excluded from snapshots until revealed
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub description: String,
    pub effect: TraitEffect,
}

/// One step of an aspect intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntentEffect {
    /// Pressure against the player; their composure absorbs first
    Pressure { amount: i32 },
    /// Build dissonance toward the trauma-injection threshold
    BuildDissonance { amount: i32 },
    /// The aspect shields itself
    GainComposure { amount: i32 },
    /// The aspect recovers resolve
    RestoreResolve { amount: i32 },
    /// Drain the player's focus this turn
    DrainFocus { amount: i32 },
    /// Force uniform-random discards from the player's hand
    ForceDiscard { count: usize },
    /// Inflict despair directly
    InflictDespair { amount: i32 },
}

/// A telegraphed aspect action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentDef {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub effects: Vec<IntentEffect>,
}

/// Mechanical payload of a status effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusModifier {
    /// Adds to pressure dealt by the aspect's intents
    IntentPressureBonus(i32),
    /// Adds to the aspect's pressure resistance
    PressureResistBonus(i32),
    /// Marker only, no mechanical payload
    None,
}

/// A lingering effect on an aspect
///
/// Effects with a duration tick down once per aspect-turn start and expire;
/// effects without one persist until removed by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub name: String,
    #[serde(default)]
    pub remaining_turns: Option<u32>,
    #[serde(default = "StatusEffect::default_modifier")]
    pub modifier: StatusModifier,
}

impl StatusEffect {
    fn default_modifier() -> StatusModifier {
        StatusModifier::None
    }
}

/// How an aspect chooses its next intent
///
/// Both policies exist in shipped content; templates pick one rather than
/// the engine hardwiring a single behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntentPolicy {
    /// Uniform-random choice from the intent list
    #[default]
    Uniform,
    /// Deterministic cycling through the intent list in order
    Cycling,
}

/// Rewards dispensed when the player wins against this aspect
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AspectRewards {
    /// Insight meta-currency, always granted on a win
    #[serde(default)]
    pub insight: u32,
    /// One uniform-random card from this pool joins the player's discard
    #[serde(default)]
    pub card_pool: Vec<CardId>,
    /// One uniform-random artifact from this pool, if non-empty
    #[serde(default)]
    pub artifact_pool: Vec<String>,
}

/// An immutable aspect template; live instances are derived per encounter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AspectTemplate {
    pub id: AspectId,
    pub name: String,
    pub max_resolve: i32,
    #[serde(default)]
    pub starting_composure: i32,
    pub resonance_goal: i32,
    pub dissonance_threshold: i32,
    /// Trauma card injected into the player's discard at dissonance break
    pub trauma_card: CardId,
    #[serde(default)]
    pub traits: Vec<TraitDef>,
    pub intents: Vec<IntentDef>,
    #[serde(default)]
    pub intent_policy: IntentPolicy,
    #[serde(default)]
    pub rewards: AspectRewards,
}

impl AspectTemplate {
    /// Find an intent by name (used by retaliation traits)
    pub fn intent(&self, name: &str) -> Option<&IntentDef> {
        self.intents.iter().find(|i| i.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_lookup_by_name() {
        let template = AspectTemplate {
            id: AspectId::from("the-critic"),
            name: "The Critic".to_string(),
            max_resolve: 20,
            starting_composure: 0,
            resonance_goal: 10,
            dissonance_threshold: 5,
            trauma_card: CardId::from("hollow-doubt"),
            traits: vec![],
            intents: vec![IntentDef {
                name: "Belittle".to_string(),
                description: String::new(),
                effects: vec![IntentEffect::Pressure { amount: 3 }],
            }],
            intent_policy: IntentPolicy::Uniform,
            rewards: AspectRewards::default(),
        };

        assert!(template.intent("Belittle").is_some());
        assert!(template.intent("Console").is_none());
    }
}
