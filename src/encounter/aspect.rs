//! Live aspect state for one encounter
//!
//! Derived from an immutable template at encounter start and dropped when
//! the encounter resolves. Hidden traits are mechanically active from the
//! first turn; revealing only adds them to the player-facing view.

use ahash::AHashSet;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::content::aspect::{
    AspectRewards, AspectTemplate, IntentDef, IntentPolicy, StatusEffect, StatusModifier,
    TraitDef, TraitEffect,
};
use crate::core::types::{AspectId, CardId};
use crate::encounter::events::EventSink;
use crate::psyche::ledger::Meter;

/// One live adversary instance
#[derive(Debug, Clone)]
pub struct AspectInstance {
    pub id: AspectId,
    pub name: String,
    pub resolve: Meter,
    /// Shield consumed before resolve; clamped to the configured cap
    pub composure: i32,
    /// Filling this to max (the goal) is the alternate win condition
    pub resonance: Meter,
    /// Filling this to max (the threshold) injects a trauma card once
    pub dissonance: Meter,
    /// Trauma card injected at dissonance break
    pub trauma_card: CardId,
    traits: Vec<TraitDef>,
    revealed: AHashSet<String>,
    pub statuses: Vec<StatusEffect>,
    /// Set whenever pressure reached composure or resolve this player turn
    pub took_pressure: bool,
    intents: Vec<IntentDef>,
    policy: IntentPolicy,
    /// Next list position for the cycling policy
    cycle_index: usize,
    current_intent: Option<usize>,
    /// One-shot guard: the dissonance break fires once per encounter
    pub dissonance_break_fired: bool,
    pub rewards: AspectRewards,
}

impl AspectInstance {
    pub fn from_template(template: &AspectTemplate) -> Self {
        Self {
            id: template.id.clone(),
            name: template.name.clone(),
            resolve: Meter::full(template.max_resolve),
            composure: template.starting_composure.max(0),
            resonance: Meter::new(0, template.resonance_goal),
            dissonance: Meter::new(0, template.dissonance_threshold),
            trauma_card: template.trauma_card.clone(),
            traits: template.traits.clone(),
            revealed: AHashSet::new(),
            statuses: Vec::new(),
            took_pressure: false,
            intents: template.intents.clone(),
            policy: template.intent_policy,
            cycle_index: 0,
            current_intent: None,
            dissonance_break_fired: false,
            rewards: template.rewards.clone(),
        }
    }

    /// All traits, visible and hidden; mechanics ignore visibility
    pub fn traits(&self) -> &[TraitDef] {
        &self.traits
    }

    /// Trait names the player is allowed to see
    pub fn known_trait_names(&self) -> Vec<String> {
        self.traits
            .iter()
            .filter(|t| !t.hidden || self.revealed.contains(&t.name))
            .map(|t| t.name.clone())
            .collect()
    }

    /// Reveal one uniform-random not-yet-revealed hidden trait
    pub fn reveal_random_hidden(&mut self, rng: &mut ChaCha8Rng) -> Option<String> {
        let candidates: Vec<&str> = self
            .traits
            .iter()
            .filter(|t| t.hidden && !self.revealed.contains(&t.name))
            .map(|t| t.name.as_str())
            .collect();
        let name = candidates.choose(rng)?.to_string();
        self.revealed.insert(name.clone());
        Some(name)
    }

    pub fn find_intent(&self, name: &str) -> Option<&IntentDef> {
        self.intents.iter().find(|i| i.name == name)
    }

    pub fn current_intent(&self) -> Option<&IntentDef> {
        self.current_intent.and_then(|i| self.intents.get(i))
    }

    /// Choose the next intent per the template's policy
    pub fn select_intent(&mut self, rng: &mut ChaCha8Rng) -> Option<&IntentDef> {
        if self.intents.is_empty() {
            self.current_intent = None;
            return None;
        }
        let index = match self.policy {
            IntentPolicy::Uniform => rng.gen_range(0..self.intents.len()),
            IntentPolicy::Cycling => {
                let index = self.cycle_index;
                self.cycle_index = (self.cycle_index + 1) % self.intents.len();
                index
            }
        };
        self.current_intent = Some(index);
        self.intents.get(index)
    }

    /// Flat reduction applied to incoming pressure (traits + statuses)
    pub fn pressure_resistance(&self) -> i32 {
        let from_traits: i32 = self
            .traits
            .iter()
            .map(|t| match t.effect {
                TraitEffect::PressureResistance { amount } => amount,
                _ => 0,
            })
            .sum();
        let from_statuses: i32 = self
            .statuses
            .iter()
            .map(|s| match s.modifier {
                StatusModifier::PressureResistBonus(amount) => amount,
                _ => 0,
            })
            .sum();
        from_traits + from_statuses
    }

    /// Bonus added to pressure dealt by this aspect's intents
    pub fn intent_pressure_bonus(&self) -> i32 {
        self.statuses
            .iter()
            .map(|s| match s.modifier {
                StatusModifier::IntentPressureBonus(amount) => amount,
                _ => 0,
            })
            .sum()
    }

    /// Bonus resonance for a card with the given tags
    pub fn resonance_bonus_for(&self, tags: &[String]) -> i32 {
        self.traits
            .iter()
            .map(|t| match &t.effect {
                TraitEffect::ResonanceAffinity { tag, bonus } if tags.iter().any(|c| c == tag) => {
                    *bonus
                }
                _ => 0,
            })
            .sum()
    }

    /// Apply a status, replacing any existing one of the same name
    pub fn apply_status(&mut self, status: StatusEffect, sink: &mut EventSink) {
        self.statuses.retain(|s| s.name != status.name);
        sink.info(format!("{} is affected by {}", self.name, status.name));
        self.statuses.push(status);
    }

    pub fn remove_status(&mut self, name: &str, sink: &mut EventSink) {
        let before = self.statuses.len();
        self.statuses.retain(|s| s.name != name);
        if self.statuses.len() < before {
            sink.info(format!("{} sheds {}", self.name, name));
        }
    }

    /// Decrement status durations; expire and log. Effects without a
    /// duration persist until removed by name.
    pub fn tick_statuses(&mut self, sink: &mut EventSink) {
        let mut expired = Vec::new();
        for status in &mut self.statuses {
            if let Some(remaining) = &mut status.remaining_turns {
                *remaining = remaining.saturating_sub(1);
                if *remaining == 0 {
                    expired.push(status.name.clone());
                }
            }
        }
        for name in expired {
            self.statuses.retain(|s| s.name != name);
            sink.info(format!("{} on {} has worn off", name, self.name));
        }
    }

    /// Current resolve as a fraction of max (retaliation trigger checks)
    pub fn resolve_fraction(&self) -> f32 {
        if self.resolve.max() == 0 {
            return 0.0;
        }
        self.resolve.current() as f32 / self.resolve.max() as f32
    }
}
