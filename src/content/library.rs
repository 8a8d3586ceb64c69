//! Content registry: card and aspect definitions keyed by id
//!
//! The engine never mutates definitions; it only looks them up and derives
//! per-encounter instances. Unknown ids are named errors, never panics.

use ahash::AHashMap;
use serde::Deserialize;

use crate::content::aspect::{AspectTemplate, TraitEffect};
use crate::content::card::CardDefinition;
use crate::core::error::{EngineError, Result};
use crate::core::types::{AspectId, CardId};

/// Registry of immutable content definitions
#[derive(Debug, Default)]
pub struct ContentLibrary {
    cards: AHashMap<CardId, CardDefinition>,
    aspects: AHashMap<AspectId, AspectTemplate>,
}

/// On-disk content shape for TOML files
#[derive(Debug, Deserialize)]
struct ContentFile {
    #[serde(default)]
    cards: Vec<CardDefinition>,
    #[serde(default)]
    aspects: Vec<AspectTemplate>,
}

impl ContentLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_card(&mut self, card: CardDefinition) {
        if let Some(previous) = self.cards.insert(card.id.clone(), card) {
            tracing::warn!("Card definition replaced: {}", previous.id);
        }
    }

    pub fn add_aspect(&mut self, aspect: AspectTemplate) {
        if let Some(previous) = self.aspects.insert(aspect.id.clone(), aspect) {
            tracing::warn!("Aspect template replaced: {}", previous.id);
        }
    }

    /// Look up a card definition, failing with a named error on unknown ids
    pub fn card(&self, id: &CardId) -> Result<&CardDefinition> {
        self.cards
            .get(id)
            .ok_or_else(|| EngineError::UnknownCard(id.clone()))
    }

    /// Look up an aspect template, failing with a named error on unknown ids
    pub fn aspect(&self, id: &AspectId) -> Result<&AspectTemplate> {
        self.aspects
            .get(id)
            .ok_or_else(|| EngineError::UnknownAspect(id.clone()))
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    pub fn aspect_count(&self) -> usize {
        self.aspects.len()
    }

    /// Parse card/aspect definitions from a TOML document and register them
    pub fn load_toml(&mut self, text: &str) -> Result<()> {
        let file: ContentFile = toml::from_str(text)?;
        for card in file.cards {
            self.add_card(card);
        }
        for aspect in file.aspects {
            self.add_aspect(aspect);
        }
        Ok(())
    }

    /// Check cross-references and numeric sanity so authoring mistakes
    /// surface before play
    ///
    /// Every aspect must have at least one intent, positive resolve and
    /// win/break thresholds, its trauma card and reward cards must resolve,
    /// and retaliation traits must name intents the aspect actually has.
    /// Cards must not have a negative focus cost.
    pub fn validate(&self) -> Result<()> {
        for card in self.cards.values() {
            if card.focus_cost < 0 {
                return Err(EngineError::MalformedContent(format!(
                    "card {} has negative focus cost {}",
                    card.id, card.focus_cost
                )));
            }
        }
        for aspect in self.aspects.values() {
            if aspect.max_resolve <= 0 {
                return Err(EngineError::MalformedContent(format!(
                    "aspect {} has non-positive max_resolve {}",
                    aspect.id, aspect.max_resolve
                )));
            }
            if aspect.resonance_goal <= 0 {
                return Err(EngineError::MalformedContent(format!(
                    "aspect {} has non-positive resonance_goal {}",
                    aspect.id, aspect.resonance_goal
                )));
            }
            if aspect.dissonance_threshold <= 0 {
                return Err(EngineError::MalformedContent(format!(
                    "aspect {} has non-positive dissonance_threshold {}",
                    aspect.id, aspect.dissonance_threshold
                )));
            }
            if aspect.starting_composure < 0 {
                return Err(EngineError::MalformedContent(format!(
                    "aspect {} has negative starting_composure {}",
                    aspect.id, aspect.starting_composure
                )));
            }
            if aspect.intents.is_empty() {
                return Err(EngineError::MalformedContent(format!(
                    "aspect {} has no intents",
                    aspect.id
                )));
            }
            if !self.cards.contains_key(&aspect.trauma_card) {
                return Err(EngineError::MalformedContent(format!(
                    "aspect {} references unknown trauma card {}",
                    aspect.id, aspect.trauma_card
                )));
            }
            for card in &aspect.rewards.card_pool {
                if !self.cards.contains_key(card) {
                    return Err(EngineError::MalformedContent(format!(
                        "aspect {} rewards unknown card {}",
                        aspect.id, card
                    )));
                }
            }
            for tr in &aspect.traits {
                if let TraitEffect::Retaliation { intent, .. } = &tr.effect {
                    if aspect.intent(intent).is_none() {
                        return Err(EngineError::MalformedContent(format!(
                            "aspect {} trait '{}' names unknown intent '{}'",
                            aspect.id, tr.name, intent
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_TOML: &str = r#"
[[cards]]
id = "steady-breath"
name = "Steady Breath"
category = "Technique"
attunement = "stillness"
focus_cost = 1
tags = ["grounding"]
effects = [{ GainComposure = { amount = 3 } }]

[[cards]]
id = "hollow-doubt"
name = "Hollow Doubt"
category = "Trauma"
attunement = "doubt"
focus_cost = 0
effects = []
on_draw = { LoseFocus = { amount = 1 } }

[[aspects]]
id = "the-critic"
name = "The Critic"
max_resolve = 20
resonance_goal = 10
dissonance_threshold = 5
trauma_card = "hollow-doubt"

[[aspects.intents]]
name = "Belittle"
effects = [{ Pressure = { amount = 3 } }]
"#;

    #[test]
    fn test_load_toml_registers_content() {
        let mut library = ContentLibrary::new();
        library.load_toml(SAMPLE_TOML).unwrap();
        assert_eq!(library.card_count(), 2);
        assert_eq!(library.aspect_count(), 1);
        assert!(library.card(&CardId::from("steady-breath")).is_ok());
        assert!(library.aspect(&AspectId::from("the-critic")).is_ok());
        assert!(library.validate().is_ok());
    }

    #[test]
    fn test_unknown_ids_are_named_errors() {
        let library = ContentLibrary::new();
        assert!(matches!(
            library.card(&CardId::from("nope")),
            Err(EngineError::UnknownCard(_))
        ));
        assert!(matches!(
            library.aspect(&AspectId::from("nope")),
            Err(EngineError::UnknownAspect(_))
        ));
    }

    #[test]
    fn test_validate_catches_dangling_trauma_card() {
        let mut library = ContentLibrary::new();
        library
            .load_toml(
                r#"
[[aspects]]
id = "the-void"
name = "The Void"
max_resolve = 10
resonance_goal = 5
dissonance_threshold = 3
trauma_card = "missing-card"

[[aspects.intents]]
name = "Loom"
effects = []
"#,
            )
            .unwrap();
        assert!(matches!(
            library.validate(),
            Err(EngineError::MalformedContent(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_resonance_goal() {
        // A zero goal would make the first card played a vacuous
        // win-by-resonance
        let mut library = ContentLibrary::new();
        library
            .load_toml(
                r#"
[[cards]]
id = "hollow-doubt"
name = "Hollow Doubt"
category = "Trauma"
attunement = "doubt"
focus_cost = 0
effects = []

[[aspects]]
id = "the-void"
name = "The Void"
max_resolve = 10
resonance_goal = 0
dissonance_threshold = 3
trauma_card = "hollow-doubt"

[[aspects.intents]]
name = "Loom"
effects = []
"#,
            )
            .unwrap();
        assert!(matches!(
            library.validate(),
            Err(EngineError::MalformedContent(_))
        ));
    }

    #[test]
    fn test_validate_rejects_negative_focus_cost() {
        let mut library = ContentLibrary::new();
        library
            .load_toml(
                r#"
[[cards]]
id = "free-lunch"
name = "Free Lunch"
category = "Technique"
attunement = "greed"
focus_cost = -2
effects = []
"#,
            )
            .unwrap();
        assert!(matches!(
            library.validate(),
            Err(EngineError::MalformedContent(_))
        ));
    }

    #[test]
    fn test_validate_rejects_nonpositive_resolve_and_threshold() {
        let mut library = ContentLibrary::new();
        library
            .load_toml(
                r#"
[[cards]]
id = "hollow-doubt"
name = "Hollow Doubt"
category = "Trauma"
attunement = "doubt"
focus_cost = 0
effects = []

[[aspects]]
id = "the-husk"
name = "The Husk"
max_resolve = 0
resonance_goal = 5
dissonance_threshold = 0
trauma_card = "hollow-doubt"

[[aspects.intents]]
name = "Loom"
effects = []
"#,
            )
            .unwrap();
        assert!(matches!(
            library.validate(),
            Err(EngineError::MalformedContent(_))
        ));
    }
}
