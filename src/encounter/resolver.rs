//! Card and intent effect resolution
//!
//! Effects are closed enum variants dispatched by exhaustive match; the
//! resolver receives only the handles it needs (psyche ledger, live
//! encounter, content registry), never the whole world.

use rand_chacha::ChaCha8Rng;

use crate::content::aspect::{IntentDef, IntentEffect, TraitEffect};
use crate::content::card::{CardDefinition, CardEffect, OnDrawEffect};
use crate::content::library::ContentLibrary;
use crate::core::config::EncounterConfig;
use crate::core::error::{EngineError, Result};
use crate::deck::DrawReport;
use crate::encounter::events::EventSink;
use crate::encounter::{terminal_outcome, ActiveEncounter, EncounterOutcome};
use crate::psyche::ledger::{Meter, ThresholdCross};
use crate::psyche::{PlayerPsyche, PsycheStat};

/// What one pressure application did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressureOutcome {
    /// Pressure soaked by the composure shield
    pub absorbed: i32,
    /// Pressure that reached the underlying meter (after its clamp)
    pub spilled: i32,
    /// Threshold crossing on the underlying meter, if any
    pub crossed: Option<ThresholdCross>,
}

/// Shield-first pressure ordering, shared by both sides
///
/// Composure absorbs up to its current value; the remainder reduces the
/// underlying meter, which clamps at 0. Given composure `C` and pressure
/// `P`: composure becomes `max(0, C - P)` and the meter loses at most
/// `max(0, P - C)`.
pub fn absorb_pressure(composure: &mut i32, meter: &mut Meter, amount: i32) -> PressureOutcome {
    let amount = amount.max(0);
    let absorbed = amount.min(*composure);
    *composure -= absorbed;
    let change = meter.modify(-(amount - absorbed));
    PressureOutcome {
        absorbed,
        spilled: -change.applied(),
        crossed: change.crossed,
    }
}

/// Result of resolving one played card
#[derive(Debug, Clone)]
pub struct CardResolution {
    /// Human-readable outcome summary for the caller
    pub message: String,
    /// Terminal condition reached mid-resolution, if any
    pub outcome: Option<EncounterOutcome>,
}

/// Apply Trauma on-draw drawbacks surfaced by a draw
///
/// Runs synchronously as part of the draw's observable contract: the
/// drawback lands before the player acts.
pub(crate) fn apply_on_draw(report: &DrawReport, psyche: &mut PlayerPsyche, sink: &mut EventSink) {
    for (_card, effect) in &report.on_draw {
        match effect {
            OnDrawEffect::LoseFocus { amount } => {
                psyche.modify(PsycheStat::Focus, -amount, "trauma on draw", sink);
            }
            OnDrawEffect::GainDespair { amount } => {
                psyche.modify(PsycheStat::Despair, *amount, "trauma on draw", sink);
            }
        }
    }
}

/// Resolve a played card's declared effects against the ledger and aspect
///
/// Terminal conditions are checked after every effect; resolution stops at
/// the first one reached.
pub fn resolve_card(
    card: &CardDefinition,
    psyche: &mut PlayerPsyche,
    enc: &mut ActiveEncounter,
    content: &ContentLibrary,
    config: &EncounterConfig,
    rng: &mut ChaCha8Rng,
    sink: &mut EventSink,
) -> Result<CardResolution> {
    let mut notes: Vec<String> = Vec::new();

    for effect in &card.effects {
        match effect {
            CardEffect::Pressure { amount } => {
                let stance_bonus = psyche
                    .stance
                    .as_ref()
                    .map_or(0, |s| s.pressure_bonus_for(&card.tags));
                let resistance = enc.aspect.pressure_resistance();
                let effective = (amount + stance_bonus - resistance).max(0);
                if resistance > 0 {
                    sink.info(format!(
                        "{} resists {} pressure",
                        enc.aspect.name,
                        resistance.min(amount + stance_bonus)
                    ));
                }
                let hit = absorb_pressure(
                    &mut enc.aspect.composure,
                    &mut enc.aspect.resolve,
                    effective,
                );
                if effective > 0 {
                    enc.aspect.took_pressure = true;
                }
                sink.info(format!(
                    "{} takes {} pressure ({} absorbed, resolve {})",
                    enc.aspect.name,
                    effective,
                    hit.absorbed,
                    enc.aspect.resolve.current()
                ));
                notes.push(format!("{} pressure", effective));
            }
            CardEffect::BuildResonance { amount } => {
                let bonus = enc.aspect.resonance_bonus_for(&card.tags);
                if bonus > 0 {
                    sink.info(format!("Resonance deepens (+{} from a trait)", bonus));
                }
                let change = enc.aspect.resonance.modify(amount + bonus);
                sink.info(format!(
                    "Resonance with {} rises to {}/{}",
                    enc.aspect.name,
                    change.value,
                    enc.aspect.resonance.max()
                ));
                notes.push(format!("{} resonance", change.applied()));
            }
            CardEffect::GainComposure { amount } => {
                enc.player_composure =
                    (enc.player_composure + (*amount).max(0)).min(config.composure_cap);
                sink.info(format!(
                    "Your composure rises to {} ({})",
                    enc.player_composure, card.name
                ));
                notes.push(format!("composure {}", enc.player_composure));
            }
            CardEffect::RestoreIntegrity { amount } => {
                psyche.modify(PsycheStat::Integrity, *amount, &card.name, sink);
            }
            CardEffect::EaseDissonance { amount } => {
                let change = enc.aspect.dissonance.modify(-amount);
                sink.info(format!(
                    "Dissonance eases to {}/{}",
                    change.value,
                    enc.aspect.dissonance.max()
                ));
            }
            CardEffect::Draw { count } => {
                let report =
                    psyche
                        .piles
                        .draw(*count, config.max_hand_size, content, rng, sink)?;
                apply_on_draw(&report, psyche, sink);
                notes.push(format!("drew {}", report.drawn.len()));
            }
            CardEffect::FocusSurge { amount } => {
                psyche.modify(PsycheStat::Focus, *amount, &card.name, sink);
            }
            CardEffect::KindleHope { amount } => {
                psyche.modify(PsycheStat::Hope, *amount, &card.name, sink);
            }
        }

        if let Some(outcome) = terminal_outcome(psyche, enc) {
            return Ok(CardResolution {
                message: notes.join(", "),
                outcome: Some(outcome),
            });
        }
    }

    Ok(CardResolution {
        message: notes.join(", "),
        outcome: None,
    })
}

/// Check reactive traits immediately after a card's base effect
///
/// Runs before control returns to the player, so the consequence is seen
/// before the next card is chosen.
pub fn check_reactive(
    card: &CardDefinition,
    psyche: &mut PlayerPsyche,
    enc: &mut ActiveEncounter,
    content: &ContentLibrary,
    config: &EncounterConfig,
    rng: &mut ChaCha8Rng,
    sink: &mut EventSink,
) -> Result<Option<EncounterOutcome>> {
    let mut triggered = Vec::new();
    for tr in enc.aspect.traits() {
        if let TraitEffect::Retaliation {
            resolve_percent,
            tag,
            intent,
            status,
        } = &tr.effect
        {
            let below = enc.aspect.resolve_fraction() < (*resolve_percent as f32 / 100.0);
            if below && card.has_tag(tag) {
                triggered.push((tr.name.clone(), intent.clone(), status.clone()));
            }
        }
    }

    for (trait_name, intent_name, status) in triggered {
        let intent = enc.aspect.find_intent(&intent_name).cloned().ok_or_else(|| {
            EngineError::MalformedContent(format!(
                "trait '{}' names unknown intent '{}'",
                trait_name, intent_name
            ))
        })?;
        sink.warn(format!(
            "{} flares: {} retaliates with {}",
            trait_name, enc.aspect.name, intent.name
        ));
        let outcome = execute_intent(&intent, psyche, enc, content, config, rng, sink)?;
        if let Some(status) = status {
            enc.aspect.apply_status(status, sink);
        }
        if outcome.is_some() {
            return Ok(outcome);
        }
    }

    Ok(None)
}

/// Execute one aspect intent against the player
///
/// Shared between the aspect turn and reactive retaliations. Terminal
/// conditions are checked after every effect.
pub fn execute_intent(
    intent: &IntentDef,
    psyche: &mut PlayerPsyche,
    enc: &mut ActiveEncounter,
    content: &ContentLibrary,
    config: &EncounterConfig,
    rng: &mut ChaCha8Rng,
    sink: &mut EventSink,
) -> Result<Option<EncounterOutcome>> {
    sink.info(format!("{} acts: {}", enc.aspect.name, intent.name));

    for effect in &intent.effects {
        match effect {
            IntentEffect::Pressure { amount } => {
                let total = (amount + enc.aspect.intent_pressure_bonus()).max(0);
                let hit = absorb_pressure(&mut enc.player_composure, &mut psyche.integrity, total);
                sink.info(format!(
                    "You take {} pressure ({} absorbed, integrity {})",
                    total,
                    hit.absorbed,
                    psyche.integrity.current()
                ));
                if let Some(cross) = hit.crossed {
                    sink.signal(PsycheStat::Integrity, cross);
                }
            }
            IntentEffect::BuildDissonance { amount } => {
                let change = enc.aspect.dissonance.modify(*amount);
                sink.info(format!(
                    "Dissonance builds to {}/{}",
                    change.value,
                    enc.aspect.dissonance.max()
                ));
                if enc.aspect.dissonance.is_full() && !enc.aspect.dissonance_break_fired {
                    enc.aspect.dissonance_break_fired = true;
                    let trauma = enc.aspect.trauma_card.clone();
                    let name = content
                        .card(&trauma)
                        .map(|c| c.name.clone())
                        .unwrap_or_else(|_| trauma.to_string());
                    psyche.piles.inject_discard(trauma);
                    sink.warn(format!(
                        "Dissonance breaks: {} slips into your discard pile",
                        name
                    ));
                }
            }
            IntentEffect::GainComposure { amount } => {
                enc.aspect.composure =
                    (enc.aspect.composure + (*amount).max(0)).min(config.composure_cap);
                sink.info(format!(
                    "{} steadies itself (composure {})",
                    enc.aspect.name, enc.aspect.composure
                ));
            }
            IntentEffect::RestoreResolve { amount } => {
                let change = enc.aspect.resolve.modify(*amount);
                sink.info(format!(
                    "{} hardens its resolve to {}",
                    enc.aspect.name, change.value
                ));
            }
            IntentEffect::DrainFocus { amount } => {
                psyche.modify(PsycheStat::Focus, -amount, &intent.name, sink);
            }
            IntentEffect::ForceDiscard { count } => {
                for _ in 0..*count {
                    match psyche.piles.discard_random(rng) {
                        Some(card) => {
                            let name = content
                                .card(&card)
                                .map(|c| c.name.clone())
                                .unwrap_or_else(|_| card.to_string());
                            sink.info(format!("{} forces you to discard {}", intent.name, name));
                        }
                        None => {
                            sink.info("No cards in hand to discard");
                            break;
                        }
                    }
                }
            }
            IntentEffect::InflictDespair { amount } => {
                psyche.modify(PsycheStat::Despair, *amount, &intent.name, sink);
            }
        }

        if let Some(outcome) = terminal_outcome(psyche, enc) {
            return Ok(Some(outcome));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::aspect::{AspectRewards, AspectTemplate, IntentPolicy};
    use crate::core::types::{AspectId, CardId, EncounterId};
    use crate::encounter::aspect::AspectInstance;
    use rand::SeedableRng;

    fn encounter_fixture() -> ActiveEncounter {
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
                name: "Brood".to_string(),
                description: String::new(),
                effects: vec![IntentEffect::GainComposure { amount: 40 }],
            }],
            intent_policy: IntentPolicy::Cycling,
            rewards: AspectRewards::default(),
        };
        ActiveEncounter {
            id: EncounterId::new(),
            aspect: AspectInstance::from_template(&template),
            player_composure: 0,
            turn: 1,
        }
    }

    #[test]
    fn test_card_composure_gain_clamps_at_cap() {
        let card = CardDefinition {
            id: CardId::from("steady-breath"),
            name: "Steady Breath".to_string(),
            category: crate::content::card::CardCategory::Technique,
            attunement: "stillness".to_string(),
            focus_cost: 1,
            tags: vec![],
            description: String::new(),
            effects: vec![CardEffect::GainComposure { amount: 40 }],
            on_draw: None,
            requirement: None,
        };
        let mut psyche = PlayerPsyche::new();
        let mut enc = encounter_fixture();
        let content = ContentLibrary::new();
        let config = EncounterConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut sink = EventSink::new();

        let resolution = resolve_card(
            &card, &mut psyche, &mut enc, &content, &config, &mut rng, &mut sink,
        )
        .unwrap();
        assert_eq!(enc.player_composure, config.composure_cap);
        assert!(resolution.outcome.is_none());
    }

    #[test]
    fn test_intent_composure_gain_clamps_at_cap() {
        let mut psyche = PlayerPsyche::new();
        let mut enc = encounter_fixture();
        let intent = enc.aspect.find_intent("Brood").cloned().unwrap();
        let content = ContentLibrary::new();
        let config = EncounterConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut sink = EventSink::new();

        let outcome = execute_intent(
            &intent, &mut psyche, &mut enc, &content, &config, &mut rng, &mut sink,
        )
        .unwrap();
        assert_eq!(enc.aspect.composure, config.composure_cap);
        assert!(outcome.is_none());
    }

    #[test]
    fn test_absorb_pressure_shield_first() {
        let mut composure = 3;
        let mut resolve = Meter::full(10);
        let hit = absorb_pressure(&mut composure, &mut resolve, 5);
        assert_eq!(composure, 0);
        assert_eq!(hit.absorbed, 3);
        assert_eq!(hit.spilled, 2);
        assert_eq!(resolve.current(), 8);
    }

    #[test]
    fn test_absorb_pressure_fully_shielded() {
        let mut composure = 6;
        let mut resolve = Meter::full(10);
        let hit = absorb_pressure(&mut composure, &mut resolve, 4);
        assert_eq!(composure, 2);
        assert_eq!(hit.absorbed, 4);
        assert_eq!(hit.spilled, 0);
        assert_eq!(resolve.current(), 10);
    }

    #[test]
    fn test_absorb_pressure_clamps_at_zero() {
        let mut composure = 0;
        let mut resolve = Meter::new(3, 10);
        let hit = absorb_pressure(&mut composure, &mut resolve, 9);
        assert_eq!(resolve.current(), 0);
        assert_eq!(hit.spilled, 3);
        assert_eq!(hit.crossed, Some(ThresholdCross::Emptied));
    }

    #[test]
    fn test_negative_pressure_is_ignored() {
        let mut composure = 2;
        let mut resolve = Meter::full(10);
        let hit = absorb_pressure(&mut composure, &mut resolve, -5);
        assert_eq!(composure, 2);
        assert_eq!(resolve.current(), 10);
        assert_eq!(hit.absorbed, 0);
        assert_eq!(hit.spilled, 0);
    }
}
