//! Encounter orchestration: turn sequencing, lifecycle, rewards
//!
//! One engine is constructed per run and owns all mutable state explicitly:
//! content registry, config, RNG, the player psyche, and the live encounter.
//! There is no ambient global; every mutation flows through these fields on
//! a single logical thread.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::content::library::ContentLibrary;
use crate::core::config::EncounterConfig;
use crate::core::error::{EngineError, Result};
use crate::core::types::{AspectId, CardId, EncounterId};
use crate::encounter::aspect::AspectInstance;
use crate::encounter::events::{
    AspectView, EncounterObserver, EncounterSnapshot, EventSink, LogLine, PlayerView, StatView,
    StatusView, ThresholdSignal,
};
use crate::encounter::resolver;
use crate::encounter::{terminal_outcome, ActiveEncounter, EncounterOutcome, EncounterPhase};
use crate::content::aspect::TraitEffect;
use crate::psyche::ledger::Meter;
use crate::psyche::{PlayerPsyche, PsycheStat};

/// Drives encounters for one run
pub struct EncounterEngine {
    content: ContentLibrary,
    config: EncounterConfig,
    rng: ChaCha8Rng,
    psyche: PlayerPsyche,
    events: EventSink,
    phase: EncounterPhase,
    active: Option<ActiveEncounter>,
    last_outcome: Option<EncounterOutcome>,
}

impl EncounterEngine {
    /// Build an engine for one run
    ///
    /// Validates the config and the content registry's cross-references up
    /// front so authoring mistakes fail here rather than mid-encounter.
    pub fn new(
        content: ContentLibrary,
        config: EncounterConfig,
        psyche: PlayerPsyche,
        seed: u64,
    ) -> Result<Self> {
        config.validate().map_err(EngineError::InvalidConfig)?;
        content.validate()?;
        Ok(Self {
            content,
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            psyche,
            events: EventSink::new(),
            phase: EncounterPhase::Inactive,
            active: None,
            last_outcome: None,
        })
    }

    pub fn set_observer(&mut self, observer: Box<dyn EncounterObserver>) {
        self.events.set_observer(observer);
    }

    pub fn phase(&self) -> EncounterPhase {
        self.phase
    }

    pub fn last_outcome(&self) -> Option<EncounterOutcome> {
        self.last_outcome
    }

    pub fn psyche(&self) -> &PlayerPsyche {
        &self.psyche
    }

    /// Mutable psyche access for between-encounter progression
    pub fn psyche_mut(&mut self) -> &mut PlayerPsyche {
        &mut self.psyche
    }

    pub fn aspect(&self) -> Option<&AspectInstance> {
        self.active.as_ref().map(|e| &e.aspect)
    }

    pub fn log_lines(&self) -> &[LogLine] {
        self.events.lines()
    }

    /// Drain queued stat threshold signals (hope/despair world effects,
    /// run-ended propagation)
    pub fn drain_signals(&mut self) -> Vec<ThresholdSignal> {
        self.events.take_thresholds()
    }

    /// Begin an encounter against the named aspect
    ///
    /// The current hand is lost to the discard pile, encounter composure
    /// resets to zero, the opening hand is drawn, and the aspect telegraphs
    /// its first intent.
    pub fn start_encounter(&mut self, aspect_id: &AspectId) -> Result<()> {
        if self.active.is_some() {
            self.events.warn("An encounter is already active");
            return Err(EngineError::InvalidAction(
                "an encounter is already active".into(),
            ));
        }
        let template = self.content.aspect(aspect_id)?.clone();
        self.last_outcome = None;

        let discarded = self.psyche.piles.discard_hand();
        if discarded > 0 {
            self.events
                .info(format!("Your hand of {} cards scatters to discard", discarded));
        }

        let mut aspect = AspectInstance::from_template(&template);
        self.events.info(format!("{} confronts you", aspect.name));
        let first_intent = aspect.select_intent(&mut self.rng).map(|i| i.name.clone());
        if let Some(name) = first_intent {
            self.events.info(format!("{} intends: {}", aspect.name, name));
        }

        self.active = Some(ActiveEncounter {
            id: EncounterId::new(),
            aspect,
            player_composure: 0,
            turn: 1,
        });

        self.begin_player_turn(true)?;
        Ok(())
    }

    /// Enter a player turn: refill focus, then draw
    ///
    /// The first turn uses the opening draw size; later turns the per-turn
    /// size. The draw comes after the refill so a drawn Trauma's focus
    /// drawback survives into the turn.
    fn begin_player_turn(&mut self, first: bool) -> Result<()> {
        self.phase = EncounterPhase::PlayerTurn;
        let change = self.psyche.focus.refill();
        if change.applied() != 0 {
            self.events
                .info(format!("Focus restored to {}", change.value));
        }
        let draw_count = if first {
            self.config.initial_draw
        } else {
            self.config.per_turn_draw
        };
        let report = self.psyche.piles.draw(
            draw_count,
            self.config.max_hand_size,
            &self.content,
            &mut self.rng,
            &mut self.events,
        )?;
        resolver::apply_on_draw(&report, &mut self.psyche, &mut self.events);
        self.emit_snapshot();
        Ok(())
    }

    fn ensure_player_turn(&mut self) -> Result<()> {
        if self.phase != EncounterPhase::PlayerTurn || self.active.is_none() {
            self.events.warn("Rejected: no player turn in progress");
            return Err(EngineError::InvalidAction(
                "no player turn in progress".into(),
            ));
        }
        Ok(())
    }

    /// Play a card from the hand
    ///
    /// Validate-then-apply: phase, hand membership, focus, and attunement
    /// gates are all checked before any state mutates, so a rejection
    /// leaves the simulation untouched. Returns a summary of what the card
    /// did.
    pub fn play_card(&mut self, card_id: &CardId) -> Result<String> {
        self.ensure_player_turn()?;
        let card = self.content.card(card_id)?.clone();

        if !self.psyche.piles.hand_contains(card_id) {
            self.events
                .warn(format!("Rejected: {} is not in your hand", card.name));
            return Err(EngineError::CardNotInHand(card_id.clone()));
        }
        let have = self.psyche.focus.current();
        if have < card.focus_cost {
            self.events.warn(format!(
                "Rejected: {} costs {} focus, you have {}",
                card.name, card.focus_cost, have
            ));
            return Err(EngineError::InsufficientFocus {
                card: card_id.clone(),
                need: card.focus_cost,
                have,
            });
        }
        if let Some(req) = &card.requirement {
            let score = self.psyche.attunement(&req.attunement);
            if score < req.min {
                self.events.warn(format!(
                    "Rejected: {} calls for {} {} (you have {})",
                    card.name, req.attunement, req.min, score
                ));
                return Err(EngineError::AttunementGate {
                    card: card_id.clone(),
                    attunement: req.attunement.clone(),
                    need: req.min,
                    have: score,
                });
            }
        }

        self.psyche
            .modify(PsycheStat::Focus, -card.focus_cost, &card.name, &mut self.events);
        self.psyche.piles.play(card_id)?;
        self.events.info(format!("You play {}", card.name));

        let Self {
            content,
            config,
            rng,
            psyche,
            events,
            active,
            ..
        } = self;
        let enc = active
            .as_mut()
            .ok_or_else(|| EngineError::InvalidAction("no active encounter".into()))?;

        let resolution = resolver::resolve_card(&card, psyche, enc, content, config, rng, events)?;
        let outcome = match resolution.outcome {
            Some(outcome) => Some(outcome),
            None => resolver::check_reactive(&card, psyche, enc, content, config, rng, events)?,
        };

        match outcome {
            Some(outcome) => self.finish(outcome),
            None => self.emit_snapshot(),
        }
        Ok(resolution.message)
    }

    /// End the player turn and run the aspect's turn
    ///
    /// Order: pre-action passives (grudge, composure regen), status ticks,
    /// the telegraphed intent, terminal re-check, next intent selection,
    /// then a fresh player turn if the encounter survives.
    pub fn end_turn(&mut self) -> Result<()> {
        self.ensure_player_turn()?;
        self.phase = EncounterPhase::AspectTurn;

        let Self {
            content,
            config,
            rng,
            psyche,
            events,
            active,
            ..
        } = self;
        let enc = active
            .as_mut()
            .ok_or_else(|| EngineError::InvalidAction("no active encounter".into()))?;

        // Pre-action passives feed off the took-pressure flag before it resets
        let mut composure_gain = 0;
        for tr in enc.aspect.traits() {
            match tr.effect {
                TraitEffect::ComposureRegen { amount } => composure_gain += amount,
                TraitEffect::Grudge { composure_gain: gain } if enc.aspect.took_pressure => {
                    events.info(format!("{} simmers: {}", enc.aspect.name, tr.name));
                    composure_gain += gain;
                }
                _ => {}
            }
        }
        if composure_gain > 0 {
            enc.aspect.composure =
                (enc.aspect.composure + composure_gain).min(config.composure_cap);
            events.info(format!(
                "{} steadies itself (composure {})",
                enc.aspect.name, enc.aspect.composure
            ));
        }
        enc.aspect.took_pressure = false;

        enc.aspect.tick_statuses(events);

        let intent = enc.aspect.current_intent().cloned();
        let outcome = match intent {
            Some(intent) => {
                resolver::execute_intent(&intent, psyche, enc, content, config, rng, events)?
            }
            None => {
                events.warn(format!("{} hesitates (no intent chosen)", enc.aspect.name));
                None
            }
        };
        let outcome = outcome.or_else(|| terminal_outcome(psyche, enc));

        if let Some(outcome) = outcome {
            self.finish(outcome);
            return Ok(());
        }

        let next = enc.aspect.select_intent(rng).map(|i| i.name.clone());
        if let Some(name) = next {
            events.info(format!("{} intends: {}", enc.aspect.name, name));
        }
        enc.turn += 1;

        self.begin_player_turn(false)
    }

    /// Spend insight to reveal one hidden trait, chosen uniformly
    pub fn reveal_trait(&mut self) -> Result<String> {
        self.ensure_player_turn()?;
        let cost = self.config.reveal_insight_cost;
        if self.psyche.insight < cost {
            self.events.warn(format!(
                "Rejected: revealing a trait costs {} insight, you have {}",
                cost, self.psyche.insight
            ));
            return Err(EngineError::InvalidAction("not enough insight".into()));
        }

        let Self {
            rng,
            psyche,
            events,
            active,
            ..
        } = self;
        let enc = active
            .as_mut()
            .ok_or_else(|| EngineError::InvalidAction("no active encounter".into()))?;

        match enc.aspect.reveal_random_hidden(rng) {
            Some(name) => {
                psyche.insight -= cost;
                events.info(format!(
                    "Insight spent: {} harbors {}",
                    enc.aspect.name, name
                ));
                self.emit_snapshot();
                Ok(name)
            }
            None => {
                events.warn("Rejected: no hidden traits left to reveal");
                Err(EngineError::InvalidAction(
                    "no hidden traits left to reveal".into(),
                ))
            }
        }
    }

    /// Disengage from the encounter (player turn only)
    ///
    /// A distinct terminal with its own penalties and no rewards.
    pub fn flee(&mut self) -> Result<()> {
        self.ensure_player_turn()?;
        self.events.info("You pull back from the encounter");
        self.finish(EncounterOutcome::Disengage);
        Ok(())
    }

    /// Resolve the encounter: rewards on wins, penalties on disengage
    ///
    /// Safe against duplicate invocation: once the active encounter is
    /// taken, a second call is a logged no-op.
    fn finish(&mut self, outcome: EncounterOutcome) {
        let Some(enc) = self.active.take() else {
            self.events
                .warn("Encounter already resolved; duplicate finish ignored");
            return;
        };

        match outcome {
            EncounterOutcome::WinByResolve | EncounterOutcome::WinByResonance => {
                let rewards = &enc.aspect.rewards;
                if rewards.insight > 0 {
                    self.psyche.insight += rewards.insight;
                    self.events
                        .info(format!("Gained {} insight", rewards.insight));
                }
                if let Some(card) = rewards.card_pool.choose(&mut self.rng) {
                    let name = self
                        .content
                        .card(card)
                        .map(|c| c.name.clone())
                        .unwrap_or_else(|_| card.to_string());
                    self.psyche.piles.inject_discard(card.clone());
                    self.events
                        .info(format!("{} joins your discard pile", name));
                }
                if let Some(artifact) = rewards.artifact_pool.choose(&mut self.rng) {
                    self.psyche.artifacts.push(artifact.clone());
                    self.events.info(format!("You carry away {}", artifact));
                }
            }
            EncounterOutcome::Disengage => {
                self.psyche.modify(
                    PsycheStat::Clarity,
                    -self.config.flee_clarity_penalty,
                    "disengage",
                    &mut self.events,
                );
                self.psyche.modify(
                    PsycheStat::Despair,
                    self.config.flee_despair_penalty,
                    "disengage",
                    &mut self.events,
                );
            }
            EncounterOutcome::Defeat => {
                self.events
                    .warn("Your integrity is spent; the run ends here");
            }
        }

        self.phase = EncounterPhase::Inactive;
        self.last_outcome = Some(outcome);
        self.events.info(format!(
            "Encounter with {} resolved: {}",
            enc.aspect.name, outcome
        ));
        self.emit_snapshot();
    }

    /// Build the structured state snapshot for the presentation layer
    pub fn snapshot(&self) -> EncounterSnapshot {
        fn view(meter: Meter) -> StatView {
            StatView {
                current: meter.current(),
                max: meter.max(),
            }
        }

        let player = PlayerView {
            integrity: view(self.psyche.integrity),
            focus: view(self.psyche.focus),
            clarity: view(self.psyche.clarity),
            hope: view(self.psyche.hope),
            despair: view(self.psyche.despair),
            composure: self.active.as_ref().map_or(0, |e| e.player_composure),
            insight: self.psyche.insight,
            hand: self.psyche.piles.hand().to_vec(),
            stance: self.psyche.stance.as_ref().map(|s| s.name.clone()),
        };

        let aspect = self.active.as_ref().map(|e| AspectView {
            id: e.aspect.id.clone(),
            name: e.aspect.name.clone(),
            resolve: view(e.aspect.resolve),
            composure: e.aspect.composure,
            resonance: view(e.aspect.resonance),
            dissonance: view(e.aspect.dissonance),
            known_traits: e.aspect.known_trait_names(),
            statuses: e
                .aspect
                .statuses
                .iter()
                .map(|s| StatusView {
                    name: s.name.clone(),
                    remaining_turns: s.remaining_turns,
                })
                .collect(),
            intent: e.aspect.current_intent().map(|i| i.name.clone()),
        });

        EncounterSnapshot {
            phase: self.phase,
            turn: self.active.as_ref().map_or(0, |e| e.turn),
            player,
            aspect,
        }
    }

    fn emit_snapshot(&mut self) {
        let snapshot = self.snapshot();
        self.events.state_changed(&snapshot);
    }
}

impl std::fmt::Debug for EncounterEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncounterEngine")
            .field("phase", &self.phase)
            .field("active", &self.active.is_some())
            .field("last_outcome", &self.last_outcome)
            .finish()
    }
}
