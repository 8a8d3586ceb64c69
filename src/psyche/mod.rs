//! Long-lived player psyche state
//!
//! Persists across encounters and is fully reconstructible from plain data
//! (ids, numbers, small structs) for the progression/save boundary.

pub mod ledger;
pub mod stance;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::deck::CardPiles;
use crate::encounter::events::EventSink;
use ledger::{Meter, StatChange};
use stance::PersonaStance;

/// The mutable long-lived stats, addressed by name through the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PsycheStat {
    /// 0 is the terminal loss condition for the whole run
    Integrity,
    /// Per-turn action points, refilled each player turn
    Focus,
    /// Meta-resource gating travel and storylet actions
    Clarity,
    Hope,
    Despair,
}

impl std::fmt::Display for PsycheStat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PsycheStat::Integrity => "integrity",
            PsycheStat::Focus => "focus",
            PsycheStat::Clarity => "clarity",
            PsycheStat::Hope => "hope",
            PsycheStat::Despair => "despair",
        };
        write!(f, "{}", name)
    }
}

/// Long-lived player state: stats, attunements, piles, stance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerPsyche {
    pub integrity: Meter,
    pub focus: Meter,
    pub clarity: Meter,
    pub hope: Meter,
    pub despair: Meter,
    /// Named attunement scores used as gates for choices and cards
    pub attunements: AHashMap<String, i32>,
    /// Meta-currency: spent to reveal hidden traits, granted by rewards
    pub insight: u32,
    pub artifacts: Vec<String>,
    pub piles: CardPiles,
    pub stance: Option<PersonaStance>,
}

impl Default for PlayerPsyche {
    fn default() -> Self {
        Self {
            integrity: Meter::full(30),
            focus: Meter::full(3),
            clarity: Meter::full(10),
            hope: Meter::new(5, 10),
            despair: Meter::new(0, 10),
            attunements: AHashMap::new(),
            insight: 0,
            artifacts: Vec::new(),
            piles: CardPiles::default(),
            stance: None,
        }
    }
}

impl PlayerPsyche {
    pub fn new() -> Self {
        Self::default()
    }

    fn meter_mut(&mut self, stat: PsycheStat) -> &mut Meter {
        match stat {
            PsycheStat::Integrity => &mut self.integrity,
            PsycheStat::Focus => &mut self.focus,
            PsycheStat::Clarity => &mut self.clarity,
            PsycheStat::Hope => &mut self.hope,
            PsycheStat::Despair => &mut self.despair,
        }
    }

    pub fn stat(&self, stat: PsycheStat) -> i32 {
        match stat {
            PsycheStat::Integrity => self.integrity.current(),
            PsycheStat::Focus => self.focus.current(),
            PsycheStat::Clarity => self.clarity.current(),
            PsycheStat::Hope => self.hope.current(),
            PsycheStat::Despair => self.despair.current(),
        }
    }

    /// Apply a clamped delta to a named stat, logging it and signalling
    /// threshold crossings
    ///
    /// This is the sole mutation path for psyche stats; the emitted log
    /// line is the audit trail of why the resource changed.
    pub fn modify(
        &mut self,
        stat: PsycheStat,
        delta: i32,
        source: &str,
        sink: &mut EventSink,
    ) -> i32 {
        let change: StatChange = self.meter_mut(stat).modify(delta);
        if change.applied() != 0 {
            sink.info(format!(
                "{} {:+} from {} ({} -> {})",
                stat,
                change.applied(),
                source,
                change.previous,
                change.value
            ));
        } else if delta != 0 {
            sink.info(format!("{} unchanged by {} (clamped)", stat, source));
        }
        if let Some(cross) = change.crossed {
            sink.signal(stat, cross);
        }
        change.value
    }

    pub fn attunement(&self, name: &str) -> i32 {
        self.attunements.get(name).copied().unwrap_or(0)
    }

    pub fn raise_attunement(&mut self, name: &str, by: i32) {
        *self.attunements.entry(name.to_string()).or_insert(0) += by;
    }

    /// Adopt a stance, reverting any previous one first
    ///
    /// The stance's focus bonus adjusts the focus maximum so the per-turn
    /// refill regenerates more while the stance holds.
    pub fn adopt_stance(&mut self, stance: PersonaStance, sink: &mut EventSink) {
        self.clear_stance(sink);
        self.focus.adjust_max(stance.focus_bonus);
        sink.info(format!("Adopted the {} stance", stance.name));
        self.stance = Some(stance);
    }

    pub fn clear_stance(&mut self, sink: &mut EventSink) {
        if let Some(previous) = self.stance.take() {
            self.focus.adjust_max(-previous.focus_bonus);
            sink.info(format!("Dropped the {} stance", previous.name));
        }
    }

    /// Serialize for the progression/save boundary
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reconstruct from saved plain data
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
