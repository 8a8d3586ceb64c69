//! Turn-based encounter simulation
//!
//! The orchestrator drives turns; player actions go through the resolver,
//! which mutates the psyche ledger and the live aspect; terminal conditions
//! are re-evaluated after every mutation, not only at turn boundaries.

pub mod aspect;
pub mod events;
pub mod orchestrator;
pub mod resolver;

use serde::{Deserialize, Serialize};

use crate::core::types::{EncounterId, Turn};
use crate::psyche::PlayerPsyche;
use aspect::AspectInstance;

pub use orchestrator::EncounterEngine;

/// Where the encounter state machine currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncounterPhase {
    Inactive,
    PlayerTurn,
    AspectTurn,
}

/// Terminal result of an encounter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncounterOutcome {
    /// Aspect resolve reached 0
    WinByResolve,
    /// Aspect resonance reached its goal
    WinByResonance,
    /// Player integrity reached 0; the run ends
    Defeat,
    /// Player fled; penalties apply, no rewards
    Disengage,
}

impl EncounterOutcome {
    pub fn is_win(&self) -> bool {
        matches!(
            self,
            EncounterOutcome::WinByResolve | EncounterOutcome::WinByResonance
        )
    }
}

impl std::fmt::Display for EncounterOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EncounterOutcome::WinByResolve => "win-by-resolve",
            EncounterOutcome::WinByResonance => "win-by-resonance",
            EncounterOutcome::Defeat => "defeat",
            EncounterOutcome::Disengage => "disengage",
        };
        write!(f, "{}", name)
    }
}

/// Encounter-scoped state, dropped when the encounter resolves
#[derive(Debug, Clone)]
pub struct ActiveEncounter {
    pub id: EncounterId,
    pub aspect: AspectInstance,
    /// Transient player shield; not persisted to the psyche
    pub player_composure: i32,
    pub turn: Turn,
}

/// First terminal condition reached decides the encounter
///
/// Checked after every mutation that could cross a threshold. Order within
/// one check: defeat, then win-by-resolve, then win-by-resonance.
pub(crate) fn terminal_outcome(
    psyche: &PlayerPsyche,
    enc: &ActiveEncounter,
) -> Option<EncounterOutcome> {
    if psyche.integrity.is_empty() {
        return Some(EncounterOutcome::Defeat);
    }
    if enc.aspect.resolve.is_empty() {
        return Some(EncounterOutcome::WinByResolve);
    }
    if enc.aspect.resonance.is_full() {
        return Some(EncounterOutcome::WinByResonance);
    }
    None
}
