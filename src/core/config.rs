//! Encounter tuning configuration with documented constants
//!
//! All encounter pacing numbers are collected here with explanations of
//! their purpose and how they interact with each other.

use serde::{Deserialize, Serialize};

/// Configuration for the encounter simulation
///
/// These values have been tuned to produce readable encounter pacing.
/// Changing them will affect difficulty and turn rhythm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterConfig {
    // === HAND AND DRAW ===
    /// Maximum cards the player may hold
    ///
    /// Draw attempts beyond this are logged no-ops, never errors.
    pub max_hand_size: usize,

    /// Cards drawn when an encounter starts
    ///
    /// The first player turn does not draw again; this opening draw
    /// covers it.
    pub initial_draw: usize,

    /// Cards drawn at the start of every subsequent player turn
    pub per_turn_draw: usize,

    // === COMPOSURE ===
    /// Soft cap for composure shields on both the player and the aspect
    ///
    /// Composure has no hard maximum of its own; this cap keeps shield
    /// stacking from making either side untouchable.
    pub composure_cap: i32,

    // === TRAIT REVEAL ===
    /// Insight spent to reveal one hidden aspect trait
    pub reveal_insight_cost: u32,

    // === DISENGAGE PENALTIES ===
    /// Clarity lost when fleeing an encounter
    ///
    /// Fleeing trades long-run travel capacity for survival.
    pub flee_clarity_penalty: i32,

    /// Despair gained when fleeing an encounter
    pub flee_despair_penalty: i32,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            max_hand_size: 7,
            initial_draw: 5,
            per_turn_draw: 1,
            composure_cap: 30,
            reveal_insight_cost: 1,
            flee_clarity_penalty: 1,
            flee_despair_penalty: 1,
        }
    }
}

impl EncounterConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.initial_draw > self.max_hand_size {
            return Err(format!(
                "initial_draw ({}) should be <= max_hand_size ({})",
                self.initial_draw, self.max_hand_size
            ));
        }

        if self.per_turn_draw > self.max_hand_size {
            return Err(format!(
                "per_turn_draw ({}) should be <= max_hand_size ({})",
                self.per_turn_draw, self.max_hand_size
            ));
        }

        if self.composure_cap <= 0 {
            return Err("composure_cap must be positive".into());
        }

        if self.flee_clarity_penalty < 0 || self.flee_despair_penalty < 0 {
            return Err("flee penalties must be non-negative".into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EncounterConfig::default().validate().is_ok());
    }

    #[test]
    fn test_oversized_initial_draw_rejected() {
        let config = EncounterConfig {
            initial_draw: 12,
            max_hand_size: 7,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nonpositive_composure_cap_rejected() {
        let config = EncounterConfig {
            composure_cap: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
