//! Bounded stat meters with clamped mutation
//!
//! Every numeric resource in the engine routes mutations through [`Meter`],
//! which clamps to `[0, max]` and reports threshold crossings so dependent
//! systems (terminal checks, hope/despair world effects) can react.

use serde::{Deserialize, Serialize};

/// Crossing into a boundary value during a mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThresholdCross {
    /// The stat just reached 0
    Emptied,
    /// The stat just reached its maximum
    Filled,
}

/// Result of one clamped mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatChange {
    pub previous: i32,
    pub value: i32,
    pub crossed: Option<ThresholdCross>,
}

impl StatChange {
    /// Magnitude actually applied after clamping (signed)
    pub fn applied(&self) -> i32 {
        self.value - self.previous
    }
}

/// A bounded stat: current value clamps to `[0, max]` on every mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meter {
    current: i32,
    max: i32,
}

impl Meter {
    pub fn new(current: i32, max: i32) -> Self {
        let max = max.max(0);
        Self {
            current: current.clamp(0, max),
            max,
        }
    }

    /// A meter starting at its maximum
    pub fn full(max: i32) -> Self {
        Self::new(max, max)
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn is_empty(&self) -> bool {
        self.current == 0
    }

    pub fn is_full(&self) -> bool {
        self.current == self.max
    }

    /// Apply a delta, clamping to `[0, max]`
    ///
    /// Never fails on out-of-range input; saturating arithmetic plus the
    /// clamp absorb any outlier delta.
    pub fn modify(&mut self, delta: i32) -> StatChange {
        let previous = self.current;
        self.current = previous.saturating_add(delta).clamp(0, self.max);

        let crossed = if previous > 0 && self.current == 0 {
            Some(ThresholdCross::Emptied)
        } else if previous < self.max && self.current == self.max {
            Some(ThresholdCross::Filled)
        } else {
            None
        };

        StatChange {
            previous,
            value: self.current,
            crossed,
        }
    }

    /// Restore the stat to its maximum, returning the change
    pub fn refill(&mut self) -> StatChange {
        self.modify(self.max.saturating_sub(self.current))
    }

    /// Adjust the maximum (explicit upgrade effects only)
    ///
    /// Current value re-clamps if the new maximum falls below it.
    pub fn adjust_max(&mut self, delta: i32) {
        self.max = self.max.saturating_add(delta).max(0);
        self.current = self.current.clamp(0, self.max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modify_clamps_low() {
        let mut meter = Meter::new(5, 10);
        let change = meter.modify(-100);
        assert_eq!(change.value, 0);
        assert_eq!(change.crossed, Some(ThresholdCross::Emptied));
        assert!(meter.is_empty());
    }

    #[test]
    fn test_modify_clamps_high() {
        let mut meter = Meter::new(5, 10);
        let change = meter.modify(100);
        assert_eq!(change.value, 10);
        assert_eq!(change.crossed, Some(ThresholdCross::Filled));
        assert!(meter.is_full());
    }

    #[test]
    fn test_no_crossing_inside_range() {
        let mut meter = Meter::new(5, 10);
        let change = meter.modify(2);
        assert_eq!(change.value, 7);
        assert_eq!(change.crossed, None);
    }

    #[test]
    fn test_clamp_only_frame_does_not_recross() {
        let mut meter = Meter::new(1, 10);
        assert_eq!(meter.modify(-5).crossed, Some(ThresholdCross::Emptied));
        // Already at 0: a further negative delta is a clamp-only frame
        assert_eq!(meter.modify(-5).crossed, None);
    }

    #[test]
    fn test_saturating_outliers() {
        let mut meter = Meter::new(5, 10);
        assert_eq!(meter.modify(i32::MAX).value, 10);
        assert_eq!(meter.modify(i32::MIN).value, 0);
    }

    #[test]
    fn test_refill() {
        let mut meter = Meter::new(2, 8);
        let change = meter.refill();
        assert_eq!(change.value, 8);
        assert_eq!(change.applied(), 6);
    }

    #[test]
    fn test_adjust_max_reclamps() {
        let mut meter = Meter::full(10);
        meter.adjust_max(-4);
        assert_eq!(meter.max(), 6);
        assert_eq!(meter.current(), 6);
        meter.adjust_max(4);
        assert_eq!(meter.max(), 10);
        assert_eq!(meter.current(), 6);
    }
}
