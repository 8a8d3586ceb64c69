//! Event sink, observer interface, and state snapshots
//!
//! The engine is presentation-agnostic: it emits log lines and structured
//! snapshots through a narrow observer interface and retains every log line
//! in memory as the audit trail of why a resource changed.

use serde::{Deserialize, Serialize};

use crate::core::types::{AspectId, CardId, Turn};
use crate::encounter::EncounterPhase;
use crate::psyche::ledger::ThresholdCross;
use crate::psyche::PsycheStat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogSeverity {
    Info,
    Warning,
}

/// One retained line of the encounter log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogLine {
    pub text: String,
    pub severity: LogSeverity,
}

/// A player stat crossing empty or full, queued for dependent systems
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdSignal {
    pub stat: PsycheStat,
    pub cross: ThresholdCross,
}

/// Narrow callback interface supplied by the presentation layer
///
/// Default methods are no-ops so observers implement only what they need.
pub trait EncounterObserver {
    fn on_log_line(&mut self, _text: &str, _severity: LogSeverity) {}
    fn on_state_changed(&mut self, _snapshot: &EncounterSnapshot) {}
}

/// Observer that ignores everything (headless/test runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl EncounterObserver for NullObserver {}

/// Collects log lines and threshold signals, forwarding to the observer
pub struct EventSink {
    lines: Vec<LogLine>,
    thresholds: Vec<ThresholdSignal>,
    observer: Box<dyn EncounterObserver>,
}

impl Default for EventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            thresholds: Vec::new(),
            observer: Box::new(NullObserver),
        }
    }

    pub fn set_observer(&mut self, observer: Box<dyn EncounterObserver>) {
        self.observer = observer;
    }

    pub fn info(&mut self, text: impl Into<String>) {
        let text = text.into();
        tracing::info!("{}", text);
        self.observer.on_log_line(&text, LogSeverity::Info);
        self.lines.push(LogLine {
            text,
            severity: LogSeverity::Info,
        });
    }

    pub fn warn(&mut self, text: impl Into<String>) {
        let text = text.into();
        tracing::warn!("{}", text);
        self.observer.on_log_line(&text, LogSeverity::Warning);
        self.lines.push(LogLine {
            text,
            severity: LogSeverity::Warning,
        });
    }

    /// Record a threshold crossing for dependent systems to drain
    pub fn signal(&mut self, stat: PsycheStat, cross: ThresholdCross) {
        let word = match cross {
            ThresholdCross::Emptied => "exhausted",
            ThresholdCross::Filled => "full",
        };
        self.info(format!("{} is {}", stat, word));
        self.thresholds.push(ThresholdSignal { stat, cross });
    }

    pub fn state_changed(&mut self, snapshot: &EncounterSnapshot) {
        self.observer.on_state_changed(snapshot);
    }

    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    /// Drain queued threshold signals
    pub fn take_thresholds(&mut self) -> Vec<ThresholdSignal> {
        std::mem::take(&mut self.thresholds)
    }
}

impl std::fmt::Debug for EventSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSink")
            .field("lines", &self.lines.len())
            .field("thresholds", &self.thresholds.len())
            .finish()
    }
}

/// Current/max pair in a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatView {
    pub current: i32,
    pub max: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusView {
    pub name: String,
    pub remaining_turns: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub integrity: StatView,
    pub focus: StatView,
    pub clarity: StatView,
    pub hope: StatView,
    pub despair: StatView,
    /// Encounter-scoped shield; zero outside encounters
    pub composure: i32,
    pub insight: u32,
    pub hand: Vec<CardId>,
    pub stance: Option<String>,
}

/// Player-facing view of the aspect: hidden traits stay hidden until revealed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AspectView {
    pub id: AspectId,
    pub name: String,
    pub resolve: StatView,
    pub composure: i32,
    pub resonance: StatView,
    pub dissonance: StatView,
    pub known_traits: Vec<String>,
    pub statuses: Vec<StatusView>,
    /// The telegraphed next intent
    pub intent: Option<String>,
}

/// Structured state snapshot emitted after every engine operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterSnapshot {
    pub phase: EncounterPhase,
    pub turn: Turn,
    pub player: PlayerView,
    pub aspect: Option<AspectView>,
}
