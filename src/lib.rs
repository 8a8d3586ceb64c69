//! Mindspire - Encounter simulation engine for a narrative card-battler
//!
//! The engine is a single-threaded, strictly turn-sequenced state machine:
//! the orchestrator drives turns, player actions flow through the card
//! resolver into the psyche ledger and the live aspect, and terminal
//! conditions are re-checked after every mutation. Rendering, storylet
//! content, and save formats live outside this crate; they talk to the
//! engine through the content registry, the observer interface, and the
//! serializable psyche state.

pub mod content;
pub mod core;
pub mod deck;
pub mod encounter;
pub mod psyche;
