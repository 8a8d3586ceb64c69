use thiserror::Error;

use crate::core::types::{AspectId, CardId};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Unknown card id: {0}")]
    UnknownCard(CardId),

    #[error("Unknown aspect id: {0}")]
    UnknownAspect(AspectId),

    #[error("Malformed content: {0}")]
    MalformedContent(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Card not in hand: {0}")]
    CardNotInHand(CardId),

    #[error("Not enough focus for {card}: need {need}, have {have}")]
    InsufficientFocus { card: CardId, need: i32, have: i32 },

    #[error("Attunement gate for {card}: {attunement} {need} required, have {have}")]
    AttunementGate {
        card: CardId,
        attunement: String,
        need: i32,
        have: i32,
    },

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Content parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
