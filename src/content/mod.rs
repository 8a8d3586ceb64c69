pub mod aspect;
pub mod card;
pub mod library;

pub use aspect::{
    AspectRewards, AspectTemplate, IntentDef, IntentEffect, IntentPolicy, StatusEffect,
    StatusModifier, TraitDef, TraitEffect,
};
pub use card::{AttunementRequirement, CardCategory, CardDefinition, CardEffect, OnDrawEffect};
pub use library::ContentLibrary;
