//! Card pile lifecycle: deck, hand, discard
//!
//! No operation here creates or destroys cards except explicit injection,
//! so `|deck| + |hand| + |discard|` is invariant across draw/play/discard.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::content::card::OnDrawEffect;
use crate::content::library::ContentLibrary;
use crate::core::error::{EngineError, Result};
use crate::core::types::CardId;
use crate::encounter::events::EventSink;

/// What one draw operation did
#[derive(Debug, Clone, Default)]
pub struct DrawReport {
    pub drawn: Vec<CardId>,
    /// Discard was reshuffled into the deck mid-draw
    pub reshuffled: bool,
    /// Deck and discard were both empty before the draw finished
    pub exhausted: bool,
    /// Trauma on-draw drawbacks, surfaced synchronously for the caller to
    /// apply before the player acts
    pub on_draw: Vec<(CardId, OnDrawEffect)>,
}

/// The player's card piles for one run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardPiles {
    deck: Vec<CardId>,
    hand: Vec<CardId>,
    discard: Vec<CardId>,
}

impl CardPiles {
    /// Build piles from a starting deck (unshuffled; call [`Self::shuffle`])
    pub fn from_deck(deck: Vec<CardId>) -> Self {
        Self {
            deck,
            hand: Vec::new(),
            discard: Vec::new(),
        }
    }

    pub fn deck(&self) -> &[CardId] {
        &self.deck
    }

    pub fn hand(&self) -> &[CardId] {
        &self.hand
    }

    pub fn discard_pile(&self) -> &[CardId] {
        &self.discard
    }

    /// Total cards across all piles
    pub fn total(&self) -> usize {
        self.deck.len() + self.hand.len() + self.discard.len()
    }

    pub fn hand_contains(&self, id: &CardId) -> bool {
        self.hand.contains(id)
    }

    pub fn shuffle(&mut self, rng: &mut ChaCha8Rng) {
        self.deck.shuffle(rng);
    }

    /// Draw up to `n` cards deck -> hand
    ///
    /// Respects `max_hand` (excess draws are logged no-ops). If the deck
    /// empties mid-draw, the discard is reshuffled into the deck before the
    /// draw continues. If both piles are empty, the draw stops early and the
    /// condition is logged distinctly; it is not an error.
    pub fn draw(
        &mut self,
        n: usize,
        max_hand: usize,
        content: &ContentLibrary,
        rng: &mut ChaCha8Rng,
        sink: &mut EventSink,
    ) -> Result<DrawReport> {
        let mut report = DrawReport::default();

        for _ in 0..n {
            if self.hand.len() >= max_hand {
                sink.info(format!("Hand is full ({} cards); draw skipped", max_hand));
                break;
            }

            if self.deck.is_empty() {
                if self.discard.is_empty() {
                    sink.warn("Deck and discard are both empty; nothing to draw");
                    report.exhausted = true;
                    break;
                }
                let count = self.discard.len();
                self.deck.append(&mut self.discard);
                self.deck.shuffle(rng);
                report.reshuffled = true;
                sink.info(format!("Reshuffled {} cards from discard into deck", count));
            }

            // Look the card up before removing it: a dangling id must fail
            // with every pile intact
            let Some(id) = self.deck.last().cloned() else {
                break;
            };
            let card = content.card(&id)?;
            self.deck.pop();
            sink.info(format!("Drew {}", card.name));
            if card.is_trauma() {
                if let Some(effect) = card.on_draw.clone() {
                    report.on_draw.push((id.clone(), effect));
                }
            }
            self.hand.push(id.clone());
            report.drawn.push(id);
        }

        Ok(report)
    }

    /// Move a played card hand -> discard
    ///
    /// Unconditional once validated: every played card goes to the discard,
    /// traumas included. A card id absent from the hand is a caller logic
    /// error, reported as a distinct kind.
    pub fn play(&mut self, id: &CardId) -> Result<()> {
        let position = self
            .hand
            .iter()
            .position(|c| c == id)
            .ok_or_else(|| EngineError::CardNotInHand(id.clone()))?;
        let card = self.hand.remove(position);
        self.discard.push(card);
        Ok(())
    }

    /// Explicit discard of a specific hand card
    pub fn discard_from_hand(&mut self, id: &CardId) -> Result<()> {
        self.play(id)
    }

    /// Discard one uniform-random card from the hand
    pub fn discard_random(&mut self, rng: &mut ChaCha8Rng) -> Option<CardId> {
        if self.hand.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.hand.len());
        let card = self.hand.remove(index);
        self.discard.push(card.clone());
        Some(card)
    }

    /// Discard the whole hand (encounter start); returns how many moved
    pub fn discard_hand(&mut self) -> usize {
        let count = self.hand.len();
        self.discard.append(&mut self.hand);
        count
    }

    /// Inject a card straight into the discard pile (dissonance-break
    /// traumas, card rewards)
    pub fn inject_discard(&mut self, id: CardId) {
        self.discard.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::card::{CardCategory, CardDefinition, CardEffect};
    use rand::SeedableRng;

    fn plain_card(id: &str) -> CardDefinition {
        CardDefinition {
            id: CardId::from(id),
            name: id.to_string(),
            category: CardCategory::Expression,
            attunement: "empathy".to_string(),
            focus_cost: 1,
            tags: vec![],
            description: String::new(),
            effects: vec![CardEffect::Pressure { amount: 1 }],
            on_draw: None,
            requirement: None,
        }
    }

    fn trauma_card(id: &str) -> CardDefinition {
        CardDefinition {
            category: CardCategory::Trauma,
            on_draw: Some(OnDrawEffect::LoseFocus { amount: 1 }),
            effects: vec![],
            ..plain_card(id)
        }
    }

    fn library(ids: &[&str]) -> ContentLibrary {
        let mut lib = ContentLibrary::new();
        for id in ids {
            lib.add_card(plain_card(id));
        }
        lib
    }

    #[test]
    fn test_draw_moves_deck_to_hand() {
        let lib = library(&["a", "b", "c"]);
        let mut piles = CardPiles::from_deck(vec!["a".into(), "b".into(), "c".into()]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut sink = EventSink::new();

        let report = piles.draw(2, 7, &lib, &mut rng, &mut sink).unwrap();
        assert_eq!(report.drawn.len(), 2);
        assert_eq!(piles.hand().len(), 2);
        assert_eq!(piles.deck().len(), 1);
        assert_eq!(piles.total(), 3);
    }

    #[test]
    fn test_draw_respects_hand_limit() {
        let lib = library(&["a", "b", "c"]);
        let mut piles = CardPiles::from_deck(vec!["a".into(), "b".into(), "c".into()]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut sink = EventSink::new();

        let report = piles.draw(3, 2, &lib, &mut rng, &mut sink).unwrap();
        assert_eq!(report.drawn.len(), 2);
        assert_eq!(piles.hand().len(), 2);
    }

    #[test]
    fn test_reshuffle_mid_draw() {
        // Deck=[a], Discard=[b,c]: drawing 2 reshuffles before the draw
        // completes
        let lib = library(&["a", "b", "c"]);
        let mut piles = CardPiles::from_deck(vec!["a".into()]);
        piles.inject_discard("b".into());
        piles.inject_discard("c".into());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut sink = EventSink::new();

        let report = piles.draw(2, 7, &lib, &mut rng, &mut sink).unwrap();
        assert!(report.reshuffled);
        assert_eq!(piles.hand().len(), 2);
        assert_eq!(piles.deck().len(), 1);
        assert!(piles.discard_pile().is_empty());
    }

    #[test]
    fn test_both_piles_empty_is_logged_not_error() {
        let lib = library(&[]);
        let mut piles = CardPiles::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut sink = EventSink::new();

        let report = piles.draw(1, 7, &lib, &mut rng, &mut sink).unwrap();
        assert!(report.exhausted);
        assert!(report.drawn.is_empty());
        assert!(sink
            .lines()
            .iter()
            .any(|l| l.text.contains("both empty")));
    }

    #[test]
    fn test_trauma_on_draw_surfaces_synchronously() {
        let mut lib = ContentLibrary::new();
        lib.add_card(trauma_card("hollow-doubt"));
        let mut piles = CardPiles::from_deck(vec!["hollow-doubt".into()]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut sink = EventSink::new();

        let report = piles.draw(1, 7, &lib, &mut rng, &mut sink).unwrap();
        assert_eq!(report.on_draw.len(), 1);
        assert_eq!(
            report.on_draw[0].1,
            OnDrawEffect::LoseFocus { amount: 1 }
        );
    }

    #[test]
    fn test_draw_dangling_id_fails_without_losing_cards() {
        // Library does not know "ghost"; the draw errors but the card
        // must stay in the deck
        let lib = library(&["a"]);
        let mut piles = CardPiles::from_deck(vec!["a".into(), "ghost".into()]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut sink = EventSink::new();

        let result = piles.draw(2, 7, &lib, &mut rng, &mut sink);
        assert!(matches!(result, Err(EngineError::UnknownCard(_))));
        assert_eq!(piles.total(), 2);
        assert_eq!(piles.deck().len(), 2);
        assert!(piles.hand().is_empty());
    }

    #[test]
    fn test_play_moves_to_discard() {
        let lib = library(&["a"]);
        let mut piles = CardPiles::from_deck(vec!["a".into()]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut sink = EventSink::new();
        piles.draw(1, 7, &lib, &mut rng, &mut sink).unwrap();

        piles.play(&"a".into()).unwrap();
        assert!(piles.hand().is_empty());
        assert_eq!(piles.discard_pile(), &["a".into()]);
    }

    #[test]
    fn test_play_missing_card_is_distinct_error() {
        let mut piles = CardPiles::default();
        assert!(matches!(
            piles.play(&"ghost".into()),
            Err(EngineError::CardNotInHand(_))
        ));
    }

    #[test]
    fn test_discard_random_uniform_pick() {
        let lib = library(&["a", "b", "c"]);
        let mut piles = CardPiles::from_deck(vec!["a".into(), "b".into(), "c".into()]);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut sink = EventSink::new();
        piles.draw(3, 7, &lib, &mut rng, &mut sink).unwrap();

        let discarded = piles.discard_random(&mut rng).unwrap();
        assert_eq!(piles.hand().len(), 2);
        assert!(!piles.hand_contains(&discarded));
        assert_eq!(piles.total(), 3);
    }

    #[test]
    fn test_conservation_across_operations() {
        let lib = library(&["a", "b", "c", "d"]);
        let mut piles =
            CardPiles::from_deck(vec!["a".into(), "b".into(), "c".into(), "d".into()]);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut sink = EventSink::new();

        piles.draw(3, 7, &lib, &mut rng, &mut sink).unwrap();
        assert_eq!(piles.total(), 4);
        let first = piles.hand()[0].clone();
        piles.play(&first).unwrap();
        assert_eq!(piles.total(), 4);
        piles.discard_random(&mut rng);
        assert_eq!(piles.total(), 4);
        piles.discard_hand();
        assert_eq!(piles.total(), 4);
        piles.draw(4, 7, &lib, &mut rng, &mut sink).unwrap();
        assert_eq!(piles.total(), 4);
    }
}
