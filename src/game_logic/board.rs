use crate::card::{Card, CardId};
use crate::constants::{LEVELS, MARKET_SIZE};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{HashMap, VecDeque};

pub type MarketRow = [Option<Card>; MARKET_SIZE];

/// The face-up market and the draw piles behind it, one of each per level.
/// Also knows every card still in play (market, piles, and reservations),
/// so a card id can be resolved until the card is bought.
#[derive(Debug, Clone)]
pub struct Board {
    market: [MarketRow; LEVELS],
    piles: [VecDeque<Card>; LEVELS],
    in_play: HashMap<CardId, Card>,
}

impl Board {
    /// Builds an undealt board: every card sits in its level's pile
    pub fn new(levels: [Vec<Card>; LEVELS]) -> Self {
        let in_play = levels
            .iter()
            .flatten()
            .map(|card| (card.id(), *card))
            .collect();
        Board {
            market: [[None; MARKET_SIZE]; LEVELS],
            piles: levels.map(VecDeque::from),
            in_play,
        }
    }

    /// Shuffles every pile and turns the first cards face up
    pub fn shuffle_and_deal<R: Rng>(&mut self, rng: &mut R) {
        for (row, pile) in self.market.iter_mut().zip(self.piles.iter_mut()) {
            pile.make_contiguous().shuffle(rng);
            for slot in row.iter_mut().filter(|slot| slot.is_none()) {
                *slot = pile.pop_front();
            }
        }
    }

    /// Number of face-down cards left per level
    pub fn deck_counts(&self) -> [usize; LEVELS] {
        [self.piles[0].len(), self.piles[1].len(), self.piles[2].len()]
    }

    pub fn market(&self) -> &[MarketRow; LEVELS] {
        &self.market
    }

    /// Looks up a card that is still in play
    pub fn card(&self, card_id: CardId) -> Option<Card> {
        self.in_play.get(&card_id).copied()
    }

    pub fn on_market(&self, card_id: CardId) -> bool {
        self.market
            .iter()
            .flatten()
            .flatten()
            .any(|card| card.id() == card_id)
    }

    /// Removes a face-up card, refilling its slot from the same level's pile.
    /// The slot stays empty once the pile is exhausted.
    pub fn take_from_market(&mut self, card_id: CardId) -> Option<Card> {
        for (row, pile) in self.market.iter_mut().zip(self.piles.iter_mut()) {
            for slot in row.iter_mut() {
                if slot.map(|card| card.id()) == Some(card_id) {
                    let card = slot.take();
                    *slot = pile.pop_front();
                    return card;
                }
            }
        }
        None
    }

    /// Pops the top of a level's pile, for a blind reservation
    pub fn draw(&mut self, level: u8) -> Option<Card> {
        let index = (level as usize).checked_sub(1)?;
        self.piles.get_mut(index)?.pop_front()
    }

    /// Forgets a card that has left play for good
    pub fn retire(&mut self, card_id: CardId) {
        self.in_play.remove(&card_id);
    }

    /// Puts a specific card face up, pulling it out of its pile if needed
    #[cfg(test)]
    pub(crate) fn place(&mut self, slot: usize, card: Card) {
        let level = card.level() as usize - 1;
        self.piles[level].retain(|c| c.id() != card.id());
        for other in self.market[level].iter_mut() {
            if other.map(|c| c.id()) == Some(card.id()) {
                *other = self.piles[level].pop_front();
            }
        }
        if let Some(old) = self.market[level][slot].replace(card) {
            self.piles[level].push_back(old);
        }
        self.in_play.insert(card.id(), card);
    }
}
