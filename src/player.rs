use crate::card::*;
use crate::constants::{MAX_GEMS, MAX_RESERVED};
use crate::game_logic::{Board, EventLog, ReserveTarget, RuleError};
use crate::gem::*;
use crate::gems::Gems;
use crate::nobles::{Noble, NobleId};
use std::collections::HashMap;
use std::fmt::Write;

/// Secret handed to a participant when they join; required on every request
pub type Token = String;

pub fn new_token() -> Token {
    uuid::Uuid::new_v4().to_string()
}

/// Someone watching the game. Spectators can chat and rename themselves
/// but never act.
#[derive(Debug, Clone)]
pub struct Spectator {
    id: usize,
    name: String,
    token: Token,
}

impl Spectator {
    pub fn new(id: usize) -> Spectator {
        Spectator {
            id,
            name: format!("Spec-{}", id),
            token: new_token(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn rename(&mut self, name: &str) {
        self.name = name.to_owned();
    }
}

/// A seated player. Every rule-checked operation validates completely
/// before touching any state, so an `Err` means nothing changed.
#[derive(Debug, Clone)]
pub struct Player {
    id: usize,
    name: String,
    token: Token,
    /// Tokens held, gold included
    gems: Gems,
    cards: HashMap<Gem, Vec<Card>>,
    reserved: Vec<Card>,
    nobles: Vec<Noble>,
    points: u8,

    // Reset by start_turn
    taken: Gems,
    visited: bool,
    finished: bool,
}

impl Player {
    pub fn new(id: usize, name: &str) -> Player {
        Player {
            id,
            name: name.to_owned(),
            token: new_token(),
            gems: Gems::empty(),
            cards: Gem::all_expect_gold()
                .into_iter()
                .map(|color| (color, Vec::new()))
                .collect(),
            reserved: Vec::new(),
            nobles: Vec::new(),
            points: 0,
            taken: Gems::empty(),
            visited: false,
            finished: false,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn rename(&mut self, name: &str) {
        self.name = name.to_owned();
    }

    pub fn total_points(&self) -> u8 {
        self.points
    }

    pub fn gems(&self) -> &Gems {
        &self.gems
    }

    /// Purchased cards producing the given color, in purchase order
    pub fn cards_of(&self, color: Gem) -> &[Card] {
        self.cards.get(&color).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Count of purchased cards per color
    pub fn developments(&self) -> Gems {
        let mut developments = Gems::empty();
        for color in Gem::all_expect_gold() {
            developments[color] = self.cards_of(color).len() as i8;
        }
        developments
    }

    pub fn num_developments(&self) -> usize {
        self.cards.values().map(Vec::len).sum()
    }

    pub fn reserved(&self) -> &[Card] {
        &self.reserved
    }

    pub fn nobles(&self) -> &[Noble] {
        &self.nobles
    }

    /// Tokens taken from the bank so far this turn
    pub fn taken(&self) -> &Gems {
        &self.taken
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn has_visited(&self) -> bool {
        self.visited
    }

    pub fn start_turn(&mut self) {
        self.finished = false;
        self.visited = false;
        self.taken = Gems::empty();
    }

    pub fn take_gem(&mut self, color: Gem, bank: &mut Gems) -> Result<(), RuleError> {
        if self.finished {
            return Err(RuleError::AlreadyActed);
        }
        if self.gems.total() >= MAX_GEMS {
            return Err(RuleError::TooManyGems);
        }
        if color == Gem::Gold {
            return Err(RuleError::CannotTakeGold);
        }
        if bank[color] <= 0 {
            return Err(RuleError::NoGemsLeft { gem: color });
        }
        if self.taken[color] == 1 && self.taken.distinct() == 2 {
            return Err(RuleError::AlreadyTakenTwoDistinct);
        }
        // A second token of one color needs 4 in the pile before the first was taken
        if self.taken[color] == 1 && bank[color] < 3 {
            return Err(RuleError::NotEnoughLeft { gem: color });
        }

        bank[color] -= 1;
        self.gems[color] += 1;
        self.taken[color] += 1;
        if self.taken.total() == 3 || self.taken[color] == 2 {
            self.finished = true;
        }
        Ok(())
    }

    pub fn discard(&mut self, color: Gem, bank: &mut Gems, log: &mut EventLog) -> Result<(), RuleError> {
        if self.gems[color] <= 0 {
            return Err(RuleError::NoneToDiscard { gem: color });
        }

        self.gems[color] -= 1;
        bank[color] += 1;
        if self.taken[color] > 0 {
            self.taken[color] -= 1;
        } else if color != Gem::Gold {
            log.record(Some(self.id), format!("{} discards 1{}", self.name, color));
        }
        Ok(())
    }

    /// Tokens needed to buy a card after the discount of owned cards, with any
    /// shortfall covered by gold. None if even gold can't cover it.
    pub fn payment_for(&self, card: &Card) -> Option<Gems> {
        let cost = card.cost().discounted_with(&self.developments());
        let mut payment = Gems::empty();
        for color in Gem::all_expect_gold() {
            let paid = cost[color].min(self.gems[color]);
            payment[color] = paid;
            payment[Gem::Gold] += cost[color] - paid;
        }
        if payment[Gem::Gold] > self.gems[Gem::Gold] {
            return None;
        }
        Some(payment)
    }

    pub fn buy(
        &mut self,
        card_id: CardId,
        board: &mut Board,
        bank: &mut Gems,
        log: &mut EventLog,
    ) -> Result<(), RuleError> {
        if self.finished {
            return Err(RuleError::AlreadyActed);
        }
        if self.taken.total() > 0 {
            return Err(RuleError::AlreadyTakenGems);
        }
        let card = board.card(card_id).ok_or(RuleError::CardNotAvailable)?;
        let reserved_at = self.reserved.iter().position(|c| c.id() == card_id);
        if reserved_at.is_none() && !board.on_market(card_id) {
            return Err(RuleError::CardNotAvailable);
        }
        let payment = self.payment_for(&card).ok_or(RuleError::NotEnoughGems)?;

        let mut msg = format!("{} buys", self.name);
        match reserved_at {
            Some(index) => {
                self.reserved.remove(index);
                msg.push_str(" reserved");
            }
            None => {
                board.take_from_market(card_id);
            }
        }
        board.retire(card_id);

        self.gems -= payment;
        *bank += payment;
        self.cards.entry(card.gem()).or_default().push(card);
        self.points += card.points();

        let _ = write!(msg, ": {}, paying ", card.caption());
        if payment.total() == 0 {
            msg.push_str("nothing");
        }
        for color in Gem::all() {
            if payment[color] > 0 {
                let _ = write!(msg, "{}{}", payment[color], color);
            }
        }
        log.record(Some(self.id), msg);

        self.finished = true;
        Ok(())
    }

    pub fn reserve(
        &mut self,
        target: ReserveTarget,
        board: &mut Board,
        bank: &mut Gems,
        log: &mut EventLog,
    ) -> Result<(), RuleError> {
        if self.finished {
            return Err(RuleError::AlreadyActed);
        }
        if self.taken.total() > 0 {
            return Err(RuleError::AlreadyTakenGems);
        }
        if self.reserved.len() >= MAX_RESERVED {
            return Err(RuleError::TooManyReserved);
        }
        if self.gems.total() >= MAX_GEMS && bank[Gem::Gold] > 0 {
            return Err(RuleError::DiscardFirst);
        }

        let (card, mut msg) = match target {
            ReserveTarget::Pile(level) => {
                let card = board.draw(level).ok_or(RuleError::EmptyPile { level })?;
                (card, format!("{} reserves a card of level {}", self.name, level))
            }
            ReserveTarget::Card(card_id) => {
                let card = board
                    .take_from_market(card_id)
                    .ok_or(RuleError::CardNotAvailable)?;
                (card, format!("{} reserves: {}", self.name, card.caption()))
            }
        };
        self.reserved.push(card);

        if bank[Gem::Gold] > 0 {
            bank[Gem::Gold] -= 1;
            self.gems[Gem::Gold] += 1;
            let _ = write!(msg, ", getting 1{}", Gem::Gold);
        }
        log.record(Some(self.id), msg);

        self.finished = true;
        Ok(())
    }

    /// Ids of the nobles in the pool this player's cards attract, in catalog order
    pub fn check_nobles(&self, pool: &[Noble]) -> Vec<NobleId> {
        let developments = self.developments();
        let mut ids: Vec<NobleId> = pool
            .iter()
            .filter(|noble| noble.is_attracted_to(&developments))
            .map(Noble::id)
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn visit_noble(
        &mut self,
        noble_id: NobleId,
        pool: &mut Vec<Noble>,
        log: &mut EventLog,
    ) -> Result<(), RuleError> {
        if self.visited {
            return Err(RuleError::AlreadyVisited);
        }
        if !self.check_nobles(pool).contains(&noble_id) {
            return Err(RuleError::NobleNotAvailable);
        }
        let index = pool
            .iter()
            .position(|n| n.id() == noble_id)
            .ok_or(RuleError::NobleNotAvailable)?;

        let noble = pool.remove(index);
        log.record(
            Some(self.id),
            format!("{} visits a noble: {}", self.name, noble.caption()),
        );
        self.points += noble.points();
        self.nobles.push(noble);
        self.visited = true;
        Ok(())
    }

    /// Moves tokens from the bank straight into this player's hand
    #[cfg(test)]
    pub(crate) fn grant(&mut self, gems: Gems, bank: &mut Gems) {
        *bank -= gems;
        self.gems += gems;
    }

    #[cfg(test)]
    pub(crate) fn add_development(&mut self, card: Card) {
        self.points += card.points();
        self.cards.entry(card.gem()).or_default().push(card);
    }
}
