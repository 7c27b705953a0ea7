use crate::card::CardId;
use crate::gem::Gem;
use crate::nobles::*;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

pub mod board;
pub mod game;
pub mod history;

pub use self::board::*;
pub use self::game::*;
pub use self::history::*;

/// Lifecycle of a game. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameState {
    Waiting,
    Playing,
    Ended,
}

/// What a player may reserve: a face-up card, or the top of a level's pile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReserveTarget {
    Card(CardId),
    Pile(u8),
}

impl ReserveTarget {
    /// Parses `level1`..`level3` or a card id
    pub fn parse(target: &str) -> Option<ReserveTarget> {
        match target.strip_prefix("level") {
            Some(level) => match level.parse::<u8>() {
                Ok(level @ 1..=3) => Some(ReserveTarget::Pile(level)),
                _ => None,
            },
            None => target.parse::<CardId>().ok().map(ReserveTarget::Card),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Take(Gem),
    Discard(Gem),
    Buy(CardId),
    Reserve(ReserveTarget),
    VisitNoble(NobleId),

    /// Marker for ending the turn and passing play to the next player
    Continue,
}

impl Action {
    /// Builds an action from the verb and target of a client request
    pub fn from_request(action: &str, target: &str) -> Option<Action> {
        match action {
            "take" => Gem::from_request_key(target).map(Action::Take),
            "discard" => Gem::from_request_key(target).map(Action::Discard),
            "buy" => target.parse::<CardId>().ok().map(Action::Buy),
            "reserve" => ReserveTarget::parse(target).map(Action::Reserve),
            "noble_visit" => target.parse::<NobleId>().ok().map(Action::VisitNoble),
            _ => None,
        }
    }
}

/// What happened after an accepted action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Done,
    /// The active player qualifies for several nobles and must pick one
    /// with `Action::VisitNoble` before the turn can pass
    NoblesPending(Vec<NobleId>),
}

/// Every way a move can break the rules. The display text is shown to players as is.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum RuleError {
    #[display(fmt = "You have already acted")]
    AlreadyActed,
    #[display(fmt = "You already have 10 gems")]
    TooManyGems,
    #[display(fmt = "You can't take a 🟡")]
    CannotTakeGold,
    #[display(fmt = "No {} left", gem)]
    NoGemsLeft { gem: Gem },
    #[display(fmt = "You have already taken 2 different gems")]
    AlreadyTakenTwoDistinct,
    #[display(fmt = "There are not enough {} left", gem)]
    NotEnoughLeft { gem: Gem },
    #[display(fmt = "You don't have any {}", gem)]
    NoneToDiscard { gem: Gem },
    #[display(fmt = "You have already taken gems")]
    AlreadyTakenGems,
    #[display(fmt = "This card is not available")]
    CardNotAvailable,
    #[display(fmt = "Not enough gems")]
    NotEnoughGems,
    #[display(fmt = "You have already reserved 3 cards")]
    TooManyReserved,
    #[display(fmt = "Discard a gem first")]
    DiscardFirst,
    #[display(fmt = "No card left in level {}", level)]
    EmptyPile { level: u8 },
    #[display(fmt = "You have already been visited by a noble")]
    AlreadyVisited,
    #[display(fmt = "This noble is not available")]
    NobleNotAvailable,
    #[display(fmt = "Cannot start the game")]
    NotEnoughPlayers,
    #[display(fmt = "Game has already started")]
    AlreadyStarted,
    #[display(fmt = "The game is not in progress")]
    NotPlaying,
}
