use crate::game_logic::RuleError;
use derive_more::{Display, Error};

pub mod expiry;
pub mod pool;
pub mod protocol;
pub mod session;
pub mod view;

pub use expiry::*;
pub use pool::*;
pub use protocol::{routes, serve, ChatBody, Credentials, GlobalPool};
pub use session::*;
pub use view::*;

/// Everything a lobby request can fail with. Structural errors are
/// checked before any game state is touched.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum LobbyError {
    #[display(fmt = "Game not found")]
    GameNotFound,
    #[display(fmt = "Game already exists, try another name")]
    GameExists,
    #[display(fmt = "Invalid gameId / pid / uuid")]
    InvalidCredentials,
    #[display(fmt = "Now is not your turn")]
    NotYourTurn,
    #[display(fmt = "You are not the starter")]
    NotStarter,
    #[display(fmt = "Game has already started")]
    AlreadyStarted,
    #[display(fmt = "The game has already started")]
    JoinAfterStart,
    #[display(fmt = "The game is full")]
    GameFull,
    #[display(fmt = "This game has been closed")]
    SessionClosed,
    #[display(fmt = "Invalid action")]
    InvalidAction,
    #[display(fmt = "Invalid path segment")]
    InvalidPath,
    #[display(fmt = "{}", _0)]
    Rule(RuleError),
}

impl From<RuleError> for LobbyError {
    fn from(err: RuleError) -> Self {
        LobbyError::Rule(err)
    }
}
