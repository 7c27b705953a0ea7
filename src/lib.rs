pub mod card;
pub mod catalog;
pub mod constants;
pub mod game_logic;
pub mod gem;
pub mod gems;
pub mod lobby;
pub mod nobles;
pub mod player;

pub use crate::card::*;
pub use crate::catalog::*;
pub use crate::game_logic::*;
pub use crate::gem::*;
pub use crate::gems::*;
pub use crate::lobby::{LobbyConfig, LobbyError, SessionPool};
pub use crate::nobles::*;
pub use crate::player::*;

pub trait JSONable: serde::Serialize + serde::de::DeserializeOwned {
    fn from_json(json: &str) -> Self {
        serde_json::from_str(json).expect("Should be able to deserialize")
    }
    fn to_json(&self) -> String {
        serde_json::to_string(self).expect("Should be able to serialize")
    }
}
