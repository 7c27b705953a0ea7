use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(PartialEq, Copy, Clone, Debug, Eq, Hash, Display, Serialize, Deserialize)]
pub enum Gem {
    #[display(fmt = "⚪")]
    Diamond,
    #[display(fmt = "🔵")]
    Sapphire,
    #[display(fmt = "🟢")]
    Emerald,
    #[display(fmt = "🔴")]
    Ruby,
    #[display(fmt = "⚫")]
    Onyx,
    #[display(fmt = "🟡")]
    Gold,
}

impl Gem {
    /// The five takeable colors, in catalog order (white, blue, green, red, black)
    pub fn all_expect_gold() -> Vec<Gem> {
        vec![
            Gem::Diamond,
            Gem::Sapphire,
            Gem::Emerald,
            Gem::Ruby,
            Gem::Onyx,
        ]
    }

    pub fn all() -> Vec<Gem> {
        vec![
            Gem::Diamond,
            Gem::Sapphire,
            Gem::Emerald,
            Gem::Ruby,
            Gem::Onyx,
            Gem::Gold,
        ]
    }

    /// Letter used by the catalog text format
    pub fn from_letter(letter: char) -> Option<Gem> {
        match letter {
            'W' => Some(Gem::Diamond),
            'B' => Some(Gem::Sapphire),
            'G' => Some(Gem::Emerald),
            'R' => Some(Gem::Ruby),
            'K' => Some(Gem::Onyx),
            _ => None,
        }
    }

    /// Key used by clients when naming a token in a request
    pub fn from_request_key(key: &str) -> Option<Gem> {
        match key {
            "w" => Some(Gem::Diamond),
            "u" => Some(Gem::Sapphire),
            "g" => Some(Gem::Emerald),
            "r" => Some(Gem::Ruby),
            "b" => Some(Gem::Onyx),
            "*" => Some(Gem::Gold),
            _ => None,
        }
    }

    pub fn request_key(&self) -> &'static str {
        match self {
            Gem::Diamond => "w",
            Gem::Sapphire => "u",
            Gem::Emerald => "g",
            Gem::Ruby => "r",
            Gem::Onyx => "b",
            Gem::Gold => "*",
        }
    }
}
