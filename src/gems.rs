use crate::constants::TOTAL_GOLD;
use crate::gem::Gem;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Index, IndexMut, Sub, SubAssign};

/// A count of tokens per color plus gold. Used for the bank,
/// for player holdings, and for the per-turn take counter.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Default, Hash, Serialize, Deserialize)]
pub struct Gems {
    pub diamond: i8,
    pub sapphire: i8,
    pub emerald: i8,
    pub ruby: i8,
    pub onyx: i8,
    pub gold: i8,
}

impl Gems {
    pub fn from_vec(vec: &Vec<Gem>) -> Gems {
        let mut gems = Gems::empty();
        for &color in vec {
            gems[color] += 1;
        }
        gems
    }

    /// Total number of tokens including gold
    pub fn total(&self) -> u32 {
        debug_assert!(self.legal(), "Illegal token state: {:?}", self);
        self.colored() + self.gold.max(0) as u32
    }

    /// Total number of tokens excluding gold
    pub fn colored(&self) -> u32 {
        Gem::all_expect_gold()
            .into_iter()
            .map(|color| self[color].max(0) as u32)
            .sum()
    }

    pub fn legal(&self) -> bool {
        Gem::all().into_iter().all(|color| self[color] >= 0)
    }

    pub fn empty() -> Gems {
        Gems::default()
    }

    /// The bank before the game starts: gold only
    pub fn gold_only() -> Gems {
        Gems {
            gold: TOTAL_GOLD,
            ..Gems::empty()
        }
    }

    /// The bank at the start of a game, which depends on the number of players.
    /// Returns None for a player count the rules don't cover.
    pub fn start(players: usize) -> Option<Gems> {
        let per_color = match players {
            2 => 4,
            3 => 5,
            4 => 7,
            _ => return None,
        };
        Some(Gems {
            diamond: per_color,
            sapphire: per_color,
            emerald: per_color,
            ruby: per_color,
            onyx: per_color,
            gold: TOTAL_GOLD,
        })
    }

    pub fn one(color: Gem) -> Gems {
        let mut gems = Gems::empty();
        gems[color] = 1;
        gems
    }

    /// Number of colors (gold excluded) with at least one token
    pub fn distinct(&self) -> usize {
        Gem::all_expect_gold()
            .into_iter()
            .filter(|&color| self[color] > 0)
            .count()
    }
}

impl Index<Gem> for Gems {
    type Output = i8;

    fn index(&self, color: Gem) -> &i8 {
        match color {
            Gem::Diamond => &self.diamond,
            Gem::Sapphire => &self.sapphire,
            Gem::Emerald => &self.emerald,
            Gem::Ruby => &self.ruby,
            Gem::Onyx => &self.onyx,
            Gem::Gold => &self.gold,
        }
    }
}

impl IndexMut<Gem> for Gems {
    fn index_mut(&mut self, color: Gem) -> &mut i8 {
        match color {
            Gem::Diamond => &mut self.diamond,
            Gem::Sapphire => &mut self.sapphire,
            Gem::Emerald => &mut self.emerald,
            Gem::Ruby => &mut self.ruby,
            Gem::Onyx => &mut self.onyx,
            Gem::Gold => &mut self.gold,
        }
    }
}

impl AddAssign for Gems {
    fn add_assign(&mut self, other: Gems) {
        for color in Gem::all() {
            self[color] += other[color];
        }
        debug_assert!(self.legal());
    }
}

impl SubAssign for Gems {
    fn sub_assign(&mut self, other: Gems) {
        for color in Gem::all() {
            self[color] -= other[color];
        }
        debug_assert!(self.legal());
    }
}

impl Add for Gems {
    type Output = Gems;

    fn add(mut self, other: Gems) -> Gems {
        self += other;
        self
    }
}

impl Sub for Gems {
    type Output = Gems;

    fn sub(mut self, other: Gems) -> Gems {
        self -= other;
        self
    }
}
