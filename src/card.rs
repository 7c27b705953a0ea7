use crate::gem::Gem;
use crate::gems::Gems;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::ops::{Index, IndexMut};

/// Price of a card (or requirement of a noble) per color. Gold never appears in a cost.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Default, Serialize, Deserialize)]
pub struct Cost {
    pub diamond: i8,
    pub sapphire: i8,
    pub emerald: i8,
    pub ruby: i8,
    pub onyx: i8,
}

impl Index<Gem> for Cost {
    type Output = i8;

    fn index(&self, color: Gem) -> &i8 {
        match color {
            Gem::Diamond => &self.diamond,
            Gem::Sapphire => &self.sapphire,
            Gem::Emerald => &self.emerald,
            Gem::Ruby => &self.ruby,
            Gem::Onyx => &self.onyx,
            Gem::Gold => &0,
        }
    }
}

impl IndexMut<Gem> for Cost {
    fn index_mut(&mut self, color: Gem) -> &mut i8 {
        match color {
            Gem::Diamond => &mut self.diamond,
            Gem::Sapphire => &mut self.sapphire,
            Gem::Emerald => &mut self.emerald,
            Gem::Ruby => &mut self.ruby,
            Gem::Onyx => &mut self.onyx,
            Gem::Gold => panic!("Invalid color in Cost object"),
        }
    }
}

impl Cost {
    /// Create a new cost object that removes all gems
    /// passed in from the cost, if that would result in
    /// a negative cost, the cost is instead set to 0
    pub fn discounted_with(&self, gems: &Gems) -> Cost {
        Cost {
            diamond: 0.max(self.diamond - gems.diamond),
            sapphire: 0.max(self.sapphire - gems.sapphire),
            emerald: 0.max(self.emerald - gems.emerald),
            ruby: 0.max(self.ruby - gems.ruby),
            onyx: 0.max(self.onyx - gems.onyx),
        }
    }

    /// Renders as count/emoji pairs, e.g. `2🔵1🔴`
    pub fn caption(&self) -> String {
        let mut caption = String::new();
        for color in Gem::all_expect_gold() {
            if self[color] > 0 {
                let _ = write!(caption, "{}{}", self[color], color);
            }
        }
        caption
    }
}

pub type CardId = u8;

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub struct Card {
    id: CardId,
    level: u8,
    gem: Gem,
    points: u8,
    cost: Cost,
}

impl Card {
    pub fn new(id: CardId, level: u8, gem: Gem, points: u8, cost: Cost) -> Card {
        Card {
            id,
            level,
            gem,
            points,
            cost,
        }
    }

    pub fn cost(&self) -> Cost {
        self.cost
    }

    pub fn points(&self) -> u8 {
        self.points
    }

    /// The color this card produces once purchased
    pub fn gem(&self) -> Gem {
        self.gem
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    /// 1 through 3
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Human readable form used in the event log, e.g. `(🔵+1🔸)[4🔴]`
    pub fn caption(&self) -> String {
        let points = if self.points > 0 {
            format!("+{}🔸", self.points)
        } else {
            String::new()
        };
        format!("({}{})[{}]", self.gem, points, self.cost.caption())
    }
}
