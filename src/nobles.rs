use crate::card::Cost;
use crate::constants::NOBLE_POINTS;
use crate::gems::Gems;

pub type NobleId = u8;

/// A noble visits a player whose purchased cards meet its requirements.
/// Requirements count cards per color, never gems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Noble {
    pub points: u8,
    pub id: NobleId,
    requirements: Cost,
}

impl Noble {
    pub fn new(id: NobleId, requirements: Cost) -> Noble {
        Noble {
            points: NOBLE_POINTS,
            id,
            requirements,
        }
    }

    pub fn is_attracted_to(&self, developments: &Gems) -> bool {
        (developments.diamond >= self.requirements.diamond)
            && (developments.sapphire >= self.requirements.sapphire)
            && (developments.emerald >= self.requirements.emerald)
            && (developments.ruby >= self.requirements.ruby)
            && (developments.onyx >= self.requirements.onyx)
    }

    pub fn id(&self) -> NobleId {
        self.id
    }

    pub fn points(&self) -> u8 {
        self.points
    }

    pub fn requirements(&self) -> &Cost {
        &self.requirements
    }

    /// e.g. `(+3🔸)[4🟢4🔴]`
    pub fn caption(&self) -> String {
        format!("(+{}🔸)[{}]", self.points, self.requirements.caption())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gem::Gem;

    fn green_red() -> Noble {
        Noble::new(
            0,
            Cost {
                emerald: 4,
                ruby: 4,
                ..Cost::default()
            },
        )
    }

    #[test]
    fn test_attracted_only_by_enough_cards() {
        let noble = green_red();
        let mut developments = Gems {
            emerald: 4,
            ruby: 3,
            ..Gems::empty()
        };
        assert!(!noble.is_attracted_to(&developments));
        developments[Gem::Ruby] += 1;
        assert!(noble.is_attracted_to(&developments));
    }

    #[test]
    fn test_caption() {
        assert_eq!(green_red().caption(), "(+3🔸)[4🟢4🔴]");
    }
}
