//! Loading of the card and noble catalog, and of the word list used to
//! suggest session names, from their flat text formats.
//!
//! The catalog holds 100 non-blank lines: the level 1, 2 and 3 cards
//! (see [`LEVEL_SIZES`]) followed by the nobles. Every level is split
//! into five equal runs by the color the card produces, in the order
//! white, blue, green, red, black. A card line is a sequence of
//! `<count><color>` pairs with an optional `+<points>` suffix, e.g.
//! `1B1G2R+1`; a noble line is only pairs, e.g. `4G4R`.

use crate::card::{Card, CardId, Cost};
use crate::constants::*;
use crate::gem::Gem;
use crate::nobles::{Noble, NobleId};

use cached::proc_macro::once;
use derive_more::{Display, Error};
use rand::seq::SliceRandom;
use rand::thread_rng;

use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Display, Error)]
pub enum CatalogError {
    #[display(fmt = "Unable to read catalog file: {}", _0)]
    Io(std::io::Error),
    #[display(fmt = "Malformed catalog line {}: {:?}", line, text)]
    Malformed { line: usize, text: String },
    #[display(fmt = "Catalog has {} lines, expected {}", found, expected)]
    Truncated { expected: usize, found: usize },
    #[display(fmt = "Word list is empty")]
    NoWords,
}

/// Immutable card and noble definitions. Every session copies what it needs
/// out of a shared catalog and shuffles its own copy.
#[derive(Debug, Clone)]
pub struct Catalog {
    levels: [Vec<Card>; LEVELS],
    nobles: Vec<Noble>,
}

#[once(result = true)]
fn standard_catalog() -> Result<Arc<Catalog>, CatalogError> {
    Catalog::from_text(STANDARD_CARDS).map(Arc::new)
}

impl Catalog {
    /// The catalog bundled with the crate
    pub fn standard() -> Result<Arc<Catalog>, CatalogError> {
        standard_catalog()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Catalog, CatalogError> {
        let text = std::fs::read_to_string(path).map_err(CatalogError::Io)?;
        Catalog::from_text(&text)
    }

    pub fn from_text(text: &str) -> Result<Catalog, CatalogError> {
        let lines: Vec<(usize, &str)> = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty())
            .collect();

        let expected = LEVEL_SIZES.iter().sum::<usize>() + NOBLE_COUNT;
        if lines.len() < expected {
            return Err(CatalogError::Truncated {
                expected,
                found: lines.len(),
            });
        }

        let colors = Gem::all_expect_gold();
        let mut levels: [Vec<Card>; LEVELS] = Default::default();
        let mut rest = lines.as_slice();
        let mut next_id: usize = 0;

        for (tier, &size) in LEVEL_SIZES.iter().enumerate() {
            let run = size / colors.len();
            let (block, remaining) = rest.split_at(size);
            for (i, &(line_no, line)) in block.iter().enumerate() {
                let (cost, points) = parse_line(line).ok_or_else(|| CatalogError::Malformed {
                    line: line_no,
                    text: line.to_owned(),
                })?;
                let gem = colors[i / run];
                levels[tier].push(Card::new(
                    next_id as CardId,
                    tier as u8 + 1,
                    gem,
                    points,
                    cost,
                ));
                next_id += 1;
            }
            rest = remaining;
        }

        let mut nobles = Vec::with_capacity(NOBLE_COUNT);
        for (i, &(line_no, line)) in rest.iter().take(NOBLE_COUNT).enumerate() {
            let cost = match parse_line(line) {
                Some((cost, 0)) => cost,
                _ => {
                    return Err(CatalogError::Malformed {
                        line: line_no,
                        text: line.to_owned(),
                    })
                }
            };
            nobles.push(Noble::new(i as NobleId, cost));
        }

        Ok(Catalog { levels, nobles })
    }

    /// Cards of a level from 1 to 3, in catalog order
    pub fn level(&self, level: u8) -> &[Card] {
        match level {
            1..=3 => &self.levels[level as usize - 1],
            _ => &[],
        }
    }

    pub fn nobles(&self) -> &[Noble] {
        &self.nobles
    }

    /// A fresh copy of the three level decks and the nobles,
    /// for a new session to shuffle and deal from
    pub fn deal(&self) -> ([Vec<Card>; LEVELS], Vec<Noble>) {
        (self.levels.clone(), self.nobles.clone())
    }
}

/// Parses `<count><color>...[+points]`
fn parse_line(line: &str) -> Option<(Cost, u8)> {
    let (pairs, points) = match line.split_once('+') {
        Some((pairs, points)) => (pairs, points.parse::<u8>().ok()?),
        None => (line, 0),
    };

    let mut cost = Cost::default();
    let mut count: Option<i8> = None;
    for c in pairs.chars() {
        if let Some(digit) = c.to_digit(10) {
            count = Some(count.unwrap_or(0) * 10 + digit as i8);
        } else {
            let gem = Gem::from_letter(c)?;
            cost[gem] += count.take()?;
        }
    }
    if count.is_some() {
        return None;
    }
    Some((cost, points))
}

/// Words that session names are suggested from
#[derive(Debug, Clone)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    pub fn standard() -> Result<WordList, CatalogError> {
        WordList::from_text(STANDARD_WORDS)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<WordList, CatalogError> {
        let text = std::fs::read_to_string(path).map_err(CatalogError::Io)?;
        WordList::from_text(&text)
    }

    pub fn from_text(text: &str) -> Result<WordList, CatalogError> {
        let words: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(str::to_owned)
            .collect();
        if words.is_empty() {
            return Err(CatalogError::NoWords);
        }
        Ok(WordList { words })
    }

    pub fn random(&self) -> &str {
        self.words
            .choose(&mut thread_rng())
            .map(String::as_str)
            .unwrap_or("splendor")
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Testing strategy:
    ///     from_text:
    ///         - bundled catalog, truncated catalog, malformed line
    ///         - card with and without points, multi-digit counts
    ///     WordList:
    ///         - bundled list, empty list

    #[test]
    fn test_standard_catalog_shape() {
        let catalog = Catalog::standard().unwrap();
        assert_eq!(catalog.level(1).len(), 40);
        assert_eq!(catalog.level(2).len(), 30);
        assert_eq!(catalog.level(3).len(), 20);
        assert_eq!(catalog.nobles().len(), 10);
        assert!(catalog.level(4).is_empty());

        // Card ids are unique positions across levels
        let ids: Vec<CardId> = (1..=3)
            .flat_map(|l| catalog.level(l).iter().map(|c| c.id()))
            .collect();
        assert_eq!(ids, (0..90).collect::<Vec<CardId>>());
    }

    #[test]
    fn test_colors_follow_runs() {
        let catalog = Catalog::standard().unwrap();
        let level1 = catalog.level(1);
        assert_eq!(level1[0].gem(), Gem::Diamond);
        assert_eq!(level1[8].gem(), Gem::Sapphire);
        assert_eq!(level1[39].gem(), Gem::Onyx);
        let level3 = catalog.level(3);
        assert_eq!(level3[4].gem(), Gem::Sapphire);
        assert!(level3.iter().all(|c| c.level() == 3 && c.points() >= 3));
    }

    #[test]
    fn test_parse_line() {
        let (cost, points) = parse_line("1B1G2R+1").unwrap();
        assert_eq!(cost.sapphire, 1);
        assert_eq!(cost.emerald, 1);
        assert_eq!(cost.ruby, 2);
        assert_eq!(points, 1);

        let (cost, points) = parse_line("12W").unwrap();
        assert_eq!(cost.diamond, 12);
        assert_eq!(points, 0);

        assert!(parse_line("1X").is_none());
        assert!(parse_line("B1").is_none());
        assert!(parse_line("1B+").is_none());
    }

    #[test]
    fn test_truncated_catalog() {
        let result = Catalog::from_text("1B1G\n2R\n");
        assert!(matches!(
            result,
            Err(CatalogError::Truncated { expected: 100, found: 2 })
        ));
    }

    #[test]
    fn test_malformed_line_is_reported() {
        let text = STANDARD_CARDS.replacen("1B1G1R1K", "1B1Q", 1);
        match Catalog::from_text(&text) {
            Err(CatalogError::Malformed { line, .. }) => assert_eq!(line, 1),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_word_list() {
        let words = WordList::standard().unwrap();
        assert!(!words.is_empty());
        assert!(!words.random().is_empty());
        assert!(matches!(
            WordList::from_text("\n  \n"),
            Err(CatalogError::NoWords)
        ));
    }
}
