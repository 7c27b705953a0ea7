use std::time::Duration;

/// Number of seats at the table; spectators are numbered from here upward
pub const MAX_PLAYERS: usize = 4;
pub const MIN_PLAYERS: usize = 2;

pub const MAX_GEMS: u32 = 10;
pub const MAX_RESERVED: usize = 3;
pub const TOTAL_GOLD: i8 = 5;
pub const WIN_POINTS: u8 = 15;
pub const NOBLE_POINTS: u8 = 3;

/// Face-up cards per level
pub const MARKET_SIZE: usize = 4;
pub const LEVELS: usize = 3;

/// Cards per level in the catalog, followed by the nobles
pub const LEVEL_SIZES: [usize; LEVELS] = [40, 30, 20];
pub const NOBLE_COUNT: usize = 10;

pub const POLL_INTERVAL: Duration = Duration::from_millis(400);
pub const WAITING_TIMEOUT: Duration = Duration::from_secs(10 * 60);
pub const PLAYING_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

pub const DEFAULT_PORT: u16 = 8080;

/// Bundled catalog and suggestion words, in the flat text formats
/// read by `Catalog::from_text` and `WordList::from_text`
pub const STANDARD_CARDS: &str = include_str!("../resources/cards.txt");
pub const STANDARD_WORDS: &str = include_str!("../resources/words.txt");
