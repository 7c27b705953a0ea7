//! What a participant gets to see. Every viewer receives the same board,
//! bank, nobles and log; reserved cards are only shown in full to the
//! player holding them.

use crate::card::{Card, CardId, Cost};
use crate::game_logic::*;
use crate::gem::Gem;
use crate::gems::Gems;
use crate::nobles::{Noble, NobleId};
use crate::player::Player;
use crate::JSONable;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Token counts keyed by request key (`w u g r b *`)
pub type TokenCounts = BTreeMap<String, i8>;

fn cost_counts(cost: &Cost) -> TokenCounts {
    Gem::all_expect_gold()
        .into_iter()
        .filter(|&color| cost[color] > 0)
        .map(|color| (color.request_key().to_owned(), cost[color]))
        .collect()
}

fn gem_counts(gems: &Gems) -> TokenCounts {
    Gem::all()
        .into_iter()
        .map(|color| (color.request_key().to_owned(), gems[color]))
        .collect()
}

fn level_key(level: usize) -> String {
    format!("level{}", level)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub id: CardId,
    pub color: String,
    pub points: u8,
    pub cost: TokenCounts,
    pub level: String,
}

impl From<&Card> for CardView {
    fn from(card: &Card) -> Self {
        CardView {
            id: card.id(),
            color: card.gem().request_key().to_owned(),
            points: card.points(),
            cost: cost_counts(&card.cost()),
            level: level_key(card.level() as usize),
        }
    }
}

/// A reservation as seen by its owner, or by anyone else
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReservedView {
    Visible(CardView),
    Hidden { level: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NobleView {
    pub id: NobleId,
    pub points: u8,
    pub requirement: TokenCounts,
}

impl From<&Noble> for NobleView {
    fn from(noble: &Noble) -> Self {
        NobleView {
            id: noble.id(),
            points: noble.points(),
            requirement: cost_counts(noble.requirements()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: usize,
    pub name: String,
    pub gems: TokenCounts,
    /// Purchased cards keyed by the color they produce
    pub cards: BTreeMap<String, Vec<CardView>>,
    pub nobles: Vec<NobleView>,
    pub reserved: Vec<ReservedView>,
    pub score: u8,
}

impl PlayerView {
    pub fn new(player: &Player, owner: bool) -> Self {
        let cards = Gem::all_expect_gold()
            .into_iter()
            .map(|color| {
                let cards = player.cards_of(color).iter().map(CardView::from).collect();
                (color.request_key().to_owned(), cards)
            })
            .collect();
        let reserved = player
            .reserved()
            .iter()
            .map(|card| match owner {
                true => ReservedView::Visible(card.into()),
                false => ReservedView::Hidden {
                    level: card.level(),
                },
            })
            .collect();

        PlayerView {
            id: player.id(),
            name: player.name().to_owned(),
            gems: gem_counts(player.gems()),
            cards,
            nobles: player.nobles().iter().map(NobleView::from).collect(),
            reserved,
            score: player.total_points(),
        }
    }
}

/// Full table state for one viewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    pub state: GameState,
    pub players: Vec<PlayerView>,
    pub gems: TokenCounts,
    /// Face-up cards per level; an exhausted slot is null
    pub cards: BTreeMap<String, Vec<Option<CardView>>>,
    /// Face-down cards left per level
    pub decks: BTreeMap<String, usize>,
    pub nobles: Vec<NobleView>,
    pub log: Vec<Record>,
    pub winner: Option<usize>,
    /// Whose turn it is, if anyone's
    pub turn: Option<usize>,
    pub last_round: bool,
}

impl JSONable for GameView {}

impl GameView {
    /// The game as seen by `viewer`; None sees no reservation in full
    pub fn new(game: &Game, viewer: Option<usize>) -> Self {
        let players = game
            .players()
            .iter()
            .map(|player| PlayerView::new(player, viewer == Some(player.id())))
            .collect();

        let board = game.board();
        let cards = board
            .market()
            .iter()
            .enumerate()
            .map(|(tier, row)| {
                let row = row.iter().map(|slot| slot.as_ref().map(CardView::from)).collect();
                (level_key(tier + 1), row)
            })
            .collect();
        let decks = board
            .deck_counts()
            .iter()
            .enumerate()
            .map(|(tier, &count)| (level_key(tier + 1), count))
            .collect();

        GameView {
            state: game.state(),
            players,
            gems: gem_counts(game.bank()),
            cards,
            decks,
            nobles: game.nobles().iter().map(NobleView::from).collect(),
            log: game.log().records().to_vec(),
            winner: game.winner(),
            turn: game.current_player_num(),
            last_round: game.last_round(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub pid: usize,
    pub name: String,
    pub msg: String,
    /// Seconds since the unix epoch
    pub time: u64,
}

/// Action-specific part of a reply
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    /// Nobles the player must choose between before the turn can pass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nobles: Option<Vec<NobleId>>,
}

impl From<ActionOutcome> for ActionResult {
    fn from(outcome: ActionOutcome) -> Self {
        match outcome {
            ActionOutcome::Done => ActionResult::default(),
            ActionOutcome::NoblesPending(nobles) => ActionResult {
                nobles: Some(nobles),
            },
        }
    }
}

/// Reply to stat, poll, chat and gameplay requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub state: GameView,
    pub result: ActionResult,
    pub chat: Vec<ChatMessage>,
}

impl JSONable for Snapshot {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Created {
    pub game: String,
    /// Capability needed to start the game
    pub start: String,
    pub state: GameView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Joined {
    pub id: usize,
    pub uuid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEntry {
    pub game: String,
    pub n_players: usize,
    pub in_progress: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn reserved_game() -> Game {
        let catalog = Catalog::standard().unwrap();
        let mut game = Game::new(&catalog);
        game.add_player();
        game.add_player();
        game.start().unwrap();
        game.play(Action::Reserve(ReserveTarget::Pile(3))).unwrap();
        game
    }

    #[test]
    fn test_reservations_hidden_from_others() {
        let game = reserved_game();
        let card = game.players()[0].reserved()[0];

        let own = GameView::new(&game, Some(0));
        assert_eq!(
            own.players[0].reserved,
            vec![ReservedView::Visible(CardView::from(&card))]
        );

        for viewer in [Some(1), Some(4), None] {
            let view = GameView::new(&game, viewer);
            assert_eq!(
                view.players[0].reserved,
                vec![ReservedView::Hidden { level: 3 }]
            );
            let json = view.to_json();
            assert!(!json.contains(&format!("\"id\":{},\"color\"", card.id())));
        }
    }

    #[test]
    fn test_view_shape() {
        let game = reserved_game();
        let view = GameView::new(&game, None);
        assert_eq!(view.state, GameState::Playing);
        assert_eq!(view.turn, Some(0));
        assert_eq!(view.decks["level3"], 15);
        assert_eq!(view.cards["level1"].len(), 4);
        assert_eq!(view.gems["*"], 4);
        assert_eq!(view.players[0].gems["*"], 1);
        assert_eq!(view.players[0].cards.len(), 5);
        assert_eq!(view.nobles.len(), 3);
        assert_eq!(view.log.len(), 1);

        let round_trip = GameView::from_json(&view.to_json());
        assert_eq!(round_trip, view);
    }

    #[test]
    fn test_pending_nobles_in_result() {
        let result = ActionResult::from(ActionOutcome::NoblesPending(vec![1, 4]));
        assert_eq!(serde_json::to_string(&result).unwrap(), r#"{"nobles":[1,4]}"#);
        let done = ActionResult::from(ActionOutcome::Done);
        assert_eq!(serde_json::to_string(&done).unwrap(), "{}");
    }
}
