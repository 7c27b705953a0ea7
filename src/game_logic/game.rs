use crate::catalog::Catalog;
use crate::constants::{MAX_PLAYERS, MIN_PLAYERS, WIN_POINTS};
use crate::gem::Gem;
use crate::gems::Gems;
use crate::player::{Player, Spectator, Token};

use rand::seq::SliceRandom;
use rand::thread_rng;

use super::{Action::*, *};

use log::{debug, info, trace, warn};

#[derive(Debug, Clone)]
pub struct Game {
    players: Vec<Player>,
    spectators: Vec<Spectator>,
    state: GameState,
    current_player: Option<usize>,
    bank: Gems,
    board: Board,
    /// Shuffled at creation; cut down to players + 1 at start
    nobles: Vec<Noble>,
    last_round: bool,
    winner: Option<usize>,
    log: EventLog,
}

impl Game {
    /// A game waiting for players, with its own shuffled copy of the catalog
    pub fn new(catalog: &Catalog) -> Game {
        let (levels, mut nobles) = catalog.deal();
        nobles.shuffle(&mut thread_rng());
        Game {
            players: Vec::new(),
            spectators: Vec::new(),
            state: GameState::Waiting,
            current_player: None,
            bank: Gems::gold_only(),
            board: Board::new(levels),
            nobles,
            last_round: false,
            winner: None,
            log: EventLog::new(),
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn players(&self) -> &Vec<Player> {
        &self.players
    }

    pub fn spectators(&self) -> &Vec<Spectator> {
        &self.spectators
    }

    pub fn bank(&self) -> &Gems {
        &self.bank
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn nobles(&self) -> &Vec<Noble> {
        &self.nobles
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn last_round(&self) -> bool {
        self.last_round
    }

    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    /// Index of the player whose turn it is; None unless playing
    pub fn current_player_num(&self) -> Option<usize> {
        self.current_player
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.current_player.map(|index| &self.players[index])
    }

    pub fn is_player(&self, pid: usize) -> bool {
        pid < self.players.len()
    }

    /// Display name of a player or spectator
    pub fn name_of(&self, pid: usize) -> Option<&str> {
        if let Some(player) = self.players.get(pid) {
            return Some(player.name());
        }
        self.spectator(pid).map(Spectator::name)
    }

    fn spectator(&self, pid: usize) -> Option<&Spectator> {
        pid.checked_sub(MAX_PLAYERS)
            .and_then(|index| self.spectators.get(index))
    }

    /// Whether the token belongs to the participant with this id
    pub fn authenticate(&self, pid: usize, token: &str) -> bool {
        let expected = match self.players.get(pid) {
            Some(player) => Some(player.token()),
            None => self.spectator(pid).map(Spectator::token),
        };
        expected == Some(token)
    }

    /// Seats a new player in the next slot. Capacity is enforced by the session.
    pub fn add_player(&mut self) -> (usize, Token) {
        let pid = self.players.len();
        let player = Player::new(pid, &format!("Player {}", pid + 1));
        let token = player.token().to_owned();
        self.players.push(player);
        (pid, token)
    }

    /// Spectators are numbered after the last seat
    pub fn add_spectator(&mut self) -> (usize, Token) {
        let sid = MAX_PLAYERS + self.spectators.len();
        let spectator = Spectator::new(sid);
        let token = spectator.token().to_owned();
        self.spectators.push(spectator);
        (sid, token)
    }

    pub fn rename(&mut self, pid: usize, name: &str) -> bool {
        if let Some(player) = self.players.get_mut(pid) {
            player.rename(name);
            return true;
        }
        let spectator = pid
            .checked_sub(MAX_PLAYERS)
            .and_then(|index| self.spectators.get_mut(index));
        match spectator {
            Some(spectator) => {
                spectator.rename(name);
                true
            }
            None => false,
        }
    }

    pub fn start(&mut self) -> Result<(), RuleError> {
        if self.state != GameState::Waiting {
            return Err(RuleError::AlreadyStarted);
        }
        if self.players.len() < MIN_PLAYERS {
            return Err(RuleError::NotEnoughPlayers);
        }
        let count = self.players.len();
        self.bank = Gems::start(count).ok_or(RuleError::NotEnoughPlayers)?;
        self.board.shuffle_and_deal(&mut thread_rng());
        self.nobles.truncate(count + 1);

        self.state = GameState::Playing;
        self.current_player = Some(0);
        self.players[0].start_turn();
        info!("Game started with {} players", count);
        Ok(())
    }

    /// Applies an action for the current player. An `Err` leaves the game untouched.
    pub fn play(&mut self, action: Action) -> Result<ActionOutcome, RuleError> {
        let index = match (self.state, self.current_player) {
            (GameState::Playing, Some(index)) => index,
            _ => return Err(RuleError::NotPlaying),
        };
        trace!("Player {} plays {:?}", index, action);

        let player = &mut self.players[index];
        let outcome = match action {
            Take(color) => {
                player.take_gem(color, &mut self.bank)?;
                ActionOutcome::Done
            }
            Discard(color) => {
                player.discard(color, &mut self.bank, &mut self.log)?;
                ActionOutcome::Done
            }
            Buy(card_id) => {
                player.buy(card_id, &mut self.board, &mut self.bank, &mut self.log)?;
                self.end_turn()
            }
            Reserve(target) => {
                player.reserve(target, &mut self.board, &mut self.bank, &mut self.log)?;
                ActionOutcome::Done
            }
            VisitNoble(noble_id) => {
                player.visit_noble(noble_id, &mut self.nobles, &mut self.log)?;
                self.advance();
                ActionOutcome::Done
            }
            Continue => self.end_turn(),
        };

        debug_assert!(self.tokens_conserved(), "Tokens leaked: {:?}", self.bank);
        Ok(outcome)
    }

    /// Settles nobles for the current player, then passes the turn on.
    /// Several qualifying nobles hold the turn until the player picks one.
    fn end_turn(&mut self) -> ActionOutcome {
        let index = match self.current_player {
            Some(index) => index,
            None => return ActionOutcome::Done,
        };
        let player = &mut self.players[index];
        if !player.has_visited() {
            let candidates = player.check_nobles(&self.nobles);
            if candidates.len() > 1 {
                debug!("Player {} may choose among nobles {:?}", index, candidates);
                return ActionOutcome::NoblesPending(candidates);
            }
            if let Some(&noble_id) = candidates.first() {
                if let Err(err) = player.visit_noble(noble_id, &mut self.nobles, &mut self.log) {
                    warn!("Automatic noble visit failed: {}", err);
                }
            }
        }
        self.advance();
        ActionOutcome::Done
    }

    fn advance(&mut self) {
        let index = match self.current_player {
            Some(index) => index,
            None => return,
        };
        if !self.last_round && self.players[index].total_points() >= WIN_POINTS {
            info!("{} reached {} points, last round", self.players[index].name(), WIN_POINTS);
            self.last_round = true;
        }

        let next = (index + 1) % self.players.len();
        if self.last_round && next == 0 {
            self.state = GameState::Ended;
            self.winner = self.determine_winner();
            self.current_player = None;
            info!("Game ended, winner: {:?}", self.winner);
            return;
        }
        self.current_player = Some(next);
        self.players[next].start_turn();
    }

    /// Highest score wins; the first such player in seat order takes a tie
    fn determine_winner(&self) -> Option<usize> {
        let mut winner: Option<usize> = None;
        for (index, player) in self.players.iter().enumerate() {
            let better = match winner {
                Some(best) => player.total_points() > self.players[best].total_points(),
                None => true,
            };
            if better {
                winner = Some(index);
            }
        }
        winner
    }

    /// Bank plus every hand always adds back up to the starting bank
    pub fn tokens_conserved(&self) -> bool {
        let expected = match self.state {
            GameState::Waiting => Gems::gold_only(),
            _ => match Gems::start(self.players.len()) {
                Some(start) => start,
                None => return false,
            },
        };
        let mut total = self.bank;
        for player in &self.players {
            for color in Gem::all() {
                total[color] += player.gems()[color];
            }
        }
        total == expected
    }

    #[cfg(test)]
    pub(crate) fn player_mut(&mut self, pid: usize) -> &mut Player {
        &mut self.players[pid]
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[cfg(test)]
    pub(crate) fn grant(&mut self, pid: usize, gems: Gems) {
        self.players[pid].grant(gems, &mut self.bank);
    }

    #[cfg(test)]
    pub(crate) fn set_nobles(&mut self, nobles: Vec<Noble>) {
        self.nobles = nobles;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Card, Cost};

    /// Testing strategy:
    ///     start:
    ///         - too few players, already started
    ///     play:
    ///         - take then continue passes the turn
    ///         - buy advances, buy with one noble auto visits,
    ///           buy with two nobles holds the turn
    ///         - last round ends exactly when play returns to seat 0
    ///         - tokens conserved across a run of actions

    fn game_with(players: usize) -> Game {
        let catalog = Catalog::standard().unwrap();
        let mut game = Game::new(&catalog);
        for _ in 0..players {
            game.add_player();
        }
        game
    }

    fn started(players: usize) -> Game {
        let mut game = game_with(players);
        game.start().unwrap();
        game
    }

    fn free_card(id: u8, gem: Gem) -> Card {
        Card::new(id, 1, gem, 0, Cost::default())
    }

    fn develop(game: &mut Game, pid: usize, gem: Gem, count: u8, first_id: u8) {
        for n in 0..count {
            game.player_mut(pid)
                .add_development(Card::new(first_id + n, 1, gem, 0, Cost::default()));
        }
    }

    #[test]
    fn test_start_requirements() {
        let mut game = game_with(1);
        assert_eq!(game.start(), Err(RuleError::NotEnoughPlayers));
        assert_eq!(game.state(), GameState::Waiting);
        assert_eq!(game.play(Continue), Err(RuleError::NotPlaying));

        game.add_player();
        game.start().unwrap();
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.current_player_num(), Some(0));
        assert_eq!(game.nobles().len(), 3);
        assert_eq!(game.bank(), &Gems::start(2).unwrap());
        assert_eq!(game.board().deck_counts(), [36, 26, 16]);
        assert_eq!(game.start(), Err(RuleError::AlreadyStarted));
    }

    #[test]
    fn test_participants() {
        let mut game = game_with(2);
        let (sid, token) = game.add_spectator();
        assert_eq!(sid, MAX_PLAYERS);
        assert_eq!(game.name_of(1), Some("Player 2"));
        assert_eq!(game.name_of(sid), Some("Spec-4"));
        assert!(game.authenticate(sid, &token));
        assert!(!game.authenticate(0, &token));
        assert!(!game.authenticate(9, &token));

        assert!(game.rename(sid, "Watcher"));
        assert_eq!(game.name_of(sid), Some("Watcher"));
        assert!(!game.rename(3, "Ghost"));
    }

    #[test]
    fn test_take_three_then_next() {
        let mut game = started(2);
        for color in [Gem::Diamond, Gem::Sapphire, Gem::Emerald] {
            assert_eq!(game.play(Take(color)), Ok(ActionOutcome::Done));
        }
        assert!(game.players()[0].is_finished());
        assert_eq!(game.current_player_num(), Some(0));
        assert_eq!(game.play(Take(Gem::Ruby)), Err(RuleError::AlreadyActed));

        assert_eq!(game.play(Continue), Ok(ActionOutcome::Done));
        assert_eq!(game.current_player_num(), Some(1));
        assert!(!game.players()[1].is_finished());
    }

    #[test]
    fn test_tenth_gem_then_over_cap() {
        let mut game = started(2);
        game.grant(
            0,
            Gems {
                diamond: 3,
                sapphire: 3,
                ruby: 3,
                ..Gems::empty()
            },
        );
        assert_eq!(game.play(Take(Gem::Onyx)), Ok(ActionOutcome::Done));
        assert_eq!(game.players()[0].gems().total(), 10);
        let bank = *game.bank();
        assert_eq!(game.play(Take(Gem::Emerald)), Err(RuleError::TooManyGems));
        assert_eq!(game.bank(), &bank);
        assert_eq!(
            game.play(Take(Gem::Emerald)).unwrap_err().to_string(),
            "You already have 10 gems"
        );
    }

    #[test]
    fn test_buy_advances_turn() {
        let mut game = started(2);
        game.board_mut().place(0, free_card(0, Gem::Diamond));
        assert_eq!(game.play(Buy(0)), Ok(ActionOutcome::Done));
        assert_eq!(game.current_player_num(), Some(1));
        assert_eq!(game.players()[0].num_developments(), 1);
    }

    #[test]
    fn test_single_noble_visits_automatically() {
        let catalog = Catalog::standard().unwrap();
        let mut game = started(2);
        game.set_nobles(vec![catalog.nobles()[0].clone(), catalog.nobles()[1].clone()]);
        develop(&mut game, 0, Gem::Emerald, 4, 100);
        develop(&mut game, 0, Gem::Ruby, 3, 110);
        game.board_mut().place(1, free_card(24, Gem::Ruby));

        assert_eq!(game.play(Buy(24)), Ok(ActionOutcome::Done));
        assert_eq!(game.players()[0].total_points(), 3);
        assert_eq!(game.nobles().len(), 1);
        assert_eq!(game.current_player_num(), Some(1));
        assert_eq!(
            game.log().last_message(),
            Some("Player 1 visits a noble: (+3🔸)[4🟢4🔴]")
        );
    }

    #[test]
    fn test_two_nobles_hold_the_turn() {
        let catalog = Catalog::standard().unwrap();
        let mut game = started(2);
        // 4G4R and 3G3R3K
        game.set_nobles(vec![catalog.nobles()[0].clone(), catalog.nobles()[2].clone()]);
        develop(&mut game, 0, Gem::Emerald, 4, 100);
        develop(&mut game, 0, Gem::Ruby, 3, 110);
        develop(&mut game, 0, Gem::Onyx, 3, 120);
        game.board_mut().place(1, free_card(24, Gem::Ruby));

        assert_eq!(game.play(Buy(24)), Ok(ActionOutcome::NoblesPending(vec![0, 2])));
        assert_eq!(game.current_player_num(), Some(0));

        // Asking to end the turn again surfaces the same choice
        assert_eq!(game.play(Continue), Ok(ActionOutcome::NoblesPending(vec![0, 2])));
        assert_eq!(game.play(VisitNoble(5)), Err(RuleError::NobleNotAvailable));

        assert_eq!(game.play(VisitNoble(2)), Ok(ActionOutcome::Done));
        assert_eq!(game.current_player_num(), Some(1));
        assert_eq!(game.players()[0].total_points(), 3);
        assert_eq!(game.nobles().len(), 1);
        assert_eq!(game.nobles()[0].id(), 0);
    }

    #[test]
    fn test_reserve_with_no_gold_left() {
        let mut game = started(2);
        game.grant(1, Gems::gold_only());
        assert_eq!(game.bank().gold, 0);
        assert_eq!(
            game.play(Reserve(ReserveTarget::Pile(2))),
            Ok(ActionOutcome::Done)
        );
        assert_eq!(game.players()[0].reserved().len(), 1);
        assert_eq!(game.players()[0].gems().gold, 0);
        assert!(game.tokens_conserved());
    }

    #[test]
    fn test_last_round_ends_at_seat_zero() {
        let mut game = started(3);
        game.player_mut(1)
            .add_development(Card::new(200, 3, Gem::Onyx, 15, Cost::default()));

        game.play(Continue).unwrap();
        assert!(!game.last_round());
        game.play(Continue).unwrap();
        assert!(game.last_round());
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.current_player_num(), Some(2));

        game.play(Continue).unwrap();
        assert_eq!(game.state(), GameState::Ended);
        assert_eq!(game.current_player_num(), None);
        assert_eq!(game.winner(), Some(1));
        assert_eq!(game.play(Take(Gem::Ruby)), Err(RuleError::NotPlaying));
    }

    #[test]
    fn test_tie_goes_to_first_seat() {
        let mut game = started(3);
        for pid in [2, 1] {
            game.player_mut(pid)
                .add_development(Card::new(200 + pid as u8, 3, Gem::Onyx, 15, Cost::default()));
        }
        for _ in 0..3 {
            game.play(Continue).unwrap();
        }
        assert_eq!(game.state(), GameState::Ended);
        assert_eq!(game.winner(), Some(1));
    }

    #[test]
    fn test_tokens_conserved_through_play() {
        let mut game = started(3);
        assert!(game.tokens_conserved());
        let script = [
            Take(Gem::Ruby),
            Take(Gem::Ruby),
            Continue,
            Reserve(ReserveTarget::Pile(1)),
            Continue,
            Take(Gem::Onyx),
            Discard(Gem::Onyx),
            Take(Gem::Diamond),
            Continue,
            Discard(Gem::Ruby),
            Continue,
        ];
        for action in script {
            game.play(action).unwrap();
            assert!(game.tokens_conserved());
        }
        assert_eq!(game.log().last_message(), Some("Player 1 discards 1🔴"));
        assert_eq!(game.current_player_num(), Some(1));
    }
}
