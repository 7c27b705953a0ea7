use super::*;
use crate::catalog::Catalog;
use crate::constants::MAX_PLAYERS;
use crate::game_logic::history::unix_now;
use crate::game_logic::*;
use crate::player::{new_token, Token};

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use log::info;

pub type GlobalSession = Arc<RwLock<Session>>;

/// One game plus everything needed to serve it to its participants:
/// who has unseen changes, who has seen the end, and the chat.
#[derive(Debug)]
pub struct Session {
    key: String,
    starter: Token,
    game: Game,
    /// Participant id -> whether they have a change they haven't polled yet
    changed: HashMap<usize, bool>,
    /// Players who have polled the ended game
    acknowledged: HashSet<usize>,
    chat: Vec<ChatMessage>,
    created: Instant,
    started: bool,
    closed: bool,
}

impl Session {
    pub fn new(key: &str, catalog: &Catalog) -> Session {
        Session {
            key: key.to_owned(),
            starter: new_token(),
            game: Game::new(catalog),
            changed: HashMap::new(),
            acknowledged: HashSet::new(),
            chat: Vec::new(),
            created: Instant::now(),
            started: false,
            closed: false,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn starter(&self) -> &str {
        &self.starter
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn chat_log(&self) -> &[ChatMessage] {
        &self.chat
    }

    pub fn age(&self) -> Duration {
        self.created.elapsed()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn summary(&self) -> ListEntry {
        ListEntry {
            game: self.key.clone(),
            n_players: self.game.players().len(),
            in_progress: self.started,
        }
    }

    /// Checks a participant's credentials
    pub fn authorize(&self, pid: usize, token: &str) -> Result<(), LobbyError> {
        if self.game.authenticate(pid, token) {
            Ok(())
        } else {
            Err(LobbyError::InvalidCredentials)
        }
    }

    pub fn join(&mut self) -> Result<Joined, LobbyError> {
        if self.closed {
            return Err(LobbyError::SessionClosed);
        }
        if self.game.players().len() >= MAX_PLAYERS {
            return Err(LobbyError::GameFull);
        }
        if self.started {
            return Err(LobbyError::JoinAfterStart);
        }
        let (id, uuid) = self.game.add_player();
        self.changed.insert(id, false);
        self.mark_changed();
        info!(
            "Game {:?} joined ({} players)",
            self.key,
            self.game.players().len()
        );
        Ok(Joined { id, uuid })
    }

    pub fn watch(&mut self) -> Result<Joined, LobbyError> {
        if self.closed {
            return Err(LobbyError::SessionClosed);
        }
        let (id, uuid) = self.game.add_spectator();
        self.changed.insert(id, false);
        self.mark_changed();
        info!("Game {:?} watched by spectator {}", self.key, id);
        Ok(Joined { id, uuid })
    }

    pub fn start(&mut self, starter: &str) -> Result<(), LobbyError> {
        if starter != self.starter {
            return Err(LobbyError::NotStarter);
        }
        if self.started {
            return Err(LobbyError::AlreadyStarted);
        }
        self.game.start()?;
        self.started = true;
        self.mark_changed();
        info!("Game {:?} started", self.key);
        Ok(())
    }

    /// Plays an action for the participant, who must hold the turn
    pub fn act(&mut self, pid: usize, action: Action) -> Result<ActionOutcome, LobbyError> {
        if self.game.current_player_num() != Some(pid) {
            return Err(LobbyError::NotYourTurn);
        }
        let outcome = self.game.play(action)?;
        self.mark_changed();
        if self.game.state() == GameState::Ended {
            info!("Game {:?} ended, winner {:?}", self.key, self.game.winner());
        }
        Ok(outcome)
    }

    pub fn chat(&mut self, pid: usize, msg: &str) {
        let name = self.game.name_of(pid).unwrap_or_default().to_owned();
        self.chat.push(ChatMessage {
            pid,
            name,
            msg: msg.to_owned(),
            time: unix_now(),
        });
        self.mark_changed();
    }

    pub fn rename(&mut self, pid: usize, name: &str) {
        if self.game.rename(pid, name) {
            self.mark_changed();
        }
    }

    pub fn snapshot(&self, pid: usize, result: ActionResult) -> Snapshot {
        Snapshot {
            state: GameView::new(&self.game, Some(pid)),
            result,
            chat: self.chat.clone(),
        }
    }

    /// Raises every participant's changed flag
    pub fn mark_changed(&mut self) {
        for flag in self.changed.values_mut() {
            *flag = true;
        }
    }

    /// A closed session always reads as changed so waiting pollers can leave
    pub fn has_changed(&self, pid: usize) -> bool {
        self.closed || self.changed.get(&pid).copied().unwrap_or(false)
    }

    /// Clears the participant's flag after a poll has picked up the change.
    /// Returns true once every player has seen the game end.
    pub fn consume_change(&mut self, pid: usize) -> bool {
        if let Some(flag) = self.changed.get_mut(&pid) {
            *flag = false;
        }
        if self.game.state() != GameState::Ended {
            return false;
        }
        if self.game.is_player(pid) {
            self.acknowledged.insert(pid);
        }
        self.acknowledged.len() >= self.game.players().len()
    }

    /// Marks the session as gone and wakes everyone still waiting on it
    pub fn close(&mut self) {
        self.closed = true;
        self.mark_changed();
    }

    #[cfg(test)]
    pub(crate) fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }
}
