use super::*;
use crate::catalog::{Catalog, WordList};
use crate::game_logic::Action;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use log::{debug, info, trace};

/// Attempts at an unused bare word before suffixing a number
const SUGGEST_ATTEMPTS: usize = 16;

/// Every live session, keyed by the name its creator picked. The registry
/// map is only touched to look sessions up, add them or drop them; all game
/// work happens under the session's own lock.
pub struct SessionPool {
    sessions: DashMap<String, GlobalSession>,
    catalog: Arc<Catalog>,
    words: WordList,
    config: LobbyConfig,
}

impl SessionPool {
    pub fn new(catalog: Arc<Catalog>, words: WordList, config: LobbyConfig) -> Self {
        SessionPool {
            sessions: DashMap::new(),
            catalog,
            words,
            config,
        }
    }

    pub fn config(&self) -> &LobbyConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn session(&self, key: &str) -> Result<GlobalSession, LobbyError> {
        self.sessions
            .get(key)
            .map(|session| session.value().clone())
            .ok_or(LobbyError::GameNotFound)
    }

    /// Drops the session under `key` only if it is still this very session
    fn remove(&self, key: &str, session: &GlobalSession) -> bool {
        self.sessions
            .remove_if(key, |_, current| Arc::ptr_eq(current, session))
            .is_some()
    }

    pub fn create(&self, key: &str) -> Result<Created, LobbyError> {
        match self.sessions.entry(key.to_owned()) {
            Entry::Occupied(_) => Err(LobbyError::GameExists),
            Entry::Vacant(entry) => {
                let session = Session::new(key, &self.catalog);
                let created = Created {
                    game: key.to_owned(),
                    start: session.starter().to_owned(),
                    state: GameView::new(session.game(), None),
                };
                entry.insert(Arc::new(RwLock::new(session)));
                info!("Game {:?} created", key);
                Ok(created)
            }
        }
    }

    pub async fn join(&self, key: &str) -> Result<Joined, LobbyError> {
        let session = self.session(key)?;
        let joined = session.write().await.join()?;
        Ok(joined)
    }

    pub async fn watch(&self, key: &str) -> Result<Joined, LobbyError> {
        let session = self.session(key)?;
        let joined = session.write().await.watch()?;
        Ok(joined)
    }

    pub async fn start(&self, key: &str, starter: &str) -> Result<(), LobbyError> {
        let session = self.session(key)?;
        let mut session = session.write().await;
        session.start(starter)
    }

    pub async fn act(
        &self,
        key: &str,
        pid: usize,
        token: &str,
        action: Action,
    ) -> Result<Snapshot, LobbyError> {
        let session = self.session(key)?;
        let mut session = session.write().await;
        session.authorize(pid, token)?;
        let outcome = session.act(pid, action).map_err(|err| {
            debug!("Game {:?}: player {} rejected: {}", key, pid, err);
            err
        })?;
        Ok(session.snapshot(pid, outcome.into()))
    }

    pub async fn next_turn(&self, key: &str, pid: usize, token: &str) -> Result<Snapshot, LobbyError> {
        self.act(key, pid, token, Action::Continue).await
    }

    pub async fn chat(
        &self,
        key: &str,
        pid: usize,
        token: &str,
        msg: &str,
    ) -> Result<Snapshot, LobbyError> {
        let session = self.session(key)?;
        let mut session = session.write().await;
        session.authorize(pid, token)?;
        session.chat(pid, msg);
        Ok(session.snapshot(pid, ActionResult::default()))
    }

    pub async fn rename(&self, key: &str, pid: usize, token: &str, name: &str) -> Result<(), LobbyError> {
        let session = self.session(key)?;
        let mut session = session.write().await;
        session.authorize(pid, token)?;
        session.rename(pid, name);
        Ok(())
    }

    /// Current state, without waiting
    pub async fn stat(&self, key: &str, pid: usize, token: &str) -> Result<Snapshot, LobbyError> {
        let session = self.session(key)?;
        let session = session.read().await;
        session.authorize(pid, token)?;
        Ok(session.snapshot(pid, ActionResult::default()))
    }

    /// Waits until something the participant hasn't seen happens, then
    /// returns the new state. No lock is held while waiting.
    pub async fn poll(&self, key: &str, pid: usize, token: &str) -> Result<Snapshot, LobbyError> {
        let session = self.session(key)?;
        session.read().await.authorize(pid, token)?;

        loop {
            let changed = session.read().await.has_changed(pid);
            if changed {
                break;
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }
        trace!("Game {:?}: poll by {} woke up", key, pid);

        let (snapshot, everyone_saw_end) = {
            let mut guard = session.write().await;
            let everyone_saw_end = guard.consume_change(pid);
            if everyone_saw_end {
                guard.close();
            }
            (guard.snapshot(pid, ActionResult::default()), everyone_saw_end)
        };
        if everyone_saw_end && self.remove(key, &session) {
            info!("Game {:?} destroyed, every player has seen the end", key);
        }
        Ok(snapshot)
    }

    /// Every live session, after reaping the expired ones
    pub async fn list(&self) -> Vec<ListEntry> {
        self.sweep().await;
        let mut entries = Vec::new();
        for session in self.all() {
            entries.push(session.read().await.summary());
        }
        entries.sort_by(|a, b| a.game.cmp(&b.game));
        entries
    }

    /// A word that isn't the name of a live session
    pub fn suggest_name(&self) -> String {
        for _ in 0..SUGGEST_ATTEMPTS {
            let word = self.words.random();
            if !self.sessions.contains_key(word) {
                return word.to_owned();
            }
        }
        let word = self.words.random();
        (2..)
            .map(|n| format!("{}-{}", word, n))
            .find(|name| !self.sessions.contains_key(name))
            .unwrap_or_else(|| word.to_owned())
    }

    /// Closes and drops every session that outlived its timeout.
    /// Returns how many were reaped.
    pub async fn sweep(&self) -> usize {
        let mut reaped = 0;
        for session in self.all() {
            let key = {
                let mut guard = session.write().await;
                if !self.config.is_expired(guard.age(), guard.is_started()) {
                    continue;
                }
                guard.close();
                guard.key().to_owned()
            };
            if self.remove(&key, &session) {
                info!("Game {:?} expired", key);
                reaped += 1;
            }
        }
        reaped
    }

    /// Handles to every session, so no registry guard is held across an await
    fn all(&self) -> Vec<GlobalSession> {
        self.sessions
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }
}
