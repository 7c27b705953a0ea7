use super::SessionPool;
use crate::constants::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use log::{debug, info};

/// Timing knobs of the lobby
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LobbyConfig {
    /// How often a blocked poll re-checks its changed flag
    pub poll_interval: Duration,
    /// Unstarted sessions older than this are reaped
    pub waiting_timeout: Duration,
    /// Started sessions older than this are reaped, ended or not
    pub playing_timeout: Duration,
    pub sweep_interval: Duration,
}

impl Default for LobbyConfig {
    fn default() -> Self {
        LobbyConfig {
            poll_interval: POLL_INTERVAL,
            waiting_timeout: WAITING_TIMEOUT,
            playing_timeout: PLAYING_TIMEOUT,
            sweep_interval: SWEEP_INTERVAL,
        }
    }
}

impl LobbyConfig {
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Whether a session of this age has outlived its timeout
    pub fn is_expired(&self, age: Duration, started: bool) -> bool {
        let timeout = if started {
            self.playing_timeout
        } else {
            self.waiting_timeout
        };
        age >= timeout
    }
}

/// Reaps expired sessions every `sweep_interval` for as long as the
/// pool is alive
pub fn spawn_sweeper(pool: Arc<SessionPool>) -> JoinHandle<()> {
    let interval = pool.config().sweep_interval;
    info!("Sweeping expired games every {:?}", interval);
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;
            let reaped = pool.sweep().await;
            debug!("Sweep reaped {} games, {} left", reaped, pool.len());
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeouts_depend_on_start() {
        let config = LobbyConfig::default();
        let eleven_minutes = Duration::from_secs(11 * 60);
        assert!(config.is_expired(eleven_minutes, false));
        assert!(!config.is_expired(eleven_minutes, true));
        assert!(config.is_expired(Duration::from_secs(25 * 60 * 60), true));
        assert!(!config.is_expired(Duration::from_secs(60), false));
    }
}
