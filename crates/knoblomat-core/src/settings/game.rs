//! Game score.

use super::Settings;
use crate::config::GAME_NAMESPACE;
use crate::error::SettingsError;
use crate::json::Document;
use crate::store::{KeyValueStore, Session};
use serde_json::{json, Value};

const KEY_TIES: &str = "Ties";
const KEY_WINS: &str = "Wins";
const KEY_LOSSES: &str = "Losses";

const KEYS: [&str; 3] = [KEY_TIES, KEY_WINS, KEY_LOSSES];

/// Result of a single round, seen from the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Tie,
    Win,
    Loss,
}

/// Accumulated game results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameSettings {
    /// Total number of ties.
    pub ties: i32,

    /// Total number of wins.
    pub wins: i32,

    /// Total number of losses.
    pub losses: i32,
}

impl GameSettings {
    /// Count one round. Counters saturate at `i32::MAX`.
    pub fn record(&mut self, outcome: Outcome) {
        let counter = match outcome {
            Outcome::Tie => &mut self.ties,
            Outcome::Win => &mut self.wins,
            Outcome::Loss => &mut self.losses,
        };
        *counter = counter.saturating_add(1);
    }

    /// Number of rounds played.
    pub fn total(&self) -> i64 {
        i64::from(self.ties) + i64::from(self.wins) + i64::from(self.losses)
    }
}

impl Settings for GameSettings {
    fn init<S: KeyValueStore>(&mut self, store: &S) -> Result<(), SettingsError> {
        let session = store.open(GAME_NAMESPACE)?;
        self.ties = session.int_or(KEY_TIES, 0)?;
        self.wins = session.int_or(KEY_WINS, 0)?;
        self.losses = session.int_or(KEY_LOSSES, 0)?;
        tracing::debug!("Loaded {} settings", GAME_NAMESPACE);
        Ok(())
    }

    fn save<S: KeyValueStore>(&self, store: &S) -> Result<(), SettingsError> {
        let mut session = store.open(GAME_NAMESPACE)?;
        session.put_int(KEY_TIES, self.ties)?;
        session.put_int(KEY_WINS, self.wins)?;
        session.put_int(KEY_LOSSES, self.losses)?;
        tracing::debug!("Saved {} settings", GAME_NAMESPACE);
        Ok(())
    }

    fn clear<S: KeyValueStore>(&self, store: &S) -> Result<(), SettingsError> {
        let mut session = store.open(GAME_NAMESPACE)?;
        for key in KEYS {
            session.remove(key)?;
        }
        tracing::debug!("Cleared {} settings", GAME_NAMESPACE);
        Ok(())
    }

    fn to_json(&self) -> Value {
        json!({
            KEY_TIES: self.ties,
            KEY_WINS: self.wins,
            KEY_LOSSES: self.losses,
        })
    }

    fn merge(&mut self, doc: &Document) {
        self.ties = doc.int(KEY_TIES, self.ties);
        self.wins = doc.int(KEY_WINS, self.wins);
        self.losses = doc.int(KEY_LOSSES, self.losses);
    }
}
