//! Error type shared by the catalog, simulation and storage layers.
//!
//! Nothing here is fatal to a running session: callers log the error and keep
//! the current state.

use thiserror::Error;

use crate::catalog::Difficulty;
use crate::sim::effects::EffectId;

#[derive(Debug, Error)]
pub enum GameError {
    /// The answer pool has no eligible phrases left
    #[error("no unused {0:?} phrases left in the answer pool")]
    PoolExhausted(Difficulty),

    #[error("difficulty index {0} is out of range")]
    InvalidDifficultySelection(usize),

    #[error("level index {0} is out of range")]
    InvalidLevelSelection(usize),

    /// A deferred effect fired after the session was restarted
    #[error("effect {id} from epoch {scheduled} fired during epoch {current}")]
    StaleEffectCallback {
        id: EffectId,
        scheduled: u64,
        current: u64,
    },

    #[error("phrase catalog is invalid: {0}")]
    InvalidCatalog(String),

    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}
