//! Best score
//!
//! A single value persisted under [`HIGH_SCORE_KEY`].

use crate::consts::HIGH_SCORE_KEY;
use crate::error::GameError;
use crate::persistence::ScoreStore;

/// Best score bookkeeping on top of a [`ScoreStore`]
pub struct HighScore;

impl HighScore {
    /// Current best, if one was ever recorded
    pub fn load(store: &dyn ScoreStore) -> Option<u64> {
        store.get(HIGH_SCORE_KEY)
    }

    /// Record a finished run's score. The stored value is initialised when
    /// absent and replaced only when exceeded. Returns the best after the update.
    pub fn record(store: &mut dyn ScoreStore, score: u64) -> Result<u64, GameError> {
        match Self::load(store) {
            Some(best) if best >= score => Ok(best),
            previous => {
                store.set(HIGH_SCORE_KEY, score)?;
                log::info!("New best score {} (was {:?})", score, previous);
                Ok(score)
            }
        }
    }
}
