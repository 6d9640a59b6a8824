//! Answer pool
//!
//! The phrases still eligible for the active difficulty. Picking removes the
//! phrase, so nothing repeats until the pool is rebuilt.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Difficulty, Phrase};
use crate::error::GameError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerPool {
    difficulty: Difficulty,
    remaining: Vec<Phrase>,
}

impl AnswerPool {
    /// Fresh pool holding every catalog phrase of `difficulty`, all unused
    pub fn rebuild(catalog: &Catalog, difficulty: Difficulty) -> Self {
        let remaining: Vec<Phrase> = catalog
            .of_difficulty(difficulty)
            .map(|p| Phrase {
                used: false,
                ..p.clone()
            })
            .collect();
        log::debug!(
            "Answer pool rebuilt: {} {} phrases",
            remaining.len(),
            difficulty.as_str()
        );
        Self {
            difficulty,
            remaining,
        }
    }

    /// Draw a phrase uniformly at random and retire it from the pool.
    ///
    /// The returned copy is marked `used`; the catalog is never touched.
    pub fn pick_next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Phrase, GameError> {
        if self.remaining.is_empty() {
            return Err(GameError::PoolExhausted(self.difficulty));
        }
        let index = rng.random_range(0..self.remaining.len());
        let mut phrase = self.remaining.swap_remove(index);
        phrase.used = true;
        Ok(phrase)
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.remaining.iter().any(|p| p.id == id)
    }

    pub fn phrases(&self) -> &[Phrase] {
        &self.remaining
    }
}
