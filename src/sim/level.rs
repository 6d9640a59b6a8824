//! Level controller
//!
//! Picks the next phrase and decides which answer box holds the correct
//! answer.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::pool::AnswerPool;
use crate::catalog::{Catalog, Difficulty};
use crate::error::GameError;

/// Run length: how many correct matches win the level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LevelTier {
    #[default]
    Short,
    Medium,
    Long,
}

impl LevelTier {
    pub const ALL: [LevelTier; 3] = [LevelTier::Short, LevelTier::Medium, LevelTier::Long];

    /// Map a menu index (0-2) to a tier
    pub fn from_index(index: usize) -> Result<Self, GameError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(GameError::InvalidLevelSelection(index))
    }

    pub fn index(&self) -> usize {
        match self {
            LevelTier::Short => 0,
            LevelTier::Medium => 1,
            LevelTier::Long => 2,
        }
    }

    /// Correct matches needed to win
    pub fn matches_required(&self) -> u32 {
        match self {
            LevelTier::Short => 5,
            LevelTier::Medium => 10,
            LevelTier::Long => 15,
        }
    }

    /// Score multiplier for this tier
    pub fn multiplier(&self) -> f64 {
        match self {
            LevelTier::Short => 1.0,
            LevelTier::Medium => 2.5,
            LevelTier::Long => 5.0,
        }
    }
}

/// One of the two answer boxes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetSlot {
    Left,
    Right,
}

impl TargetSlot {
    pub const BOTH: [TargetSlot; 2] = [TargetSlot::Left, TargetSlot::Right];

    pub fn other(&self) -> Self {
        match self {
            TargetSlot::Left => TargetSlot::Right,
            TargetSlot::Right => TargetSlot::Left,
        }
    }
}

/// Metadata carried by an answer box for the current phrase
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnswerTarget {
    pub correct: bool,
    pub phrase_id: u32,
    pub label: String,
}

/// Slot -> target metadata. Built only by [`AnswerTargets::assign`], so exactly
/// one slot is ever marked correct once a level is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnswerTargets {
    left: AnswerTarget,
    right: AnswerTarget,
}

impl AnswerTargets {
    /// Place the correct answer in `correct_slot` and the other answer opposite
    pub fn assign(
        correct_slot: TargetSlot,
        phrase_id: u32,
        correct_answer: &str,
        incorrect_answer: &str,
    ) -> Self {
        let correct = AnswerTarget {
            correct: true,
            phrase_id,
            label: correct_answer.to_string(),
        };
        let incorrect = AnswerTarget {
            correct: false,
            phrase_id,
            label: incorrect_answer.to_string(),
        };
        match correct_slot {
            TargetSlot::Left => Self {
                left: correct,
                right: incorrect,
            },
            TargetSlot::Right => Self {
                left: incorrect,
                right: correct,
            },
        }
    }

    pub fn get(&self, slot: TargetSlot) -> &AnswerTarget {
        match slot {
            TargetSlot::Left => &self.left,
            TargetSlot::Right => &self.right,
        }
    }

    pub fn is_correct(&self, slot: TargetSlot) -> bool {
        self.get(slot).correct
    }

    pub fn correct_slot(&self) -> Option<TargetSlot> {
        TargetSlot::BOTH.into_iter().find(|s| self.is_correct(*s))
    }

    pub fn correct_count(&self) -> usize {
        TargetSlot::BOTH
            .iter()
            .filter(|s| self.is_correct(**s))
            .count()
    }
}

/// Everything the renderer needs to display a freshly loaded level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSetup {
    pub phrase_id: u32,
    pub phrase_text: String,
    pub matches_required: u32,
    pub targets: AnswerTargets,
}

/// Load the next level: draw a phrase and label the two answer boxes.
///
/// An exhausted pool (or one built for another difficulty) is rebuilt before
/// drawing again.
pub fn load_level<R: Rng + ?Sized>(
    tier: LevelTier,
    difficulty: Difficulty,
    pool: &mut AnswerPool,
    catalog: &Catalog,
    rng: &mut R,
) -> Result<LevelSetup, GameError> {
    if pool.difficulty() != difficulty {
        *pool = AnswerPool::rebuild(catalog, difficulty);
    }

    let phrase = match pool.pick_next(rng) {
        Ok(phrase) => phrase,
        Err(GameError::PoolExhausted(d)) => {
            log::warn!("{} answer pool exhausted mid-session, rebuilding", d.as_str());
            *pool = AnswerPool::rebuild(catalog, difficulty);
            pool.pick_next(rng)?
        }
        Err(e) => return Err(e),
    };

    let correct_slot = if rng.random_bool(0.5) {
        TargetSlot::Left
    } else {
        TargetSlot::Right
    };
    let targets = AnswerTargets::assign(
        correct_slot,
        phrase.id,
        &phrase.correct_answer,
        &phrase.incorrect_answer,
    );

    log::debug!(
        "Level loaded: phrase {} ({:?} is correct), {} matches to win",
        phrase.id,
        correct_slot,
        tier.matches_required()
    );

    Ok(LevelSetup {
        phrase_id: phrase.id,
        phrase_text: phrase.text,
        matches_required: tier.matches_required(),
        targets,
    })
}
