//! Phrase catalog
//!
//! Static quiz content: each phrase has one correct and one incorrect answer
//! and belongs to a single difficulty. The built-in catalog is embedded from
//! `assets/phrases.json`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Phrase content category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    /// Map a menu index (0-2) to a difficulty
    pub fn from_index(index: usize) -> Result<Self, GameError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(GameError::InvalidDifficultySelection(index))
    }

    pub fn index(&self) -> usize {
        match self {
            Difficulty::Beginner => 0,
            Difficulty::Intermediate => 1,
            Difficulty::Advanced => 2,
        }
    }

    /// Score multiplier for this difficulty
    pub fn multiplier(&self) -> f64 {
        match self {
            Difficulty::Beginner => 1.0,
            Difficulty::Intermediate => 1.5,
            Difficulty::Advanced => 2.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

/// A quiz phrase with its two candidate answers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
    pub id: u32,
    pub text: String,
    pub correct_answer: String,
    pub incorrect_answer: String,
    pub difficulty: Difficulty,
    /// Set on the copy handed out by the answer pool
    #[serde(default)]
    pub used: bool,
}

/// The full, immutable list of phrases
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    phrases: Vec<Phrase>,
}

impl Catalog {
    const BUILTIN_JSON: &'static str = include_str!("../assets/phrases.json");

    /// Build a catalog, rejecting duplicate ids, empty difficulties and
    /// phrases whose two answers are identical.
    pub fn new(phrases: Vec<Phrase>) -> Result<Self, GameError> {
        let mut ids = HashSet::new();
        for phrase in &phrases {
            if !ids.insert(phrase.id) {
                return Err(GameError::InvalidCatalog(format!(
                    "duplicate phrase id {}",
                    phrase.id
                )));
            }
            if phrase.correct_answer == phrase.incorrect_answer {
                return Err(GameError::InvalidCatalog(format!(
                    "phrase {} has identical answers",
                    phrase.id
                )));
            }
        }
        for difficulty in Difficulty::ALL {
            if !phrases.iter().any(|p| p.difficulty == difficulty) {
                return Err(GameError::InvalidCatalog(format!(
                    "no {} phrases",
                    difficulty.as_str()
                )));
            }
        }
        Ok(Self { phrases })
    }

    /// Parse a catalog from a JSON array of phrases
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let phrases: Vec<Phrase> = serde_json::from_str(json)?;
        Self::new(phrases)
    }

    /// The catalog shipped with the game
    pub fn builtin() -> Result<Self, GameError> {
        Self::from_json(Self::BUILTIN_JSON)
    }

    pub fn phrases(&self) -> &[Phrase] {
        &self.phrases
    }

    /// All phrases of one difficulty, in catalog order
    pub fn of_difficulty(&self, difficulty: Difficulty) -> impl Iterator<Item = &Phrase> {
        self.phrases
            .iter()
            .filter(move |p| p.difficulty == difficulty)
    }

    pub fn count(&self, difficulty: Difficulty) -> usize {
        self.of_difficulty(difficulty).count()
    }

    pub fn get(&self, id: u32) -> Option<&Phrase> {
        self.phrases.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phrase(id: u32, difficulty: Difficulty) -> Phrase {
        Phrase {
            id,
            text: format!("phrase {id}"),
            correct_answer: "yes".into(),
            incorrect_answer: "no".into(),
            difficulty,
            used: false,
        }
    }

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = Catalog::builtin().expect("built-in catalog parses");
        for difficulty in Difficulty::ALL {
            // Enough phrases to finish the longest tier without a rebuild
            assert!(catalog.count(difficulty) >= 15, "{difficulty:?}");
        }
        assert!(catalog.phrases().iter().all(|p| !p.used));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let phrases = vec![
            phrase(1, Difficulty::Beginner),
            phrase(1, Difficulty::Intermediate),
            phrase(2, Difficulty::Advanced),
        ];
        assert!(matches!(
            Catalog::new(phrases),
            Err(GameError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn test_missing_difficulty_rejected() {
        let phrases = vec![phrase(1, Difficulty::Beginner), phrase(2, Difficulty::Advanced)];
        assert!(Catalog::new(phrases).is_err());
    }

    #[test]
    fn test_difficulty_index_round_trip() {
        for (i, d) in Difficulty::ALL.iter().enumerate() {
            assert_eq!(Difficulty::from_index(i).unwrap(), *d);
            assert_eq!(d.index(), i);
        }
        assert!(matches!(
            Difficulty::from_index(3),
            Err(GameError::InvalidDifficultySelection(3))
        ));
    }

    #[test]
    fn test_json_uses_lowercase_difficulty() {
        let json = r#"[
            {"id": 1, "text": "a", "correct_answer": "b", "incorrect_answer": "c", "difficulty": "beginner"},
            {"id": 2, "text": "d", "correct_answer": "e", "incorrect_answer": "f", "difficulty": "intermediate"},
            {"id": 3, "text": "g", "correct_answer": "h", "incorrect_answer": "i", "difficulty": "advanced"}
        ]"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.get(2).unwrap().difficulty, Difficulty::Intermediate);
    }
}
