use serde::Serialize;
use std::fmt;

use crate::catalog::SubjectRef;
use crate::scoring::{scaled_score, MIN_SUBJECTS};

/// Lowest accepted raw score
pub const MIN_RAW_SCORE: f64 = 0.0;

/// Highest accepted raw score
pub const MAX_RAW_SCORE: f64 = 100.0;

/// A chosen subject with the student's raw score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionEntry {
    pub subject: SubjectRef,
    pub raw_score: f64,
}

impl SelectionEntry {
    pub fn scaled_score(&self) -> f64 {
        scaled_score(self.raw_score, self.subject.scaling_factor)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionError {
    ScoreOutOfRange { subject: String, score: f64 },
    DuplicateSubject(String),
    UnknownSubject(String),
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::ScoreOutOfRange { subject, score } => write!(
                f,
                "Score {} for '{}' is out of range (must be between {} and {})",
                score, subject, MIN_RAW_SCORE, MAX_RAW_SCORE
            ),
            SelectionError::DuplicateSubject(id) => {
                write!(f, "Subject '{}' is already selected", id)
            }
            SelectionError::UnknownSubject(id) => {
                write!(f, "Unknown subject '{}' (see `atar-calc subjects`)", id)
            }
            SelectionError::IndexOutOfRange { index, len } => write!(
                f,
                "Invalid index {}. Must be between 1 and {}.",
                index + 1,
                len
            ),
        }
    }
}

impl std::error::Error for SelectionError {}

/// Check a raw score is a finite number within 0-100
pub fn validate_raw_score(subject: &SubjectRef, score: f64) -> Result<(), SelectionError> {
    if score.is_finite() && (MIN_RAW_SCORE..=MAX_RAW_SCORE).contains(&score) {
        Ok(())
    } else {
        Err(SelectionError::ScoreOutOfRange {
            subject: subject.name.clone(),
            score,
        })
    }
}

/// The student's ordered list of subjects and scores.
///
/// Entries are range-checked here, before they ever reach the scoring engine.
/// Order is insertion order, which the engine uses to break ranking ties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    entries: Vec<SelectionEntry>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subject. Each subject can be selected once.
    pub fn add(&mut self, subject: SubjectRef, raw_score: f64) -> Result<(), SelectionError> {
        if self.contains(&subject.id) {
            return Err(SelectionError::DuplicateSubject(subject.id));
        }
        validate_raw_score(&subject, raw_score)?;
        self.entries.push(SelectionEntry { subject, raw_score });
        Ok(())
    }

    /// Remove the entry at `index` (0-based) and return it
    pub fn remove(&mut self, index: usize) -> Result<SelectionEntry, SelectionError> {
        self.check_index(index)?;
        Ok(self.entries.remove(index))
    }

    /// Replace the raw score of the entry at `index` (0-based)
    pub fn update_score(&mut self, index: usize, raw_score: f64) -> Result<(), SelectionError> {
        self.check_index(index)?;
        let entry = &mut self.entries[index];
        validate_raw_score(&entry.subject, raw_score)?;
        entry.raw_score = raw_score;
        Ok(())
    }

    pub fn contains(&self, subject_id: &str) -> bool {
        self.entries.iter().any(|e| e.subject.id == subject_id)
    }

    pub fn entries(&self) -> &[SelectionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Enough subjects for a score
    pub fn is_ready(&self) -> bool {
        self.entries.len() >= MIN_SUBJECTS
    }

    fn check_index(&self, index: usize) -> Result<(), SelectionError> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(SelectionError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
        }
    }
}
