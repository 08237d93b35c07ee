use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::{ScoreResult, YearLevel};
use crate::selection::Selection;

pub const HISTORY_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryState {
    pub version: u32,
    #[serde(default)]
    pub calculations: Vec<CalculationRecord>,
}

/// A saved calculation with the subjects that produced it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalculationRecord {
    pub id: u64,
    pub student_name: Option<String>,
    pub year_level: YearLevel,
    pub predicted_atar: f64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub subjects: Vec<CalculationSubject>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalculationSubject {
    pub subject_id: String,
    pub subject_name: String,
    pub raw_score: f64,
    pub scaled_score: f64,
}

impl Default for HistoryState {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryState {
    /// Create a new empty history with the current version
    pub fn new() -> Self {
        Self {
            version: HISTORY_VERSION,
            calculations: Vec::new(),
        }
    }

    /// Record a calculation and return its id.
    ///
    /// Returns None without recording when the selection is too small to score.
    pub fn record(
        &mut self,
        selection: &Selection,
        result: &ScoreResult,
        year_level: YearLevel,
        student_name: Option<&str>,
    ) -> Option<u64> {
        if !selection.is_ready() {
            return None;
        }

        let id = self.next_id();
        let subjects = selection
            .entries()
            .iter()
            .map(|e| CalculationSubject {
                subject_id: e.subject.id.clone(),
                subject_name: e.subject.name.clone(),
                raw_score: e.raw_score,
                scaled_score: e.scaled_score(),
            })
            .collect();

        self.calculations.push(CalculationRecord {
            id,
            student_name: student_name
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
            year_level,
            predicted_atar: result.score,
            created_at: Utc::now(),
            subjects,
        });

        Some(id)
    }

    pub fn find(&self, id: u64) -> Option<&CalculationRecord> {
        self.calculations.iter().find(|c| c.id == id)
    }

    /// Remove a calculation
    /// Returns true if it existed, false otherwise
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.calculations.len();
        self.calculations.retain(|c| c.id != id);
        self.calculations.len() != before
    }

    /// Most recent calculations first, at most `limit`
    pub fn latest(&self, limit: usize) -> Vec<&CalculationRecord> {
        let mut records: Vec<&CalculationRecord> = self.calculations.iter().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        records.truncate(limit);
        records
    }

    fn next_id(&self) -> u64 {
        self.calculations.iter().map(|c| c.id).max().unwrap_or(0) + 1
    }
}
