use serde::Serialize;

use crate::catalog::SubjectRef;

/// Subjects earning the mathematics bonus, matched by exact name.
pub const BONUS_SUBJECTS: [&str; 2] = ["Mathematics Methods", "Mathematics Specialist"];

/// Category label earning the language (LOTE) bonus, matched exactly.
pub const LANGUAGES_CATEGORY: &str = "Languages";

/// Fraction of an entry's scaled score added to the aggregate per matching rule
pub const BONUS_RATE: f64 = 0.1;

/// Amount each matching rule adds to the maximum aggregate
pub const BONUS_HEADROOM: f64 = 10.0;

/// Bonus rules applied to every selected entry, independent of top-4 rank.
///
/// Eligibility is derived from the subject's name and category only. The
/// catalog's `has_bonus` flag is a display hint and is never consulted here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusRule {
    /// Name is one of [`BONUS_SUBJECTS`]
    Mathematics,
    /// Category is [`LANGUAGES_CATEGORY`]
    Language,
}

impl BonusRule {
    /// Rules in the order their bonuses are accumulated
    pub const ALL: [BonusRule; 2] = [BonusRule::Mathematics, BonusRule::Language];

    pub fn matches(&self, subject: &SubjectRef) -> bool {
        match self {
            BonusRule::Mathematics => BONUS_SUBJECTS.contains(&subject.name.as_str()),
            BonusRule::Language => subject.category == LANGUAGES_CATEGORY,
        }
    }

    /// Bonus contributed by one matching entry with the given scaled score
    pub fn apply(&self, scaled_score: f64) -> f64 {
        scaled_score * BONUS_RATE
    }

    pub fn label(&self) -> &'static str {
        match self {
            BonusRule::Mathematics => "Mathematics",
            BonusRule::Language => "Language (LOTE)",
        }
    }
}

/// Rules the subject satisfies. A subject can satisfy both.
pub fn matching_rules(subject: &SubjectRef) -> Vec<BonusRule> {
    BonusRule::ALL
        .into_iter()
        .filter(|rule| rule.matches(subject))
        .collect()
}

/// Whether any bonus rule would apply to this subject
pub fn earns_bonus(subject: &SubjectRef) -> bool {
    BonusRule::ALL.iter().any(|rule| rule.matches(subject))
}
