pub mod advice;
pub mod engine;
pub mod rules;

pub use advice::{recommendations_for, YearLevel};
pub use engine::{
    compute_aggregate, round2, scaled_score, BonusContribution, ScoreBreakdown, ScoreResult,
    ScoredEntry, ATAR_CEILING, MIN_SUBJECTS,
};
pub use rules::{earns_bonus, matching_rules, BonusRule};
