use serde::Serialize;

use super::rules::{BonusRule, BONUS_HEADROOM};
use crate::selection::SelectionEntry;

/// Entries needed before a score is produced
pub const MIN_SUBJECTS: usize = 4;

/// Number of highest scaled scores summed into the aggregate
pub const COUNTED_SUBJECTS: usize = 4;

/// Maximum aggregate before bonus headroom (4 subjects x 100)
pub const BASE_MAX_AGGREGATE: f64 = 400.0;

/// Dampening applied to the percentile before clamping
pub const DAMPENING: f64 = 0.9995;

/// Highest reportable score
pub const ATAR_CEILING: f64 = 99.95;

/// Round to 2 decimal places: scale by 100, round half away from zero, scale back.
///
/// Used for both scaled scores and the final score so ties resolve the same way.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Scaled score for a raw score under a subject's scaling factor.
///
/// Accepts any real input; range checks happen before entries reach the engine.
pub fn scaled_score(raw_score: f64, scaling_factor: f64) -> f64 {
    round2(raw_score * scaling_factor)
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredEntry<'a> {
    #[serde(flatten)]
    pub entry: &'a SelectionEntry,
    pub scaled_score: f64,
}

/// A bonus earned by one entry under one rule. An entry matching both rules
/// appears twice.
#[derive(Debug, Clone, Serialize)]
pub struct BonusContribution<'a> {
    #[serde(flatten)]
    pub entry: &'a SelectionEntry,
    pub rule: BonusRule,
    pub scaled_score: f64,
    pub bonus: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub base_aggregate: f64,
    pub bonus_total: f64,
    pub aggregate: f64,
    pub max_aggregate: f64,
    pub percentile: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreResult<'a> {
    pub score: f64,
    pub top_four: Vec<ScoredEntry<'a>>,
    pub bonuses: Vec<BonusContribution<'a>>,
    pub breakdown: ScoreBreakdown,
}

impl ScoreResult<'_> {
    /// Zero state returned for selections below [`MIN_SUBJECTS`]
    fn zero() -> Self {
        Self {
            score: 0.0,
            top_four: Vec::new(),
            bonuses: Vec::new(),
            breakdown: ScoreBreakdown::default(),
        }
    }
}

/// Compute the predicted ATAR for a selection.
///
/// Returns a zero score with empty breakdowns when fewer than four entries are
/// given. Inputs are never mutated and no state is kept between calls.
pub fn compute_aggregate(entries: &[SelectionEntry]) -> ScoreResult<'_> {
    if entries.len() < MIN_SUBJECTS {
        return ScoreResult::zero();
    }

    let scored: Vec<ScoredEntry> = entries
        .iter()
        .map(|entry| ScoredEntry {
            entry,
            scaled_score: entry.scaled_score(),
        })
        .collect();

    // sort_by is stable: equal scaled scores keep their input order
    let mut ranked = scored.clone();
    ranked.sort_by(|a, b| rank_key(b.scaled_score).total_cmp(&rank_key(a.scaled_score)));
    ranked.truncate(COUNTED_SUBJECTS);

    let base_aggregate: f64 = ranked.iter().map(|s| s.scaled_score).sum();
    let mut aggregate = base_aggregate;
    let mut bonus_total = 0.0;
    let mut max_aggregate = BASE_MAX_AGGREGATE;
    let mut bonuses = Vec::new();

    // Each rule runs over every entry, not just the counted four
    for rule in BonusRule::ALL {
        for s in scored.iter().filter(|s| rule.matches(&s.entry.subject)) {
            let bonus = rule.apply(s.scaled_score);
            aggregate += bonus;
            bonus_total += bonus;
            max_aggregate += BONUS_HEADROOM;
            bonuses.push(BonusContribution {
                entry: s.entry,
                rule,
                scaled_score: s.scaled_score,
                bonus,
            });
        }
    }

    let percentile = (aggregate / max_aggregate) * 100.0;

    // max/min rather than clamp so a NaN aggregate lands on 0
    let bounded = (percentile * DAMPENING).max(0.0).min(ATAR_CEILING);

    ScoreResult {
        score: round2(bounded),
        top_four: ranked,
        bonuses,
        breakdown: ScoreBreakdown {
            base_aggregate,
            bonus_total,
            aggregate,
            max_aggregate,
            percentile,
        },
    }
}

/// Adding 0.0 turns -0.0 into 0.0 so the two tie under total_cmp
fn rank_key(scaled: f64) -> f64 {
    scaled + 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SubjectRef;
    use proptest::prelude::*;

    fn entry(name: &str, category: &str, factor: f64, raw: f64) -> SelectionEntry {
        SelectionEntry {
            subject: SubjectRef {
                id: name.to_lowercase().replace(' ', "-"),
                name: name.to_string(),
                category: category.to_string(),
                scaling_factor: factor,
                has_bonus: false,
            },
            raw_score: raw,
        }
    }

    fn plain(name: &str, raw: f64) -> SelectionEntry {
        entry(name, "General", 1.0, raw)
    }

    fn four_plain() -> Vec<SelectionEntry> {
        vec![
            plain("English", 90.0),
            plain("Physics", 85.0),
            plain("Chemistry", 80.0),
            plain("Economics", 75.0),
        ]
    }

    #[test]
    fn test_scaled_score_rounds_to_two_places() {
        assert_eq!(scaled_score(83.333, 1.0), 83.33);
        assert_eq!(scaled_score(85.0, 1.12), 95.2);
    }

    #[test]
    fn test_scaled_score_tie_rounds_away_from_zero() {
        assert_eq!(scaled_score(83.335, 1.0), 83.34);
        assert_eq!(scaled_score(0.125, 1.0), 0.13);
        assert_eq!(scaled_score(-0.125, 1.0), -0.13);
    }

    #[test]
    fn test_scaled_score_keeps_binary_drift() {
        // 1.005 * 100 is 100.49999999999999 in binary
        assert_eq!(scaled_score(1.005, 1.0), 1.0);
    }

    #[test]
    fn test_scaled_score_accepts_out_of_range() {
        assert_eq!(scaled_score(150.0, 2.0), 300.0);
        assert_eq!(scaled_score(-10.0, 1.0), -10.0);
        assert_eq!(scaled_score(50.0, 0.0), 0.0);
    }

    #[test]
    fn test_fewer_than_four_is_zero() {
        let mut entries = four_plain();
        entries[3] = entry("Mathematics Methods", "Mathematics", 1.2, 99.0);

        let result = compute_aggregate(&entries[1..]);
        assert_eq!(result.score, 0.0);
        assert!(result.top_four.is_empty());
        assert!(result.bonuses.is_empty());
        assert_eq!(result.breakdown, ScoreBreakdown::default());
    }

    #[test]
    fn test_empty_selection_is_zero() {
        let result = compute_aggregate(&[]);
        assert_eq!(result.score, 0.0);
        assert!(result.top_four.is_empty());
    }

    #[test]
    fn test_four_entries_no_bonus() {
        let entries = four_plain();
        let result = compute_aggregate(&entries);

        assert_eq!(result.breakdown.base_aggregate, 330.0);
        assert_eq!(result.breakdown.max_aggregate, 400.0);
        assert_eq!(result.breakdown.percentile, 82.5);
        assert_eq!(result.score, 82.46);
        assert!(result.bonuses.is_empty());
    }

    #[test]
    fn test_top_four_ordered_descending() {
        let entries = vec![
            plain("A", 60.0),
            plain("B", 95.0),
            plain("C", 70.0),
            plain("D", 88.0),
            plain("E", 40.0),
        ];
        let result = compute_aggregate(&entries);
        let names: Vec<&str> = result
            .top_four
            .iter()
            .map(|s| s.entry.subject.name.as_str())
            .collect();
        assert_eq!(names, vec!["B", "D", "C", "A"]);
    }

    #[test]
    fn test_ranking_uses_scaled_not_raw() {
        let entries = vec![
            entry("Visual Arts", "The Arts", 0.9, 90.0),    // 81
            entry("Physics", "Sciences", 1.2, 70.0),        // 84
            plain("English", 82.0),
            plain("Economics", 83.0),
            plain("Geography", 50.0),
        ];
        let result = compute_aggregate(&entries);
        assert_eq!(result.top_four[0].entry.subject.name, "Physics");
        assert_eq!(result.top_four[0].scaled_score, 84.0);
        assert_eq!(result.top_four[3].entry.subject.name, "Visual Arts");
    }

    #[test]
    fn test_lower_fifth_entry_without_bonus_is_ignored() {
        let mut entries = four_plain();
        let before = compute_aggregate(&entries).score;

        entries.push(plain("Geography", 50.0));
        let after = compute_aggregate(&entries);

        assert_eq!(after.score, before);
        assert_eq!(after.breakdown.base_aggregate, 330.0);
    }

    #[test]
    fn test_lower_fifth_bonus_entry_changes_score() {
        let mut entries = four_plain();
        entries.push(entry("Mathematics Methods", "Mathematics", 1.0, 70.0));

        let result = compute_aggregate(&entries);
        assert_eq!(result.breakdown.base_aggregate, 330.0);
        assert_eq!(result.breakdown.aggregate, 337.0);
        assert_eq!(result.breakdown.max_aggregate, 410.0);
        assert_eq!(result.score, 82.15);

        // Not in the top four but still listed as a bonus
        assert!(result
            .top_four
            .iter()
            .all(|s| s.entry.subject.name != "Mathematics Methods"));
        assert_eq!(result.bonuses.len(), 1);
        assert_eq!(result.bonuses[0].rule, BonusRule::Mathematics);
        assert_eq!(result.bonuses[0].bonus, 7.0);
    }

    #[test]
    fn test_methods_bonus_inside_top_four() {
        let entries = vec![
            entry("Mathematics Methods", "Mathematics", 1.0, 95.0),
            plain("English", 90.0),
            plain("Physics", 85.0),
            plain("Chemistry", 80.0),
        ];
        let result = compute_aggregate(&entries);
        assert_eq!(result.breakdown.base_aggregate, 350.0);
        assert_eq!(result.breakdown.bonus_total, 9.5);
        assert_eq!(result.breakdown.max_aggregate, 410.0);
    }

    #[test]
    fn test_both_maths_subjects_counted() {
        let mut entries = four_plain();
        entries.push(entry("Mathematics Methods", "Mathematics", 1.0, 60.0));
        entries.push(entry("Mathematics Specialist", "Mathematics", 1.0, 50.0));

        let result = compute_aggregate(&entries);
        assert_eq!(result.breakdown.max_aggregate, 420.0);
        assert_eq!(result.bonuses.len(), 2);
        assert_eq!(result.breakdown.bonus_total, 11.0);
    }

    #[test]
    fn test_language_bonus_applies() {
        let mut entries = four_plain();
        entries.push(entry("French: Second Language", "Languages", 1.0, 60.0));

        let result = compute_aggregate(&entries);
        assert_eq!(result.breakdown.max_aggregate, 410.0);
        assert_eq!(result.bonuses.len(), 1);
        assert_eq!(result.bonuses[0].rule, BonusRule::Language);
        assert_eq!(result.bonuses[0].bonus, 6.0);
    }

    #[test]
    fn test_entry_matching_both_rules_gets_both() {
        let mut entries = four_plain();
        entries.push(entry("Mathematics Methods", "Languages", 1.0, 60.0));

        let result = compute_aggregate(&entries);
        assert_eq!(result.breakdown.aggregate, 342.0);
        assert_eq!(result.breakdown.max_aggregate, 420.0);
        assert_eq!(result.bonuses.len(), 2);
        assert_eq!(result.bonuses[0].rule, BonusRule::Mathematics);
        assert_eq!(result.bonuses[1].rule, BonusRule::Language);
        assert_eq!(result.score, 81.39);
    }

    #[test]
    fn test_has_bonus_flag_does_not_affect_score() {
        let mut entries = four_plain();
        let before = compute_aggregate(&entries).score;

        entries[0].subject.has_bonus = true;
        let after = compute_aggregate(&entries);
        assert_eq!(after.score, before);
        assert!(after.bonuses.is_empty());
    }

    #[test]
    fn test_score_capped_at_ceiling() {
        let entries: Vec<_> = (0..4)
            .map(|i| entry(&format!("S{}", i), "General", 1.5, 100.0))
            .collect();
        let result = compute_aggregate(&entries);
        assert_eq!(result.score, ATAR_CEILING);
    }

    #[test]
    fn test_score_floored_at_zero() {
        let entries: Vec<_> = (0..4)
            .map(|i| plain(&format!("S{}", i), -50.0))
            .collect();
        let result = compute_aggregate(&entries);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_nan_score_collapses_to_zero() {
        let mut entries = four_plain();
        entries[0].raw_score = f64::NAN;
        let result = compute_aggregate(&entries);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_infinite_score_hits_ceiling() {
        let mut entries = four_plain();
        entries[0].raw_score = f64::INFINITY;
        let result = compute_aggregate(&entries);
        assert_eq!(result.score, ATAR_CEILING);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let entries = vec![
            plain("First", 80.0),
            plain("Top", 99.0),
            plain("Second", 80.0),
            plain("Third", 80.0),
            plain("Fourth", 80.0),
        ];
        for _ in 0..3 {
            let result = compute_aggregate(&entries);
            let names: Vec<&str> = result
                .top_four
                .iter()
                .map(|s| s.entry.subject.name.as_str())
                .collect();
            assert_eq!(names, vec!["Top", "First", "Second", "Third"]);
        }
    }

    #[test]
    fn test_negative_zero_ties_with_zero() {
        let entries = vec![
            plain("Neg", -0.001), // rounds to -0.0
            plain("Zero", 0.0),
            plain("A", 90.0),
            plain("B", 90.0),
            plain("C", 90.0),
        ];
        let result = compute_aggregate(&entries);
        assert_eq!(result.top_four[3].entry.subject.name, "Neg");
    }

    #[test]
    fn test_inputs_not_mutated() {
        let entries = four_plain();
        let snapshot = entries.clone();
        let _ = compute_aggregate(&entries);
        assert_eq!(entries, snapshot);
    }

    #[test]
    fn test_result_serializes_to_json() {
        let mut entries = four_plain();
        entries.push(entry("Mathematics Methods", "Mathematics", 1.0, 70.0));
        let result = compute_aggregate(&entries);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["score"], 82.15);
        assert_eq!(json["top_four"][0]["subject"]["name"], "English");
        assert_eq!(json["top_four"][0]["scaled_score"], 90.0);
        assert_eq!(json["bonuses"][0]["rule"], "mathematics");
    }

    proptest! {
        #[test]
        fn prop_score_always_bounded(
            raws in prop::collection::vec(-1000.0f64..1000.0, 0..10),
            factor in 0.0f64..10.0,
        ) {
            let entries: Vec<_> = raws
                .iter()
                .enumerate()
                .map(|(i, raw)| {
                    let category = if i % 3 == 0 { "Languages" } else { "General" };
                    entry(&format!("S{}", i), category, factor, *raw)
                })
                .collect();
            let score = compute_aggregate(&entries).score;
            prop_assert!((0.0..=ATAR_CEILING).contains(&score));
        }

        #[test]
        fn prop_exactly_four_plain_matches_formula(
            raws in prop::collection::vec(0.0f64..100.0, 4),
        ) {
            let entries: Vec<_> = raws
                .iter()
                .enumerate()
                .map(|(i, raw)| plain(&format!("S{}", i), *raw))
                .collect();
            let mut sorted: Vec<f64> = raws.iter().map(|r| scaled_score(*r, 1.0)).collect();
            sorted.sort_by(|a, b| b.total_cmp(a));
            let sum: f64 = sorted.iter().sum();
            let expected = round2(((sum / 400.0) * 100.0 * DAMPENING).max(0.0).min(ATAR_CEILING));
            prop_assert_eq!(compute_aggregate(&entries).score, expected);
        }

        #[test]
        fn prop_fewer_than_four_is_zero(
            raws in prop::collection::vec(-1000.0f64..1000.0, 0..4),
        ) {
            let entries: Vec<_> = raws
                .iter()
                .map(|raw| entry("Mathematics Methods", "Languages", 1.0, *raw))
                .collect();
            let result = compute_aggregate(&entries);
            prop_assert_eq!(result.score, 0.0);
            prop_assert!(result.top_four.is_empty());
            prop_assert!(result.bonuses.is_empty());
        }
    }
}
