use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::catalog::SubjectRef;
use crate::history::CalculationRecord;
use crate::scoring::{recommendations_for, ScoreResult, YearLevel, MIN_SUBJECTS};
use crate::selection::SelectionEntry;

/// Line shown under the bonus section, in reports too
pub const BONUS_NOTE: &str =
    "Mathematics and LOTE subjects receive 10% bonus points added to your aggregate";

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format an ATAR with two decimals ("82.46", "0.00")
pub fn format_atar(score: f64) -> String {
    format!("{:.2}", score)
}

/// Entries showing a bonus badge, with the bonus the badge advertises.
///
/// Driven by the catalog's `has_bonus` flag, not by the scoring rules, so it
/// can differ from `ScoreResult::bonuses`.
pub fn display_bonuses(entries: &[SelectionEntry]) -> Vec<(&SelectionEntry, f64)> {
    entries
        .iter()
        .filter(|e| e.subject.has_bonus)
        .map(|e| (e, e.scaled_score() * 0.1))
        .collect()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format the headline result with the top four and bonus badges.
/// Below four entries, explains what is missing instead.
pub fn format_result(
    entries: &[SelectionEntry],
    result: &ScoreResult,
    year_level: YearLevel,
    use_colors: bool,
) -> String {
    if entries.len() < MIN_SUBJECTS {
        return format!(
            "Add at least {} subjects to calculate your ATAR\nYou need a minimum of {} ATAR subjects for your calculation ({} selected)",
            MIN_SUBJECTS,
            MIN_SUBJECTS,
            entries.len()
        );
    }

    let mut lines = Vec::new();
    let atar = format_atar(result.score);
    if use_colors {
        lines.push(format!("Your Predicted ATAR: {}", atar.bold().blue()));
        lines.push(year_level.basis_note().dimmed().to_string());
    } else {
        lines.push(format!("Your Predicted ATAR: {}", atar));
        lines.push(year_level.basis_note().to_string());
    }

    lines.push(String::new());
    lines.push(heading("Top 4 Contributing Subjects", use_colors));
    let name_width = result
        .top_four
        .iter()
        .map(|s| s.entry.subject.name.chars().count())
        .max()
        .unwrap_or(0);
    for (idx, scored) in result.top_four.iter().enumerate() {
        let subject = &scored.entry.subject;
        let detail = format!(
            "Raw {:.1} -> Scaled {:.2}  ({:.2}x)",
            scored.entry.raw_score, scored.scaled_score, subject.scaling_factor
        );
        let name = format!("{:<width$}", subject.name, width = name_width);
        if use_colors {
            lines.push(format!(
                "{:>3}. {}  {}",
                idx + 1,
                name.bold(),
                detail.dimmed()
            ));
        } else {
            lines.push(format!("{:>3}. {}  {}", idx + 1, name, detail));
        }
    }

    let badges = display_bonuses(entries);
    if !badges.is_empty() {
        lines.push(String::new());
        lines.push(heading("Bonus Points Applied", use_colors));
        for (entry, bonus) in badges {
            let points = format!("+{:.2} points", bonus);
            if use_colors {
                lines.push(format!("  {}  {}", entry.subject.name, points.yellow()));
            } else {
                lines.push(format!("  {}  {}", entry.subject.name, points));
            }
        }
        lines.push(BONUS_NOTE.to_string());
    }

    lines.join("\n")
}

/// Format the arithmetic behind a score (for verbose mode)
pub fn format_breakdown(result: &ScoreResult, use_colors: bool) -> String {
    let b = &result.breakdown;
    let mut lines = vec![heading("Breakdown", use_colors)];
    lines.push(format!("  Top 4 aggregate: {:.2}", b.base_aggregate));
    for bonus in &result.bonuses {
        lines.push(format!(
            "  + {:.2}  {} bonus: {} (scaled {:.2})",
            bonus.bonus,
            bonus.rule.label(),
            bonus.entry.subject.name,
            bonus.scaled_score
        ));
    }
    lines.push(format!("  Aggregate: {:.2} / {:.0}", b.aggregate, b.max_aggregate));
    lines.push(format!("  Percentile: {:.4}", b.percentile));
    lines.push(format!("  ATAR: {}", format_atar(result.score)));
    lines.join("\n")
}

/// Format the top four as tab-separated values for scripting
/// Columns: rank, subject id, name, category, raw, scaled, factor (no headers, no colors)
pub fn format_tsv(result: &ScoreResult) -> String {
    result
        .top_four
        .iter()
        .enumerate()
        .map(|(idx, scored)| {
            let subject = &scored.entry.subject;
            format!(
                "{}\t{}\t{}\t{}\t{}\t{:.2}\t{}",
                idx + 1,
                subject.id,
                subject.name,
                subject.category,
                scored.entry.raw_score,
                scored.scaled_score,
                subject.scaling_factor
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format subjects as a table: id, name, category, factor, bonus badge
pub fn format_catalog_table(subjects: &[&SubjectRef], use_colors: bool) -> String {
    if subjects.is_empty() {
        return "No subjects found.".to_string();
    }

    let id_width = subjects.iter().map(|s| s.id.len()).max().unwrap_or(0);
    let category_width = subjects
        .iter()
        .map(|s| s.category.chars().count())
        .max()
        .unwrap_or(0);
    let factor_width = 6;
    let separator = "  ";

    // id, category, factor, badge and separators; the rest goes to the name
    let fixed_width = id_width + category_width + factor_width + 2 + separator.len() * 4;
    let name_width = match get_terminal_width() {
        Some(width) if width > fixed_width + 10 => Some(width - fixed_width),
        Some(_) => Some(20),
        None => None,
    };
    let longest_name = subjects
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(0);
    let column = name_width.map_or(longest_name, |w| w.min(longest_name));

    subjects
        .iter()
        .map(|subject| {
            let name = match name_width {
                Some(w) => truncate(&subject.name, w),
                None => subject.name.clone(),
            };
            let badge = if subject.has_bonus { "⭐" } else { "" };
            let id = format!("{:<width$}", subject.id, width = id_width);
            let name = format!("{:<width$}", name, width = column);
            let category = format!("{:<width$}", subject.category, width = category_width);
            let factor = format!("{:>width$.2}x", subject.scaling_factor, width = factor_width - 1);

            if use_colors {
                format!(
                    "{}{}{}{}{}{}{}{}{}",
                    id.cyan(),
                    separator,
                    name.bold(),
                    separator,
                    category.dimmed(),
                    separator,
                    factor,
                    separator,
                    badge
                )
            } else {
                format!(
                    "{}{}{}{}{}{}{}{}{}",
                    id, separator, name, separator, category, separator, factor, separator, badge
                )
                .trim_end()
                .to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format saved calculations, one line each: id, date, ATAR, year level, student
pub fn format_history_table(records: &[&CalculationRecord], use_colors: bool) -> String {
    if records.is_empty() {
        return "No saved calculations.".to_string();
    }

    records
        .iter()
        .map(|record| {
            let id = format!("{:>3}.", record.id);
            let date = record.created_at.format("%Y-%m-%d %H:%M").to_string();
            let atar = format!("{:>6}", format_atar(record.predicted_atar));
            let student = record.student_name.as_deref().unwrap_or("-");
            if use_colors {
                format!(
                    "{} {}  {}  {}  {}",
                    id.dimmed(),
                    date,
                    atar.bold(),
                    record.year_level,
                    student
                )
            } else {
                format!(
                    "{} {}  {}  {}  {}",
                    id, date, atar, record.year_level, student
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format one saved calculation with its subjects
pub fn format_record_detail(record: &CalculationRecord, use_colors: bool) -> String {
    let atar = format_atar(record.predicted_atar);
    let mut lines = vec![
        if use_colors {
            format!("Calculation #{}: ATAR {}", record.id, atar.bold())
        } else {
            format!("Calculation #{}: ATAR {}", record.id, atar)
        },
        format!(
            "  Student: {}",
            record.student_name.as_deref().unwrap_or("(not given)")
        ),
        format!("  Year Level: {}", record.year_level),
        format!(
            "  Saved: {}",
            record.created_at.format("%Y-%m-%d %H:%M UTC")
        ),
        "  Subjects:".to_string(),
    ];
    for subject in &record.subjects {
        lines.push(format!(
            "    {} ({}): raw {:.1}, scaled {:.2}",
            subject.subject_name, subject.subject_id, subject.raw_score, subject.scaled_score
        ));
    }
    lines.join("\n")
}

/// Format the advice list for a year level
pub fn format_recommendations(year_level: YearLevel, use_colors: bool) -> String {
    let mut lines = vec![heading(
        &format!("Recommendations for {}", year_level),
        use_colors,
    )];
    lines.extend(
        recommendations_for(year_level)
            .iter()
            .map(|advice| format!("  - {}", advice)),
    );
    lines.join("\n")
}

fn heading(text: &str, use_colors: bool) -> String {
    if use_colors {
        text.bold().underline().to_string()
    } else {
        text.to_string()
    }
}
