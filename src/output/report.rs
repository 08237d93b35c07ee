use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::NaiveDate;
use std::io::Write;
use std::path::Path;

use super::formatter::{display_bonuses, format_atar, BONUS_NOTE};
use crate::scoring::{ScoreResult, YearLevel};
use crate::selection::SelectionEntry;

const REPORT_TITLE: &str = "WACE ATAR Calculator Report";
const RULE_WIDTH: usize = 78;

const IMPORTANT_NOTES: [&str; 6] = [
    "This is an estimate based on historical scaling data from 2024.",
    "Actual ATAR depends on the cohort strength each year.",
    "Subject scaling can vary year to year.",
    "Your school marks and WACE exam results both contribute 50% to your final score.",
    "Focus on maintaining strong raw scores across all subjects.",
    "Mathematics and LOTE subjects receive 10% bonus points added to your aggregate.",
];

const FOOTER: [&str; 2] = [
    "For official information, visit the School Curriculum and Standards Authority (SCSA)",
    "www.scsa.wa.edu.au",
];

/// Inputs for one report
pub struct ReportContext<'a> {
    pub entries: &'a [SelectionEntry],
    pub result: &'a ScoreResult<'a>,
    pub year_level: YearLevel,
    pub student_name: Option<&'a str>,
    pub generated: NaiveDate,
}

/// Long-form date as written in reports ("16 October 2026")
pub fn report_date(date: NaiveDate) -> String {
    date.format("%-d %B %Y").to_string()
}

/// File name for an exported report: `ATAR_Report_<Student>_<Date>.txt`,
/// whitespace replaced with underscores. The student part is omitted when
/// there is no name.
pub fn report_file_name(student_name: Option<&str>, generated: NaiveDate) -> String {
    let date = underscored(&report_date(generated));
    match student_name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => format!("ATAR_Report_{}_{}.txt", underscored(name), date),
        None => format!("ATAR_Report_{}.txt", date),
    }
}

fn underscored(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join("_")
}

fn centered(text: &str) -> String {
    let len = text.chars().count();
    if len >= RULE_WIDTH {
        text.to_string()
    } else {
        format!("{}{}", " ".repeat((RULE_WIDTH - len) / 2), text)
    }
}

/// Render the plain-text report
pub fn render_report(ctx: &ReportContext) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let thin_rule = "-".repeat(RULE_WIDTH);
    let mut lines = vec![
        centered(REPORT_TITLE),
        centered(&format!("Generated: {}", report_date(ctx.generated))),
        String::new(),
    ];

    if let Some(name) = ctx.student_name.map(str::trim).filter(|n| !n.is_empty()) {
        lines.push(format!("Student: {}", name));
    }
    lines.push(format!("Year Level: {}", ctx.year_level));
    lines.push(String::new());

    lines.push(rule.clone());
    lines.push(centered("Predicted ATAR Score"));
    lines.push(centered(&format_atar(ctx.result.score)));
    lines.push(rule.clone());
    lines.push(String::new());

    lines.push("Top 4 Contributing Subjects".to_string());
    lines.push(thin_rule.clone());
    lines.push(format!(
        "{:<32} {:<20} {:>9} {:>7} {:>6}",
        "Subject", "Category", "Raw Score", "Scaled", "Factor"
    ));
    lines.push(thin_rule.clone());
    for scored in &ctx.result.top_four {
        let subject = &scored.entry.subject;
        lines.push(format!(
            "{:<32} {:<20} {:>9.1} {:>7.2} {:>6}",
            subject.name,
            subject.category,
            scored.entry.raw_score,
            scored.scaled_score,
            format!("{:.2}x", subject.scaling_factor)
        ));
    }
    lines.push(String::new());

    let badges = display_bonuses(ctx.entries);
    if !badges.is_empty() {
        lines.push("Bonus Points Applied".to_string());
        lines.push(thin_rule.clone());
        for (entry, bonus) in badges {
            lines.push(format!(
                "{}: +{:.2} points (10% bonus)",
                entry.subject.name, bonus
            ));
        }
        lines.push(BONUS_NOTE.to_string());
        lines.push(String::new());
    }

    lines.push("Important Notes".to_string());
    lines.push(thin_rule);
    lines.extend(IMPORTANT_NOTES.iter().map(|note| format!("* {}", note)));
    lines.push(String::new());

    lines.extend(FOOTER.iter().map(|line| centered(line)));

    let mut report = lines.join("\n");
    report.push('\n');
    report
}

/// Write a rendered report atomically, creating the parent directory if needed
pub fn write_report(path: &Path, contents: &str) -> Result<()> {
    crate::config::ensure_parent_dir(path)?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(contents.as_bytes())
        .context("Failed to write report")?;
    file.commit()
        .with_context(|| format!("Failed to save report to {}", path.display()))?;

    tracing::info!(path = %path.display(), "wrote report");
    Ok(())
}
