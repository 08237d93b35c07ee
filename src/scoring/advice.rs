use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Cohort the student belongs to. Year 10 is the early stage (choosing
/// subjects); Years 11 and 12 are the terminal ATAR years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum YearLevel {
    #[serde(rename = "Year 10", alias = "10")]
    Year10,
    #[default]
    #[serde(rename = "Year 11", alias = "11")]
    Year11,
    #[serde(rename = "Year 12", alias = "12")]
    Year12,
}

const EARLY_STAGE_ADVICE: [&str; 4] = [
    "Consider Mathematics Methods or Specialist for strong scaling",
    "Choose at least one science (Physics/Chemistry scale best)",
    "English ATAR or Literature is required",
    "Select subjects you enjoy and can perform well in",
];

const TERMINAL_STAGE_ADVICE: [&str; 4] = [
    "You need at least 4 ATAR subjects",
    "Top 4 subjects count toward your ATAR",
    "Mathematics and LOTE subjects receive 10% bonus points",
    "Focus on maintaining strong raw scores",
];

impl YearLevel {
    pub const ALL: [YearLevel; 3] = [YearLevel::Year10, YearLevel::Year11, YearLevel::Year12];

    pub fn is_early_stage(&self) -> bool {
        matches!(self, YearLevel::Year10)
    }

    /// One-line note on what the predicted score is based on
    pub fn basis_note(&self) -> &'static str {
        if self.is_early_stage() {
            "Based on predicted Year 12 performance"
        } else {
            "Based on your current/predicted scores"
        }
    }
}

impl fmt::Display for YearLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearLevel::Year10 => write!(f, "Year 10"),
            YearLevel::Year11 => write!(f, "Year 11"),
            YearLevel::Year12 => write!(f, "Year 12"),
        }
    }
}

impl FromStr for YearLevel {
    type Err = String;

    /// Accepts "Year 10", "year10", "y10" or a bare "10"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let digits = normalized
            .strip_prefix("year")
            .or_else(|| normalized.strip_prefix('y'))
            .unwrap_or(&normalized);

        match digits {
            "10" => Ok(YearLevel::Year10),
            "11" => Ok(YearLevel::Year11),
            "12" => Ok(YearLevel::Year12),
            _ => Err(format!(
                "unknown year level '{}' (expected Year 10, Year 11 or Year 12)",
                s
            )),
        }
    }
}

/// Static advice for a year level
pub fn recommendations_for(year_level: YearLevel) -> &'static [&'static str] {
    if year_level.is_early_stage() {
        &EARLY_STAGE_ADVICE
    } else {
        &TERMINAL_STAGE_ADVICE
    }
}
