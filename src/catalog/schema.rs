use serde::{Deserialize, Serialize};

/// One subject in the reference table.
///
/// Example YAML:
/// ```yaml
/// - id: mathematics-methods
///   name: Mathematics Methods
///   category: Mathematics
///   scaling_factor: 1.12
///   has_bonus: true
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SubjectRef {
    /// Unique, stable identifier used on the command line and in history
    pub id: String,

    /// Display name. Also the key for the mathematics bonus rule (exact match).
    pub name: String,

    /// Grouping label. "Languages" is the key for the language bonus rule.
    pub category: String,

    /// Multiplier turning a raw score into a scaled score
    pub scaling_factor: f64,

    /// Show a bonus badge for this subject. Display only; the score uses the
    /// name/category rules.
    #[serde(default)]
    pub has_bonus: bool,
}

/// Subject reference table.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Catalog {
    /// Reference year the scaling factors were taken from
    #[serde(default)]
    pub year: Option<u16>,

    pub subjects: Vec<SubjectRef>,
}
