use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::types::{Selection, SelectionError};
use crate::catalog::Catalog;
use crate::scoring::YearLevel;

/// A student's subjects and scores, stored as YAML.
///
/// Example:
/// ```yaml
/// student_name: Alex Citizen
/// year_level: Year 12
/// subjects:
///   - { subject: english, score: 78 }
///   - { subject: mathematics-methods, score: 85 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SelectionSheet {
    #[serde(default)]
    pub student_name: Option<String>,

    #[serde(default)]
    pub year_level: Option<YearLevel>,

    #[serde(default)]
    pub subjects: Vec<SheetEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SheetEntry {
    /// Catalog subject id
    pub subject: String,
    pub score: f64,
}

impl SelectionSheet {
    /// Resolve subject ids against the catalog, in sheet order
    pub fn resolve(&self, catalog: &Catalog) -> Result<Selection, SelectionError> {
        let pairs: Vec<(String, f64)> = self
            .subjects
            .iter()
            .map(|e| (e.subject.clone(), e.score))
            .collect();
        build_selection(catalog, &pairs)
    }
}

/// Load a selection sheet from a YAML file
pub fn load_sheet(path: &Path) -> Result<SelectionSheet> {
    if !path.exists() {
        anyhow::bail!("Selection sheet not found at {}", path.display());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read selection sheet at {}", path.display()))?;

    serde_saphyr::from_str(&content)
        .with_context(|| format!("Failed to parse selection: invalid YAML in {}", path.display()))
}

/// Build a selection from (subject id, raw score) pairs
pub fn build_selection(
    catalog: &Catalog,
    pairs: &[(String, f64)],
) -> Result<Selection, SelectionError> {
    let mut selection = Selection::new();
    add_pairs(&mut selection, catalog, pairs)?;
    Ok(selection)
}

/// Append (subject id, raw score) pairs to an existing selection, in order
pub fn add_pairs(
    selection: &mut Selection,
    catalog: &Catalog,
    pairs: &[(String, f64)],
) -> Result<(), SelectionError> {
    for (id, score) in pairs {
        let subject = catalog
            .find(id)
            .ok_or_else(|| SelectionError::UnknownSubject(id.clone()))?;
        selection.add(subject.clone(), *score)?;
    }
    Ok(())
}

/// Parse a command-line pair of the form `ID=SCORE`
pub fn parse_subject_arg(s: &str) -> Result<(String, f64), String> {
    let (id, score) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ID=SCORE, got '{}'", s))?;

    let id = id.trim();
    if id.is_empty() {
        return Err(format!("missing subject id in '{}'", s));
    }

    let score: f64 = score
        .trim()
        .parse()
        .map_err(|_| format!("invalid score '{}' for '{}'", score.trim(), id))?;

    Ok((id.to_string(), score))
}
