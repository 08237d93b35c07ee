mod schema;
mod validation;

pub use schema::{Catalog, SubjectRef};
pub use validation::validate_catalog;

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::scoring::earns_bonus;

const BUILTIN_CATALOG: &str = include_str!("default_catalog.yaml");

impl Catalog {
    /// Reference table shipped with the binary
    pub fn builtin() -> Result<Self> {
        serde_saphyr::from_str(BUILTIN_CATALOG).context("Failed to parse built-in subject catalog")
    }

    /// Look up a subject by id
    pub fn find(&self, id: &str) -> Option<&SubjectRef> {
        self.subjects.iter().find(|s| s.id == id)
    }

    /// Subjects ordered by category, then name
    pub fn sorted(&self) -> Vec<&SubjectRef> {
        let mut subjects: Vec<&SubjectRef> = self.subjects.iter().collect();
        subjects.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.name.cmp(&b.name)));
        subjects
    }

    /// Distinct category labels, sorted
    pub fn categories(&self) -> Vec<&str> {
        self.subjects
            .iter()
            .map(|s| s.category.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Subjects in one category (exact match), ordered by name
    pub fn by_category(&self, category: &str) -> Vec<&SubjectRef> {
        self.sorted()
            .into_iter()
            .filter(|s| s.category == category)
            .collect()
    }

    /// Subjects whose `has_bonus` display flag disagrees with the bonus rules
    /// actually used for scoring.
    pub fn bonus_flag_mismatches(&self) -> Vec<&SubjectRef> {
        self.subjects
            .iter()
            .filter(|s| s.has_bonus != earns_bonus(s))
            .collect()
    }
}

/// Load a subject catalog from a YAML file
///
/// # Errors
///
/// Returns an error if the file does not exist, cannot be read, or is not a
/// valid catalog document.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    if !path.exists() {
        anyhow::bail!("Subject catalog not found at {}", path.display());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read subject catalog at {}", path.display()))?;

    let catalog: Catalog = serde_saphyr::from_str(&content)
        .with_context(|| format!("Failed to parse catalog: invalid YAML in {}", path.display()))?;

    tracing::debug!(
        subjects = catalog.subjects.len(),
        path = %path.display(),
        "loaded subject catalog"
    );

    Ok(catalog)
}

/// Load the catalog at `path`, or the built-in one when no path is given.
/// Display-flag mismatches are logged, not corrected.
pub fn resolve_catalog(path: Option<&Path>) -> Result<Catalog> {
    let catalog = match path {
        Some(p) => load_catalog(p)?,
        None => Catalog::builtin()?,
    };

    for subject in catalog.bonus_flag_mismatches() {
        tracing::warn!(
            id = %subject.id,
            has_bonus = subject.has_bonus,
            "bonus badge does not match the scoring rules for '{}'",
            subject.name
        );
    }

    Ok(catalog)
}
