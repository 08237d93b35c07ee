use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scoring::YearLevel;

/// Settings read from `~/.config/atar-calc/config.yaml`. Every field is optional.
///
/// Example YAML:
/// ```yaml
/// catalog: /home/alex/atar/subjects-2025.yaml
/// history: /home/alex/atar/history.json
/// log_level: info
/// year_level: Year 12
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Subject catalog file; the built-in catalog is used when unset
    #[serde(default)]
    pub catalog: Option<PathBuf>,

    /// Calculation history file (default: ~/.config/atar-calc/history.json)
    #[serde(default)]
    pub history: Option<PathBuf>,

    /// tracing filter directive, e.g. "info" or "atar_calc=debug"
    #[serde(default)]
    pub log_level: Option<String>,

    /// Year level used when none is given on the command line
    #[serde(default)]
    pub year_level: Option<YearLevel>,
}
