//! Configuration for a filtering session.
//!
//! The configuration is a JSON document with camelCase keys:
//!
//! ```json
//! {
//!   "filterCategoryMode": "mixed",
//!   "filterMode": "OR",
//!   "filterTypeLogic": {
//!     "category": "AND",
//!     "brand": { "mode": "OR", "multi": true }
//!   },
//!   "exclusiveFilterTypes": ["size"],
//!   "searchKeys": ["title", "description"],
//!   "itemsPerPage": 12,
//!   "defaultSort": "price:asc"
//! }
//! ```
//!
//! `filterTypeLogic` entries are kept as raw JSON and normalised once into
//! [`TypeLogicConfig`] by [`AfsConfig::resolve`]. Bad entries never fail the
//! load: they fall back to OR and leave a [`Diagnostic`] behind.

use crate::error::{AfsError, Result};
use crate::model::{CategoryMode, LogicMode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::Path;

const DEFAULT_SEARCH_KEY: &str = "title";

/// Per-type combination policy, normalised from either config shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TypeLogicConfig {
    /// Legacy shorthand: a bare mode string. Never multi-select.
    Simple(LogicMode),
    /// Structured form with an explicit multi-select flag.
    Extended { mode: LogicMode, multi_select: bool },
}

impl Default for TypeLogicConfig {
    fn default() -> Self {
        TypeLogicConfig::Simple(LogicMode::Or)
    }
}

impl TypeLogicConfig {
    pub fn mode(&self) -> LogicMode {
        match self {
            TypeLogicConfig::Simple(mode) => *mode,
            TypeLogicConfig::Extended { mode, .. } => *mode,
        }
    }

    pub fn multi_select(&self) -> bool {
        match self {
            TypeLogicConfig::Simple(_) => false,
            TypeLogicConfig::Extended { multi_select, .. } => *multi_select,
        }
    }

    /// Normalises a raw `filterTypeLogic` entry.
    ///
    /// Accepts `"OR"`/`"AND"` or `{ "mode": ..., "multi": bool }` (`multiSelect`
    /// is accepted as an alias for `multi`).
    pub fn from_value(value: &Value) -> std::result::Result<Self, TypeLogicIssue> {
        match value {
            Value::String(s) => s
                .parse::<LogicMode>()
                .map(TypeLogicConfig::Simple)
                .map_err(|_| TypeLogicIssue::InvalidMode(s.clone())),
            Value::Object(map) => {
                let Some(raw_mode) = map.get("mode") else {
                    return Err(TypeLogicIssue::Malformed(value.to_string()));
                };
                let Some(mode_str) = raw_mode.as_str() else {
                    return Err(TypeLogicIssue::Malformed(value.to_string()));
                };
                let mode = mode_str
                    .parse::<LogicMode>()
                    .map_err(|_| TypeLogicIssue::InvalidMode(mode_str.to_string()))?;
                let multi_select = map
                    .get("multi")
                    .or_else(|| map.get("multiSelect"))
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                Ok(TypeLogicConfig::Extended { mode, multi_select })
            }
            other => Err(TypeLogicIssue::Malformed(other.to_string())),
        }
    }
}

/// Why a raw type-logic entry could not be used as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeLogicIssue {
    /// Right shape, but the mode is not OR/AND. The entry is rejected.
    InvalidMode(String),
    /// Neither a string nor an object with `mode`. The type falls back to OR.
    Malformed(String),
}

impl fmt::Display for TypeLogicIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeLogicIssue::InvalidMode(mode) => write!(f, "invalid mode {:?}", mode),
            TypeLogicIssue::Malformed(raw) => write!(f, "malformed type logic {}", raw),
        }
    }
}

/// A recorded configuration problem that was recovered from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub subject: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.subject, self.message)
    }
}

/// The logic-related part of a config after normalisation.
#[derive(Debug, Clone, Default)]
pub struct ResolvedLogic {
    pub category_mode: CategoryMode,
    pub type_logic: BTreeMap<String, TypeLogicConfig>,
    pub exclusive_types: BTreeSet<String>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AfsConfig {
    /// `"mixed"`, `"OR"` or `"AND"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_category_mode: Option<String>,

    /// Legacy global mode, used when `filterCategoryMode` is not set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_mode: Option<String>,

    #[serde(default)]
    pub filter_type_logic: BTreeMap<String, Value>,

    /// Types forced to single selection regardless of their multi flag.
    #[serde(default)]
    pub exclusive_filter_types: Vec<String>,

    #[serde(default = "default_search_keys")]
    pub search_keys: Vec<String>,

    #[serde(default)]
    pub search_min_length: usize,

    /// Zero disables pagination.
    #[serde(default)]
    pub items_per_page: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sort: Option<String>,
}

fn default_search_keys() -> Vec<String> {
    vec![DEFAULT_SEARCH_KEY.to_string()]
}

impl Default for AfsConfig {
    fn default() -> Self {
        Self {
            filter_category_mode: None,
            filter_mode: None,
            filter_type_logic: BTreeMap::new(),
            exclusive_filter_types: Vec::new(),
            search_keys: default_search_keys(),
            search_min_length: 0,
            items_per_page: 0,
            default_sort: None,
        }
    }
}

impl AfsConfig {
    /// Load config from the given file, or return defaults if it does not exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(AfsError::Io)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(AfsError::Serialization)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(AfsError::Io)?;
            }
        }

        let content = serde_json::to_string_pretty(self).map_err(AfsError::Serialization)?;
        fs::write(path, content).map_err(AfsError::Io)?;
        Ok(())
    }

    /// Effective global mode: `filterCategoryMode`, then `filterMode`, then mixed.
    pub fn category_mode(&self, diagnostics: &mut Vec<Diagnostic>) -> CategoryMode {
        if let Some(raw) = &self.filter_category_mode {
            match raw.parse::<CategoryMode>() {
                Ok(mode) => return mode,
                Err(_) => {
                    tracing::warn!(mode = %raw, "invalid filterCategoryMode, ignoring");
                    diagnostics.push(Diagnostic::new(
                        "filterCategoryMode",
                        format!("invalid mode {:?}", raw),
                    ));
                }
            }
        }

        if let Some(raw) = &self.filter_mode {
            match raw.parse::<LogicMode>() {
                Ok(mode) => return mode.into(),
                Err(_) => {
                    tracing::warn!(mode = %raw, "invalid filterMode, ignoring");
                    diagnostics.push(Diagnostic::new(
                        "filterMode",
                        format!("invalid mode {:?}", raw),
                    ));
                }
            }
        }

        CategoryMode::Mixed
    }

    /// Normalises every logic setting, recording what had to be repaired.
    pub fn resolve(&self) -> ResolvedLogic {
        let mut diagnostics = Vec::new();
        let category_mode = self.category_mode(&mut diagnostics);

        let mut type_logic = BTreeMap::new();
        for (type_name, raw) in &self.filter_type_logic {
            match TypeLogicConfig::from_value(raw) {
                Ok(config) => {
                    type_logic.insert(type_name.clone(), config);
                }
                Err(issue @ TypeLogicIssue::InvalidMode(_)) => {
                    tracing::warn!(filter_type = %type_name, %issue, "rejecting type logic");
                    diagnostics.push(Diagnostic::new(type_name.clone(), issue.to_string()));
                }
                Err(issue @ TypeLogicIssue::Malformed(_)) => {
                    tracing::warn!(filter_type = %type_name, %issue, "defaulting type logic to OR");
                    diagnostics.push(Diagnostic::new(
                        type_name.clone(),
                        format!("{}, defaulting to OR", issue),
                    ));
                    type_logic.insert(type_name.clone(), TypeLogicConfig::default());
                }
            }
        }

        ResolvedLogic {
            category_mode,
            type_logic,
            exclusive_types: self.exclusive_filter_types.iter().cloned().collect(),
            diagnostics,
        }
    }
}
