//! # Filter Registry
//!
//! The registry is the single source of truth for what is currently selected
//! and how selections combine. It holds:
//!
//! - the set of active [`FilterToken`]s, which is never empty: with nothing
//!   selected it holds exactly the wildcard `*`
//! - per-type logic ([`TypeLogicConfig`]) and the set of forced-exclusive types
//! - the global [`CategoryMode`]
//!
//! Selections and configuration have separate lifetimes: [`FilterRegistry::clear`]
//! resets selections only, configuration persists until [`FilterRegistry::reset`].
//!
//! Invalid input never panics. Rejected configuration is logged and leaves
//! the registry unchanged; the returned `Err` lets callers notice.

use crate::config::{AfsConfig, Diagnostic, ResolvedLogic, TypeLogicConfig, TypeLogicIssue};
use crate::error::{AfsError, Result};
use crate::model::{CategoryMode, ControlKind, FilterToken, LogicMode};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone)]
pub struct FilterRegistry {
    active: BTreeSet<FilterToken>,
    type_logic: BTreeMap<String, TypeLogicConfig>,
    category_mode: CategoryMode,
    exclusive_types: BTreeSet<String>,
    diagnostics: Vec<Diagnostic>,
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterRegistry {
    pub fn new() -> Self {
        Self {
            active: BTreeSet::from([FilterToken::wildcard()]),
            type_logic: BTreeMap::new(),
            category_mode: CategoryMode::default(),
            exclusive_types: BTreeSet::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn from_config(config: &AfsConfig) -> Self {
        Self::from_resolved(config.resolve())
    }

    pub fn from_resolved(logic: ResolvedLogic) -> Self {
        Self {
            active: BTreeSet::from([FilterToken::wildcard()]),
            type_logic: logic.type_logic,
            category_mode: logic.category_mode,
            exclusive_types: logic.exclusive_types,
            diagnostics: logic.diagnostics,
        }
    }

    /// A copy of the active token set.
    pub fn active(&self) -> BTreeSet<FilterToken> {
        self.active.clone()
    }

    pub fn active_tokens(&self) -> &BTreeSet<FilterToken> {
        &self.active
    }

    /// Active tokens other than the wildcard.
    pub fn selected(&self) -> impl Iterator<Item = &FilterToken> {
        self.active.iter().filter(|t| !t.is_wildcard())
    }

    pub fn is_active(&self, token: &FilterToken) -> bool {
        self.active.contains(token)
    }

    /// True when nothing restricts visibility.
    pub fn is_unfiltered(&self) -> bool {
        self.active.is_empty() || self.active.iter().any(FilterToken::is_wildcard)
    }

    /// Activates a token.
    ///
    /// The wildcard replaces every selection. Any other token replaces the
    /// wildcard and, when its type is exclusive for a plain button, the
    /// other active tokens of the same type.
    pub fn add(&mut self, token: FilterToken) {
        if token.is_wildcard() {
            self.clear();
            return;
        }

        self.active.retain(|t| !t.is_wildcard());
        if self.is_exclusive(token.type_name(), ControlKind::Button) {
            let type_name = token.type_name().to_string();
            self.active
                .retain(|t| t.type_name() != type_name || *t == token);
        }
        self.active.insert(token);
    }

    /// Deactivates a token. Returns whether it was active.
    pub fn remove(&mut self, token: &FilterToken) -> bool {
        let removed = self.active.remove(token);
        self.ensure_not_empty();
        removed
    }

    /// Resets selections to the wildcard. Type configuration is kept.
    pub fn clear(&mut self) {
        self.active.clear();
        self.active.insert(FilterToken::wildcard());
    }

    /// Removes every active token of `type_name`, returning what was removed.
    pub fn clear_type(&mut self, type_name: &str) -> BTreeSet<FilterToken> {
        let (removed, kept): (BTreeSet<_>, BTreeSet<_>) = std::mem::take(&mut self.active)
            .into_iter()
            .partition(|t| !t.is_wildcard() && t.type_name() == type_name);
        self.active = kept;
        self.ensure_not_empty();
        removed
    }

    /// Resets selections and all configuration to the initial state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    // Inserts a token whose exclusivity has already been resolved by a plan.
    pub(crate) fn insert_resolved(&mut self, token: FilterToken) {
        if token.is_wildcard() {
            self.clear();
            return;
        }
        self.active.retain(|t| !t.is_wildcard());
        self.active.insert(token);
    }

    pub(crate) fn remove_resolved(&mut self, token: &FilterToken) {
        self.active.remove(token);
    }

    pub(crate) fn ensure_not_empty(&mut self) {
        if self.active.is_empty() {
            tracing::debug!("active filter set emptied, reinstating wildcard");
            self.active.insert(FilterToken::wildcard());
        }
    }

    // Repeated rejections of the same input are recorded once.
    fn record(&mut self, diagnostic: Diagnostic) {
        if !self.diagnostics.contains(&diagnostic) {
            self.diagnostics.push(diagnostic);
        }
    }

    pub fn category_mode(&self) -> CategoryMode {
        self.category_mode
    }

    pub fn set_category_mode(&mut self, mode: CategoryMode) {
        self.category_mode = mode;
    }

    /// Sets the global mode from a string (`"mixed"`, `"OR"`, `"AND"`).
    pub fn set_filter_mode(&mut self, mode: &str) -> Result<()> {
        match mode.parse::<CategoryMode>() {
            Ok(parsed) => {
                self.category_mode = parsed;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(mode = %mode, "rejecting filter mode");
                self.record(Diagnostic::new(
                    "filterMode",
                    format!("invalid mode {:?}", mode),
                ));
                Err(e)
            }
        }
    }

    /// Resolved logic for a type; OR without multi-select when unconfigured.
    pub fn type_logic(&self, type_name: &str) -> TypeLogicConfig {
        self.type_logic.get(type_name).copied().unwrap_or_default()
    }

    pub fn type_mode(&self, type_name: &str) -> LogicMode {
        self.type_logic(type_name).mode()
    }

    pub fn configured_types(&self) -> &BTreeMap<String, TypeLogicConfig> {
        &self.type_logic
    }

    pub fn set_type_logic(&mut self, type_name: impl Into<String>, config: TypeLogicConfig) {
        self.type_logic.insert(type_name.into(), config);
    }

    /// Sets a type's logic from raw config input: a mode string or an object
    /// with `mode` and `multi`.
    ///
    /// An invalid mode is rejected and the previous setting kept. Any other
    /// unusable shape stores OR and records a diagnostic.
    pub fn set_type_logic_value(&mut self, type_name: &str, value: &Value) -> Result<()> {
        match TypeLogicConfig::from_value(value) {
            Ok(config) => {
                self.type_logic.insert(type_name.to_string(), config);
                Ok(())
            }
            Err(TypeLogicIssue::InvalidMode(mode)) => {
                tracing::warn!(filter_type = %type_name, mode = %mode, "rejecting type logic");
                self.record(Diagnostic::new(
                    type_name,
                    format!("invalid mode {:?}", mode),
                ));
                Err(AfsError::InvalidMode(mode))
            }
            Err(issue @ TypeLogicIssue::Malformed(_)) => {
                tracing::warn!(filter_type = %type_name, %issue, "defaulting type logic to OR");
                self.record(Diagnostic::new(
                    type_name,
                    format!("{}, defaulting to OR", issue),
                ));
                self.type_logic
                    .insert(type_name.to_string(), TypeLogicConfig::default());
                Ok(())
            }
        }
    }

    pub fn exclusive_types(&self) -> &BTreeSet<String> {
        &self.exclusive_types
    }

    pub fn set_exclusive(&mut self, type_name: impl Into<String>, exclusive: bool) {
        let type_name = type_name.into();
        if exclusive {
            self.exclusive_types.insert(type_name);
        } else {
            self.exclusive_types.remove(&type_name);
        }
    }

    /// Whether activating a token of `type_name` from a control of `kind`
    /// deactivates its same-type siblings.
    ///
    /// Order of precedence:
    /// 1. forced-exclusive types are always exclusive
    /// 2. multi-select types never are
    /// 3. radio and select controls always are
    /// 4. otherwise OR types are exclusive and AND types are not
    ///
    /// Checkboxes get no special case: without multi-select they are
    /// exclusive under OR like buttons.
    pub fn is_exclusive(&self, type_name: &str, kind: ControlKind) -> bool {
        if self.exclusive_types.contains(type_name) {
            return true;
        }

        let logic = self.type_logic(type_name);
        if logic.multi_select() {
            return false;
        }

        if matches!(kind, ControlKind::Radio | ControlKind::Select) {
            return true;
        }

        match logic.mode() {
            LogicMode::Or => true,
            LogicMode::And => false,
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
