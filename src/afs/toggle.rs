//! # Toggle Resolution
//!
//! Turns a user interaction into a [`MutationPlan`] without touching the
//! registry. The UI layer builds a [`ToggleRequest`] (token, control kind,
//! optional radio group name), [`handle_toggle`] works out which tokens to
//! activate and deactivate, and [`MutationPlan::apply`] commits the result.
//!
//! ## Rules
//!
//! - Exclusivity comes from [`FilterRegistry::is_exclusive`]. An exclusive
//!   toggle first deactivates every other active token of the same type.
//! - A non-exclusive toggle flips its token and nothing else.
//! - Radio controls also deactivate every other control bound to the same
//!   radio group, whatever their type. A radio never deactivates itself.
//! - Toggling the wildcard clears the selection.
//! - A plan that would leave nothing active is a reset: callers can show
//!   every item without evaluating any of them.

use crate::error::Result;
use crate::model::{ControlKind, FilterToken};
use crate::registry::FilterRegistry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A UI control bound to one filter token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlBinding {
    pub id: String,
    pub token: FilterToken,
    #[serde(default)]
    pub kind: ControlKind,
    /// Radio group name, for radio controls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl ControlBinding {
    pub fn new(id: impl Into<String>, token: FilterToken, kind: ControlKind) -> Self {
        Self {
            id: id.into(),
            token,
            kind,
            group: None,
        }
    }

    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn request(&self) -> ToggleRequest {
        ToggleRequest {
            token: self.token.clone(),
            kind: self.kind,
            group: self.group.clone(),
        }
    }
}

/// The registered controls of a session.
#[derive(Debug, Clone, Default)]
pub struct ControlSet {
    bindings: Vec<ControlBinding>,
}

impl ControlSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a control, replacing any earlier binding with the same id.
    pub fn register(&mut self, binding: ControlBinding) {
        self.bindings.retain(|b| b.id != binding.id);
        self.bindings.push(binding);
    }

    pub fn get(&self, id: &str) -> Option<&ControlBinding> {
        self.bindings.iter().find(|b| b.id == id)
    }

    /// Tokens of every control in radio group `group`.
    pub fn group_tokens<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a FilterToken> {
        self.bindings
            .iter()
            .filter(move |b| b.group.as_deref() == Some(group))
            .map(|b| &b.token)
    }

    pub fn bindings(&self) -> &[ControlBinding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl From<Vec<ControlBinding>> for ControlSet {
    fn from(bindings: Vec<ControlBinding>) -> Self {
        let mut set = ControlSet::new();
        for binding in bindings {
            set.register(binding);
        }
        set
    }
}

/// A user interaction on a control bound to `token`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleRequest {
    pub token: FilterToken,
    pub kind: ControlKind,
    pub group: Option<String>,
}

impl ToggleRequest {
    pub fn new(token: FilterToken, kind: ControlKind) -> Self {
        Self {
            token,
            kind,
            group: None,
        }
    }

    pub fn parse(token: &str, kind: ControlKind) -> Result<Self> {
        Ok(Self::new(FilterToken::parse(token)?, kind))
    }

    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}

/// The registry changes a toggle resolves to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationPlan {
    pub add: BTreeSet<FilterToken>,
    pub remove: BTreeSet<FilterToken>,
    /// Nothing is left active; the registry returns to the wildcard.
    pub reset: bool,
}

impl MutationPlan {
    pub fn is_noop(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty() && !self.reset
    }

    pub fn apply(&self, registry: &mut FilterRegistry) {
        if self.reset {
            registry.clear();
            return;
        }
        for token in &self.remove {
            registry.remove_resolved(token);
        }
        for token in &self.add {
            registry.insert_resolved(token.clone());
        }
        registry.ensure_not_empty();
    }
}

pub fn handle_toggle(
    request: &ToggleRequest,
    registry: &FilterRegistry,
    controls: &ControlSet,
) -> MutationPlan {
    let token = &request.token;
    let mut plan = MutationPlan::default();

    if token.is_wildcard() {
        plan.remove = registry.selected().cloned().collect();
        plan.reset = true;
        return plan;
    }

    if request.kind == ControlKind::Radio {
        if let Some(group) = request.group.as_deref() {
            for sibling in controls.group_tokens(group) {
                if sibling != token && !sibling.is_wildcard() && registry.is_active(sibling) {
                    plan.remove.insert(sibling.clone());
                }
            }
        }
    }

    let type_name = token.type_name();
    if registry.is_exclusive(type_name, request.kind) {
        for other in registry.selected() {
            if other != token && other.type_name() == type_name {
                plan.remove.insert(other.clone());
            }
        }
    }

    let is_active = registry.is_active(token);
    if !is_active {
        plan.add.insert(token.clone());
    } else if request.kind != ControlKind::Radio {
        plan.remove.insert(token.clone());
    }

    let remaining = registry
        .selected()
        .filter(|t| !plan.remove.contains(*t))
        .count()
        + plan.add.len();
    plan.reset = remaining == 0;

    tracing::debug!(
        token = %token,
        kind = %request.kind,
        add = plan.add.len(),
        remove = plan.remove.len(),
        reset = plan.reset,
        "resolved toggle"
    );
    plan
}
