//! # Filter Engine
//!
//! Evaluates every item against the registry and reports what changed since
//! the previous evaluation. The engine only computes data; showing, hiding
//! and animating items belongs to the caller.
//!
//! The only state carried between calls is the previous visible set, so
//! applying twice with the same inputs gives the same `visible` set and an
//! empty diff the second time.

use crate::index::ItemIndex;
use crate::logic;
use crate::model::{Item, ItemId};
use crate::registry::FilterRegistry;
use std::collections::BTreeSet;

/// Result of one evaluation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Visibility {
    pub visible: BTreeSet<ItemId>,
    /// Visible now, hidden before.
    pub added: BTreeSet<ItemId>,
    /// Hidden now, visible before.
    pub removed: BTreeSet<ItemId>,
}

impl Visibility {
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Computes the visibility diff between two visible sets.
pub fn diff(previous: &BTreeSet<ItemId>, visible: BTreeSet<ItemId>) -> Visibility {
    let added = visible.difference(previous).cloned().collect();
    let removed = previous.difference(&visible).cloned().collect();
    Visibility {
        visible,
        added,
        removed,
    }
}

/// Evaluates category logic and `extra` for each item.
///
/// `extra` carries predicates that combine with the category verdict by AND
/// (search, ranges).
pub fn evaluate<P>(
    items: &[Item],
    index: &ItemIndex,
    registry: &FilterRegistry,
    extra: P,
) -> BTreeSet<ItemId>
where
    P: Fn(&Item) -> bool,
{
    let unfiltered = registry.is_unfiltered();
    items
        .iter()
        .filter(|item| unfiltered || logic::matches(&index.categories_of(item), registry))
        .filter(|item| extra(*item))
        .map(|item| item.id.clone())
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct FilterEngine {
    previous: BTreeSet<ItemId>,
}

impl FilterEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a known visible set, e.g. what the page rendered initially.
    pub fn with_visible(visible: BTreeSet<ItemId>) -> Self {
        Self { previous: visible }
    }

    pub fn visible(&self) -> &BTreeSet<ItemId> {
        &self.previous
    }

    pub fn apply(
        &mut self,
        items: &[Item],
        index: &ItemIndex,
        registry: &FilterRegistry,
    ) -> Visibility {
        self.apply_with(items, index, registry, |_| true)
    }

    pub fn apply_with<P>(
        &mut self,
        items: &[Item],
        index: &ItemIndex,
        registry: &FilterRegistry,
        extra: P,
    ) -> Visibility
    where
        P: Fn(&Item) -> bool,
    {
        let visible = evaluate(items, index, registry, extra);
        let result = diff(&self.previous, visible);
        self.previous = result.visible.clone();

        tracing::debug!(
            visible = result.visible.len(),
            added = result.added.len(),
            removed = result.removed.len(),
            "applied filters"
        );
        result
    }
}
