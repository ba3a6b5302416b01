//! Category logic resolution.
//!
//! Decides whether one item's category set satisfies the active selection
//! under the registry's [`CategoryMode`]:
//!
//! | Mode    | Item is visible when                                        |
//! |---------|-------------------------------------------------------------|
//! | `OR`    | it carries at least one active token                        |
//! | `AND`   | it carries every active token                               |
//! | `mixed` | every type group is satisfied under that type's own mode    |
//!
//! An active wildcard short-circuits everything to visible.

use crate::model::{CategoryMode, FilterToken, LogicMode};
use crate::registry::FilterRegistry;
use std::collections::{BTreeMap, BTreeSet};

pub fn matches(categories: &BTreeSet<FilterToken>, registry: &FilterRegistry) -> bool {
    if registry.is_unfiltered() {
        return true;
    }

    match registry.category_mode() {
        CategoryMode::Or => registry.selected().any(|t| categories.contains(t)),
        CategoryMode::And => registry.selected().all(|t| categories.contains(t)),
        CategoryMode::Mixed => group_by_type(registry.selected())
            .iter()
            .all(|(group, tokens)| group_matches(categories, tokens, registry.type_mode(group))),
    }
}

/// Partitions tokens by [`FilterToken::group_key`], skipping the wildcard.
pub fn group_by_type<'a, I>(tokens: I) -> BTreeMap<&'a str, Vec<&'a FilterToken>>
where
    I: IntoIterator<Item = &'a FilterToken>,
{
    let mut groups: BTreeMap<&str, Vec<&FilterToken>> = BTreeMap::new();
    for token in tokens.into_iter().filter(|t| !t.is_wildcard()) {
        groups.entry(token.group_key()).or_default().push(token);
    }
    groups
}

fn group_matches(
    categories: &BTreeSet<FilterToken>,
    tokens: &[&FilterToken],
    mode: LogicMode,
) -> bool {
    match mode {
        LogicMode::And => tokens.iter().all(|t| categories.contains(*t)),
        LogicMode::Or => tokens.iter().any(|t| categories.contains(*t)),
    }
}
