use crate::model::{FilterToken, Item, ItemId};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Parses a whitespace-separated category attribute into tokens.
///
/// Malformed entries can never match an active token, so they are skipped.
pub fn parse_categories(attr: &str) -> BTreeSet<FilterToken> {
    attr.split_whitespace()
        .filter_map(|raw| match FilterToken::parse(raw) {
            Ok(token) if !token.is_wildcard() => Some(token),
            Ok(_) => None,
            Err(_) => {
                tracing::trace!(category = raw, "skipping malformed category");
                None
            }
        })
        .collect()
}

/// Cached category sets, one per item.
///
/// The cache is not kept in sync with item mutations: callers re-index an
/// item after changing its `categories`.
#[derive(Debug, Clone, Default)]
pub struct ItemIndex {
    categories: HashMap<ItemId, BTreeSet<FilterToken>>,
}

impl ItemIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(items: &[Item]) -> Self {
        let mut index = Self::new();
        for item in items {
            index.reindex(item);
        }
        index
    }

    pub fn reindex(&mut self, item: &Item) {
        self.categories
            .insert(item.id.clone(), parse_categories(&item.categories));
    }

    pub fn remove(&mut self, id: &ItemId) -> bool {
        self.categories.remove(id).is_some()
    }

    pub fn get(&self, id: &ItemId) -> Option<&BTreeSet<FilterToken>> {
        self.categories.get(id)
    }

    /// Categories for `item`, parsed on the spot if it was never indexed.
    pub fn categories_of<'a>(&'a self, item: &Item) -> Cow<'a, BTreeSet<FilterToken>> {
        match self.categories.get(&item.id) {
            Some(set) => Cow::Borrowed(set),
            None => {
                tracing::debug!(item = %item.id, "item not indexed, parsing categories");
                Cow::Owned(parse_categories(&item.categories))
            }
        }
    }

    /// How many indexed items carry each token of `type_name`.
    pub fn type_counts(&self, type_name: &str) -> BTreeMap<FilterToken, usize> {
        let mut counts = BTreeMap::new();
        for token in self.categories.values().flatten() {
            if token.type_name() == type_name {
                *counts.entry(token.clone()).or_insert(0) += 1;
            }
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whitespace_separated_categories() {
        let set = parse_categories("  category:tech\tbrand:apple \n featured ");
        let strs: Vec<&str> = set.iter().map(FilterToken::as_str).collect();
        assert_eq!(strs, vec!["brand:apple", "category:tech", "featured"]);
    }

    #[test]
    fn skips_malformed_and_wildcard_categories() {
        let set = parse_categories("a:b:c * ok:1");
        assert_eq!(set.len(), 1);
        assert!(set.contains(&FilterToken::parse("ok:1").unwrap()));
    }

    #[test]
    fn reindex_picks_up_changed_attribute() {
        let mut item = Item::new("1", "brand:apple");
        let mut index = ItemIndex::build(std::slice::from_ref(&item));
        let apple = FilterToken::parse("brand:apple").unwrap();
        assert!(index.get(&item.id).unwrap().contains(&apple));

        item.categories = "brand:samsung".into();
        // Stale until re-indexed.
        assert!(index.get(&item.id).unwrap().contains(&apple));
        index.reindex(&item);
        assert!(!index.get(&item.id).unwrap().contains(&apple));
    }

    #[test]
    fn unindexed_item_is_parsed_on_demand() {
        let index = ItemIndex::new();
        let item = Item::new("x", "color:red");
        assert_eq!(index.categories_of(&item).len(), 1);
        assert!(index.is_empty());
    }

    #[test]
    fn counts_tokens_per_type() {
        let items = vec![
            Item::new("1", "brand:apple color:red"),
            Item::new("2", "brand:apple"),
            Item::new("3", "brand:samsung"),
        ];
        let index = ItemIndex::build(&items);
        let counts = index.type_counts("brand");
        assert_eq!(counts[&FilterToken::parse("brand:apple").unwrap()], 2);
        assert_eq!(counts[&FilterToken::parse("brand:samsung").unwrap()], 1);
        assert_eq!(counts.len(), 2);
    }
}
