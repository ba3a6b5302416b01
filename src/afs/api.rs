//! # API Facade
//!
//! [`AfsApi`] is the session object a UI binds to. It owns the registry, the
//! item index, the registered controls and the secondary predicates (search,
//! ranges, sort, pagination), and turns every user action into a fresh
//! [`FilterView`].
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the pure layers (`toggle`, `registry`, `engine`)
//! - **Normalizes inputs** (raw token strings, control ids, raw config values)
//! - **Emits events** to its [`EventSink`] in the documented payload shapes
//! - **Absorbs errors**: malformed tokens, unknown controls and rejected
//!   configuration are logged and turn the call into a no-op
//!
//! No method here returns an error. A call that changed nothing returns the
//! last view with an empty diff and emits nothing.
//!
//! ## Generic Over EventSink
//!
//! `AfsApi<S: EventSink>` is generic over event transport:
//! - Tests: `AfsApi<EventLog>` to assert on emitted events
//! - Callers without listeners: `AfsApi<NullSink>`
//! - Anything else: a closure `FnMut(FilterEvent)`

use crate::config::{AfsConfig, Diagnostic};
use crate::engine::FilterEngine;
use crate::events::{EventSink, FilterEvent};
use crate::index::ItemIndex;
use crate::model::{Catalog, CategoryMode, ControlKind, FilterToken, Item, ItemId, LogicMode};
use crate::paginate::{PageInfo, Pagination};
use crate::range::RangeFilter;
use crate::registry::FilterRegistry;
use crate::search::SearchQuery;
use crate::sort::{self, SortSpec};
use crate::toggle::{self, ControlBinding, ControlSet, ToggleRequest};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// What the UI should show after an action.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterView {
    pub active_filters: Vec<FilterToken>,
    /// Every visible item, in display order.
    pub visible: Vec<ItemId>,
    /// The visible items on the current page.
    pub page_items: Vec<ItemId>,
    pub added: Vec<ItemId>,
    pub removed: Vec<ItemId>,
    pub page: PageInfo,
}

impl FilterView {
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

pub struct AfsApi<S: EventSink> {
    config: AfsConfig,
    registry: FilterRegistry,
    items: Vec<Item>,
    index: ItemIndex,
    controls: ControlSet,
    engine: FilterEngine,
    search: SearchQuery,
    ranges: Vec<RangeFilter>,
    sort: Option<SortSpec>,
    pagination: Pagination,
    last_view: FilterView,
    sink: S,
}

fn default_sort(config: &AfsConfig) -> Option<SortSpec> {
    let raw = config.default_sort.as_deref()?;
    match raw.parse::<SortSpec>() {
        Ok(spec) => Some(spec),
        Err(e) => {
            tracing::warn!(sort = raw, error = %e, "ignoring invalid defaultSort");
            None
        }
    }
}

impl<S: EventSink> AfsApi<S> {
    pub fn new(config: AfsConfig, items: Vec<Item>, controls: ControlSet, sink: S) -> Self {
        let registry = FilterRegistry::from_config(&config);
        let index = ItemIndex::build(&items);
        let search = SearchQuery::new("", config.search_keys.clone(), config.search_min_length);
        let sort = default_sort(&config);
        let pagination = Pagination::new(config.items_per_page);

        Self {
            config,
            registry,
            items,
            index,
            controls,
            engine: FilterEngine::new(),
            search,
            ranges: Vec::new(),
            sort,
            pagination,
            last_view: FilterView::default(),
            sink,
        }
    }

    pub fn from_catalog(config: AfsConfig, catalog: Catalog, sink: S) -> Self {
        Self::new(config, catalog.items, ControlSet::from(catalog.controls), sink)
    }

    pub fn config(&self) -> &AfsConfig {
        &self.config
    }

    pub fn registry(&self) -> &FilterRegistry {
        &self.registry
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn controls(&self) -> &ControlSet {
        &self.controls
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// The last computed view.
    pub fn view(&self) -> &FilterView {
        &self.last_view
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.registry.diagnostics()
    }

    pub fn active_filters(&self) -> Vec<FilterToken> {
        self.registry.active().into_iter().collect()
    }

    pub fn active_filter_mode(&self) -> CategoryMode {
        self.registry.category_mode()
    }

    pub fn type_mode(&self, type_name: &str) -> LogicMode {
        self.registry.type_mode(type_name)
    }

    /// How many items carry each token of `type_name`.
    pub fn counts(&self, type_name: &str) -> BTreeMap<FilterToken, usize> {
        self.index.type_counts(type_name)
    }

    /// Re-evaluates every item and emits `filtersApplied`.
    pub fn apply(&mut self) -> FilterView {
        let search = &self.search;
        let ranges = &self.ranges;
        let result = self
            .engine
            .apply_with(&self.items, &self.index, &self.registry, |item| {
                search.matches(item) && ranges.iter().all(|r| r.matches(item))
            });

        let mut ordered: Vec<&Item> = self
            .items
            .iter()
            .filter(|item| result.visible.contains(&item.id))
            .collect();
        if let Some(spec) = &self.sort {
            sort::sort_items(&mut ordered, spec);
        }
        let visible: Vec<ItemId> = ordered.iter().map(|item| item.id.clone()).collect();

        self.pagination.clamp(visible.len());
        let view = FilterView {
            active_filters: self.active_filters(),
            page_items: self.pagination.page_of(&visible).to_vec(),
            page: self.pagination.info(visible.len()),
            visible,
            added: result.added.into_iter().collect(),
            removed: result.removed.into_iter().collect(),
        };

        self.sink.emit(FilterEvent::FiltersApplied {
            active_filters: view.active_filters.clone(),
            visible_count: view.visible_count(),
        });
        self.last_view = view.clone();
        view
    }

    fn unchanged_view(&self) -> FilterView {
        FilterView {
            added: Vec::new(),
            removed: Vec::new(),
            ..self.last_view.clone()
        }
    }

    pub fn toggle(&mut self, request: ToggleRequest) -> FilterView {
        let plan = toggle::handle_toggle(&request, &self.registry, &self.controls);
        if plan.is_noop() {
            return self.unchanged_view();
        }

        plan.apply(&mut self.registry);
        self.pagination.first();
        let active_filters = self.active_filters();
        self.sink.emit(FilterEvent::FilterToggled {
            token: request.token,
            active_filters,
        });
        self.apply()
    }

    /// Toggles the control registered under `id`.
    pub fn toggle_control(&mut self, id: &str) -> FilterView {
        match self.controls.get(id).map(ControlBinding::request) {
            Some(request) => self.toggle(request),
            None => {
                tracing::warn!(control = id, "unknown control, ignoring toggle");
                self.unchanged_view()
            }
        }
    }

    pub fn toggle_token(&mut self, token: &str, kind: ControlKind) -> FilterView {
        match ToggleRequest::parse(token, kind) {
            Ok(request) => self.toggle(request),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring toggle");
                self.unchanged_view()
            }
        }
    }

    pub fn add_filter(&mut self, token: &str) -> FilterView {
        match FilterToken::parse(token) {
            Ok(token) => {
                self.registry.add(token);
                self.pagination.first();
                self.apply()
            }
            Err(e) => {
                tracing::warn!(error = %e, "ignoring add");
                self.unchanged_view()
            }
        }
    }

    pub fn remove_filter(&mut self, token: &str) -> FilterView {
        let removed = match FilterToken::parse(token) {
            Ok(token) => self.registry.remove(&token),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring remove");
                false
            }
        };
        if !removed {
            return self.unchanged_view();
        }
        self.pagination.first();
        self.apply()
    }

    /// Resets the selection to the wildcard. Type logic is kept.
    pub fn clear_filters(&mut self) -> FilterView {
        self.registry.clear();
        self.pagination.first();
        self.sink.emit(FilterEvent::FiltersCleared);
        self.apply()
    }

    /// Deactivates every token of one type.
    pub fn clear_category(&mut self, type_name: &str) -> FilterView {
        let removed = self.registry.clear_type(type_name);
        if removed.is_empty() {
            return self.unchanged_view();
        }
        self.pagination.first();
        self.sink.emit(FilterEvent::FilterCategoryCleared {
            category: type_name.to_string(),
            removed_filters: removed.into_iter().collect(),
        });
        self.apply()
    }

    /// Sets a type's logic from a mode string or `{mode, multi}` object.
    pub fn set_type_logic(&mut self, type_name: &str, value: &Value) -> FilterView {
        match self.registry.set_type_logic_value(type_name, value) {
            Ok(()) => self.apply(),
            Err(_) => self.unchanged_view(),
        }
    }

    pub fn set_filter_mode(&mut self, mode: &str) -> FilterView {
        match self.registry.set_filter_mode(mode) {
            Ok(()) => self.apply(),
            Err(_) => self.unchanged_view(),
        }
    }

    /// Searches the configured keys. An empty term ends the search.
    pub fn search(&mut self, term: &str) -> FilterView {
        self.search = self.search.with_term(term);
        self.pagination.first();
        let view = self.apply();
        self.sink.emit(FilterEvent::SearchApplied {
            term: self.search.term().to_string(),
            match_count: view.visible_count(),
        });
        view
    }

    pub fn search_query(&self) -> &SearchQuery {
        &self.search
    }

    /// Adds a range, replacing any existing range on the same field.
    pub fn add_range(&mut self, range: RangeFilter) -> FilterView {
        self.ranges.retain(|r| r.field != range.field);
        self.ranges.push(range);
        self.pagination.first();
        self.apply()
    }

    pub fn remove_range(&mut self, field: &str) -> FilterView {
        let before = self.ranges.len();
        self.ranges.retain(|r| r.field != field);
        if self.ranges.len() == before {
            return self.unchanged_view();
        }
        self.pagination.first();
        self.apply()
    }

    pub fn clear_ranges(&mut self) -> FilterView {
        if self.ranges.is_empty() {
            return self.unchanged_view();
        }
        self.ranges.clear();
        self.pagination.first();
        self.apply()
    }

    pub fn ranges(&self) -> &[RangeFilter] {
        &self.ranges
    }

    pub fn sort_by(&mut self, spec: SortSpec) -> FilterView {
        self.sink.emit(FilterEvent::SortApplied {
            field: spec.field.clone(),
            order: spec.order,
        });
        self.sort = Some(spec);
        self.apply()
    }

    /// Back to catalog order.
    pub fn clear_sort(&mut self) -> FilterView {
        if self.sort.take().is_none() {
            return self.unchanged_view();
        }
        self.apply()
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    /// Moves to `page` (clamped) without re-evaluating any item.
    pub fn go_to_page(&mut self, page: usize) -> FilterView {
        let mut view = self.unchanged_view();
        let total = view.visible.len();
        self.pagination.go_to(page, total);
        view.page_items = self.pagination.page_of(&view.visible).to_vec();
        view.page = self.pagination.info(total);

        self.sink.emit(FilterEvent::PageChanged {
            page: view.page.page,
            total_pages: view.page.total_pages,
        });
        self.last_view = view.clone();
        view
    }

    pub fn next_page(&mut self) -> FilterView {
        self.go_to_page(self.pagination.current() + 1)
    }

    pub fn previous_page(&mut self) -> FilterView {
        self.go_to_page(self.pagination.current().saturating_sub(1))
    }

    /// Replaces the item collection and rebuilds the index.
    pub fn set_items(&mut self, items: Vec<Item>) -> FilterView {
        self.index = ItemIndex::build(&items);
        self.items = items;
        self.apply()
    }

    /// Inserts or replaces one item, re-indexing its categories.
    pub fn update_item(&mut self, item: Item) -> FilterView {
        self.index.reindex(&item);
        match self.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
        self.apply()
    }

    /// Back to the configured initial state: no selection, no search or
    /// ranges, default sort, first page.
    pub fn reset(&mut self) -> FilterView {
        self.registry = FilterRegistry::from_config(&self.config);
        self.search = self.search.with_term("");
        self.ranges.clear();
        self.sort = default_sort(&self.config);
        self.pagination = Pagination::new(self.config.items_per_page);
        self.sink.emit(FilterEvent::FiltersCleared);
        self.apply()
    }
}
