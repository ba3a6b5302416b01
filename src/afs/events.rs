//! Semantic events emitted by a filtering session.
//!
//! Events carry plain data. How they travel (callbacks, a channel, a log) is
//! up to the [`EventSink`] the session was built with; any `FnMut(FilterEvent)`
//! closure is a sink.

use crate::model::FilterToken;
use crate::sort::SortOrder;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum FilterEvent {
    FilterToggled {
        token: FilterToken,
        active_filters: Vec<FilterToken>,
    },
    FiltersApplied {
        active_filters: Vec<FilterToken>,
        visible_count: usize,
    },
    FiltersCleared,
    FilterCategoryCleared {
        category: String,
        removed_filters: Vec<FilterToken>,
    },
    SearchApplied {
        term: String,
        match_count: usize,
    },
    SortApplied {
        field: String,
        order: SortOrder,
    },
    PageChanged {
        page: usize,
        total_pages: usize,
    },
}

impl FilterEvent {
    pub fn name(&self) -> &'static str {
        match self {
            FilterEvent::FilterToggled { .. } => "filterToggled",
            FilterEvent::FiltersApplied { .. } => "filtersApplied",
            FilterEvent::FiltersCleared => "filtersCleared",
            FilterEvent::FilterCategoryCleared { .. } => "filterCategoryCleared",
            FilterEvent::SearchApplied { .. } => "searchApplied",
            FilterEvent::SortApplied { .. } => "sortApplied",
            FilterEvent::PageChanged { .. } => "pageChanged",
        }
    }
}

pub trait EventSink {
    fn emit(&mut self, event: FilterEvent);
}

impl<F: FnMut(FilterEvent)> EventSink for F {
    fn emit(&mut self, event: FilterEvent) {
        self(event)
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: FilterEvent) {}
}

/// Records events in order, mostly for tests and diagnostics.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<FilterEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[FilterEvent] {
        &self.events
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events.iter().map(FilterEvent::name).collect()
    }

    pub fn last(&self) -> Option<&FilterEvent> {
        self.events.last()
    }

    /// Removes and returns everything recorded so far.
    pub fn take(&mut self) -> Vec<FilterEvent> {
        std::mem::take(&mut self.events)
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: FilterEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_camel_case_payload() {
        let event = FilterEvent::FilterCategoryCleared {
            category: "brand".into(),
            removed_filters: vec![FilterToken::parse("brand:apple").unwrap()],
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "event": "filterCategoryCleared",
                "category": "brand",
                "removedFilters": ["brand:apple"]
            })
        );
        assert_eq!(
            serde_json::to_value(FilterEvent::FiltersCleared).unwrap(),
            json!({"event": "filtersCleared"})
        );
    }

    #[test]
    fn log_records_in_order() {
        let mut log = EventLog::new();
        log.emit(FilterEvent::FiltersCleared);
        log.emit(FilterEvent::PageChanged {
            page: 2,
            total_pages: 3,
        });
        assert_eq!(log.names(), vec!["filtersCleared", "pageChanged"]);
        assert_eq!(log.take().len(), 2);
        assert!(log.events().is_empty());
    }

    #[test]
    fn closures_are_sinks() {
        let mut count = 0;
        {
            let mut sink = |_event: FilterEvent| count += 1;
            sink.emit(FilterEvent::FiltersCleared);
            sink.emit(FilterEvent::FiltersCleared);
        }
        assert_eq!(count, 2);
    }
}
