use crate::model::Item;

/// Case-insensitive substring search over named item fields.
///
/// A term shorter than `min_length` (or empty) leaves the search inactive,
/// in which case every item passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    term: String,
    keys: Vec<String>,
    min_length: usize,
}

impl SearchQuery {
    /// With no `keys`, every field of the item is searched.
    pub fn new(term: &str, keys: Vec<String>, min_length: usize) -> Self {
        Self {
            term: term.trim().to_lowercase(),
            keys,
            min_length,
        }
    }

    /// Same keys and minimum length, different term.
    pub fn with_term(&self, term: &str) -> Self {
        Self::new(term, self.keys.clone(), self.min_length)
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn is_active(&self) -> bool {
        !self.term.is_empty() && self.term.chars().count() >= self.min_length
    }

    pub fn matches(&self, item: &Item) -> bool {
        if !self.is_active() {
            return true;
        }

        if self.keys.is_empty() {
            return item
                .fields
                .values()
                .any(|value| value.to_lowercase().contains(&self.term));
        }

        self.keys
            .iter()
            .filter_map(|key| item.field(key))
            .any(|value| value.to_lowercase().contains(&self.term))
    }
}
