use crate::error::{AfsError, Result};
use crate::model::Item;
use crate::range::parse_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

/// Orders items by one field: `"price"`, `"price:asc"` or `"price:desc"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }
}

impl FromStr for SortSpec {
    type Err = AfsError;

    fn from_str(s: &str) -> Result<Self> {
        let (field, order) = match s.split_once(':') {
            Some((field, order)) => (field.trim(), order.trim()),
            None => (s.trim(), "asc"),
        };
        if field.is_empty() {
            return Err(AfsError::Config(format!("Invalid sort: {}", s)));
        }
        let order = match order.to_ascii_lowercase().as_str() {
            "asc" => SortOrder::Asc,
            "desc" => SortOrder::Desc,
            _ => return Err(AfsError::Config(format!("Invalid sort order: {}", order))),
        };
        Ok(SortSpec::new(field, order))
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.order)
    }
}

// Each value gets one kind on its own: numbers before dates before text.
enum SortKey {
    Number(f64),
    Date(NaiveDate),
    Text(String),
}

impl SortKey {
    fn of(value: &str) -> Self {
        if let Ok(n) = value.trim().parse::<f64>() {
            if n.is_finite() {
                return SortKey::Number(n);
            }
        }
        match parse_date(value) {
            Some(date) => SortKey::Date(date),
            None => SortKey::Text(value.to_lowercase()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Number(_) => 0,
            SortKey::Date(_) => 1,
            SortKey::Text(_) => 2,
        }
    }
}

fn compare_present(a: &str, b: &str) -> Ordering {
    match (SortKey::of(a), SortKey::of(b)) {
        (SortKey::Number(x), SortKey::Number(y)) => x.total_cmp(&y),
        (SortKey::Date(x), SortKey::Date(y)) => x.cmp(&y),
        (SortKey::Text(x), SortKey::Text(y)) => x.cmp(&y),
        (x, y) => x.rank().cmp(&y.rank()),
    }
}

/// Compares two items under `spec`. Items missing the field sort last in
/// either order.
pub fn compare(a: &Item, b: &Item, spec: &SortSpec) -> Ordering {
    match (a.field(&spec.field), b.field(&spec.field)) {
        (Some(x), Some(y)) => {
            let ord = compare_present(x, y);
            match spec.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort, so equal items keep their catalog order.
pub fn sort_items(items: &mut [&Item], spec: &SortSpec) {
    items.sort_by(|a, b| compare(a, b, spec));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, field: &str, value: Option<&str>) -> Item {
        let item = Item::new(id, "");
        match value {
            Some(v) => item.with_field(field, v),
            None => item,
        }
    }

    fn sorted_ids(items: &[Item], spec: &SortSpec) -> Vec<String> {
        let mut refs: Vec<&Item> = items.iter().collect();
        sort_items(&mut refs, spec);
        refs.iter().map(|i| i.id.to_string()).collect()
    }

    #[test]
    fn parses_specs() {
        assert_eq!(
            "price".parse::<SortSpec>().unwrap(),
            SortSpec::new("price", SortOrder::Asc)
        );
        assert_eq!(
            "price:DESC".parse::<SortSpec>().unwrap(),
            SortSpec::new("price", SortOrder::Desc)
        );
        assert!("price:sideways".parse::<SortSpec>().is_err());
        assert!(":asc".parse::<SortSpec>().is_err());
    }

    #[test]
    fn numbers_sort_numerically() {
        let items = vec![
            item("a", "price", Some("100")),
            item("b", "price", Some("9.5")),
            item("c", "price", Some("20")),
        ];
        assert_eq!(sorted_ids(&items, &"price".parse().unwrap()), vec!["b", "c", "a"]);
        assert_eq!(sorted_ids(&items, &"price:desc".parse().unwrap()), vec!["a", "c", "b"]);
    }

    #[test]
    fn mixed_kinds_order_consistently() {
        let ordered = ["9", "10", "2024-01-01", "1a", "nan"];
        for (i, a) in ordered.iter().enumerate() {
            for (j, b) in ordered.iter().enumerate() {
                assert_eq!(compare_present(a, b), i.cmp(&j), "{} vs {}", a, b);
            }
        }

        let items = vec![
            item("a", "code", Some("1a")),
            item("b", "code", Some("10")),
            item("c", "code", Some("9")),
        ];
        assert_eq!(sorted_ids(&items, &"code".parse().unwrap()), vec!["c", "b", "a"]);
    }

    #[test]
    fn dates_sort_chronologically() {
        let items = vec![
            item("a", "date", Some("2024-05-01")),
            item("b", "date", Some("2023-12-31")),
            item("c", "date", Some("2024-01-15T08:00:00Z")),
        ];
        assert_eq!(sorted_ids(&items, &"date".parse().unwrap()), vec!["b", "c", "a"]);
    }

    #[test]
    fn text_sorts_case_insensitively() {
        let items = vec![
            item("a", "title", Some("banana")),
            item("b", "title", Some("Apple")),
            item("c", "title", Some("cherry")),
        ];
        assert_eq!(sorted_ids(&items, &"title".parse().unwrap()), vec!["b", "a", "c"]);
    }

    #[test]
    fn missing_values_sort_last_in_both_orders() {
        let items = vec![
            item("a", "price", None),
            item("b", "price", Some("5")),
            item("c", "price", Some("1")),
        ];
        assert_eq!(sorted_ids(&items, &"price".parse().unwrap()), vec!["c", "b", "a"]);
        assert_eq!(sorted_ids(&items, &"price:desc".parse().unwrap()), vec!["b", "c", "a"]);
    }

    #[test]
    fn sort_is_stable() {
        let items = vec![
            item("a", "rank", Some("1")),
            item("b", "rank", Some("1")),
            item("c", "rank", Some("0")),
        ];
        assert_eq!(sorted_ids(&items, &"rank".parse().unwrap()), vec!["c", "a", "b"]);
    }
}
