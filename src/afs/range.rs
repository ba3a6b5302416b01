//! Range predicates over numeric and date fields.
//!
//! Ranges are written `field=min..max`. Either end may be left open
//! (`price=..50`, `released=2024-01-01..`). Both ends are inclusive.
//! Dates use ISO `YYYY-MM-DD`; item values may also be RFC 3339 timestamps.

use crate::error::{AfsError, Result};
use crate::model::Item;
use chrono::{DateTime, NaiveDate};
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq)]
pub enum RangeBounds {
    Number { min: Option<f64>, max: Option<f64> },
    Date {
        min: Option<NaiveDate>,
        max: Option<NaiveDate>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangeFilter {
    pub field: String,
    pub bounds: RangeBounds,
}

pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

impl RangeFilter {
    pub fn number(field: impl Into<String>, min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            field: field.into(),
            bounds: RangeBounds::Number { min, max },
        }
    }

    pub fn date(field: impl Into<String>, min: Option<NaiveDate>, max: Option<NaiveDate>) -> Self {
        Self {
            field: field.into(),
            bounds: RangeBounds::Date { min, max },
        }
    }

    /// Items without a parsable value for the field never match.
    pub fn matches(&self, item: &Item) -> bool {
        let Some(raw) = item.field(&self.field) else {
            return false;
        };

        match &self.bounds {
            RangeBounds::Number { min, max } => match raw.trim().parse::<f64>() {
                Ok(value) => {
                    min.map_or(true, |min| value >= min) && max.map_or(true, |max| value <= max)
                }
                Err(_) => false,
            },
            RangeBounds::Date { min, max } => match parse_date(raw) {
                Some(value) => {
                    min.map_or(true, |min| value >= min) && max.map_or(true, |max| value <= max)
                }
                None => false,
            },
        }
    }
}

impl FromStr for RangeFilter {
    type Err = AfsError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || AfsError::Config(format!("Invalid range: {}", s));

        let (field, bounds) = s.split_once('=').ok_or_else(invalid)?;
        let field = field.trim();
        let (min, max) = bounds.split_once("..").ok_or_else(invalid)?;
        let (min, max) = (min.trim(), max.trim());
        if field.is_empty() || (min.is_empty() && max.is_empty()) {
            return Err(invalid());
        }

        let as_number = |s: &str| -> std::result::Result<Option<f64>, ()> {
            if s.is_empty() {
                Ok(None)
            } else {
                s.parse::<f64>().map(Some).map_err(|_| ())
            }
        };
        if let (Ok(lo), Ok(hi)) = (as_number(min), as_number(max)) {
            if let (Some(lo), Some(hi)) = (lo, hi) {
                if lo > hi {
                    return Err(invalid());
                }
            }
            return Ok(RangeFilter::number(field, lo, hi));
        }

        let as_date = |s: &str| -> std::result::Result<Option<NaiveDate>, ()> {
            if s.is_empty() {
                Ok(None)
            } else {
                NaiveDate::parse_from_str(s, DATE_FORMAT).map(Some).map_err(|_| ())
            }
        };
        match (as_date(min), as_date(max)) {
            (Ok(lo), Ok(hi)) => {
                if let (Some(lo), Some(hi)) = (lo, hi) {
                    if lo > hi {
                        return Err(invalid());
                    }
                }
                Ok(RangeFilter::date(field, lo, hi))
            }
            _ => Err(invalid()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(price: &str) -> Item {
        Item::new("p", "").with_field("price", price)
    }

    #[test]
    fn numeric_bounds_are_inclusive() {
        let range = RangeFilter::number("price", Some(10.0), Some(20.0));
        assert!(range.matches(&priced("10")));
        assert!(range.matches(&priced("20.0")));
        assert!(!range.matches(&priced("20.01")));
        assert!(!range.matches(&priced("9")));
    }

    #[test]
    fn missing_or_unparsable_field_fails() {
        let range = RangeFilter::number("price", None, Some(5.0));
        assert!(!range.matches(&Item::new("p", "")));
        assert!(!range.matches(&priced("cheap")));
    }

    #[test]
    fn parses_numeric_ranges() {
        let range: RangeFilter = "price=10..99.5".parse().unwrap();
        assert_eq!(range, RangeFilter::number("price", Some(10.0), Some(99.5)));

        let range: RangeFilter = "price=..50".parse().unwrap();
        assert_eq!(range, RangeFilter::number("price", None, Some(50.0)));
    }

    #[test]
    fn parses_date_ranges() {
        let range: RangeFilter = "released=2024-01-01..".parse().unwrap();
        let item = Item::new("r", "").with_field("released", "2024-03-05T10:00:00Z");
        assert!(range.matches(&item));

        let old = Item::new("o", "").with_field("released", "2023-12-31");
        assert!(!range.matches(&old));
    }

    #[test]
    fn rejects_bad_ranges() {
        for bad in [
            "price",
            "price=",
            "price=..",
            "=1..2",
            "price=5..1",
            "d=2024-02-01..2024-01-01",
            "x=a..b",
        ] {
            assert!(bad.parse::<RangeFilter>().is_err(), "accepted {:?}", bad);
        }
    }
}
