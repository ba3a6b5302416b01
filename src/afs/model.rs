use crate::error::{AfsError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The token meaning "no filter": every item is shown while it is active.
pub const WILDCARD: &str = "*";

/// Group key used by the resolver for tokens that carry no `type:` prefix.
pub const DEFAULT_GROUP: &str = "_default";

/// A selectable filter criterion: `type:value`, a bare `value`, or the wildcard `*`.
///
/// Tokens are plain values. They are validated once at construction so the
/// rest of the crate can rely on "at most one colon" and "the wildcard never
/// carries a colon".
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FilterToken(String);

impl FilterToken {
    pub fn wildcard() -> Self {
        FilterToken(WILDCARD.to_string())
    }

    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s.chars().any(char::is_whitespace) {
            return Err(AfsError::InvalidToken(s.to_string()));
        }
        if s == WILDCARD {
            return Ok(Self::wildcard());
        }

        match s.matches(':').count() {
            0 => {}
            1 => {
                let (type_name, value) = s.split_once(':').unwrap_or((s, ""));
                if type_name.is_empty()
                    || value.is_empty()
                    || type_name == WILDCARD
                    || value == WILDCARD
                {
                    return Err(AfsError::InvalidToken(s.to_string()));
                }
            }
            _ => return Err(AfsError::InvalidToken(s.to_string())),
        }

        Ok(FilterToken(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.0 == WILDCARD
    }

    /// Text before the first colon; the whole token when there is none.
    ///
    /// This is the "type" used by toggle exclusivity and by `add`.
    pub fn type_name(&self) -> &str {
        self.0.split(':').next().unwrap_or(&self.0)
    }

    /// Text after the colon, if the token has one.
    pub fn value(&self) -> Option<&str> {
        self.0.split_once(':').map(|(_, v)| v)
    }

    /// Group the resolver evaluates this token in. Colon-less tokens share
    /// the synthetic [`DEFAULT_GROUP`].
    pub fn group_key(&self) -> &str {
        match self.0.split_once(':') {
            Some((type_name, _)) => type_name,
            None => DEFAULT_GROUP,
        }
    }
}

impl fmt::Display for FilterToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for FilterToken {
    type Err = AfsError;

    fn from_str(s: &str) -> Result<Self> {
        FilterToken::parse(s)
    }
}

impl TryFrom<String> for FilterToken {
    type Error = AfsError;

    fn try_from(s: String) -> Result<Self> {
        FilterToken::parse(&s)
    }
}

impl From<FilterToken> for String {
    fn from(token: FilterToken) -> Self {
        token.0
    }
}

/// Opaque reference to an item in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        ItemId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId(s.to_string())
    }
}

/// A filterable item: its whitespace-separated category attribute plus
/// named scalar fields used by search, ranges and sorting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(default)]
    pub categories: String,
    #[serde(default, deserialize_with = "deserialize_fields")]
    pub fields: BTreeMap<String, String>,
}

impl Item {
    pub fn new(id: impl Into<String>, categories: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(id),
            categories: categories.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

// Catalog files carry numbers and booleans as JSON scalars; keep their text form.
fn deserialize_fields<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(k, v)| match v {
            serde_json::Value::String(s) => Some((k, s)),
            serde_json::Value::Number(n) => Some((k, n.to_string())),
            serde_json::Value::Bool(b) => Some((k, b.to_string())),
            _ => None,
        })
        .collect())
}

/// A catalog file: the items to filter and the controls bound to them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub controls: Vec<crate::toggle::ControlBinding>,
}

impl Catalog {
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(AfsError::Io)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(AfsError::Serialization)
    }
}

/// How tokens of a single type combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LogicMode {
    #[default]
    #[serde(rename = "OR")]
    Or,
    #[serde(rename = "AND")]
    And,
}

impl fmt::Display for LogicMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicMode::Or => write!(f, "OR"),
            LogicMode::And => write!(f, "AND"),
        }
    }
}

impl FromStr for LogicMode {
    type Err = AfsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OR" => Ok(LogicMode::Or),
            "AND" => Ok(LogicMode::And),
            _ => Err(AfsError::InvalidMode(s.to_string())),
        }
    }
}

/// Global policy for combining all active tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CategoryMode {
    /// OR within a type, each type group combined with AND.
    #[default]
    #[serde(rename = "mixed")]
    Mixed,
    #[serde(rename = "OR")]
    Or,
    #[serde(rename = "AND")]
    And,
}

impl fmt::Display for CategoryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryMode::Mixed => write!(f, "mixed"),
            CategoryMode::Or => write!(f, "OR"),
            CategoryMode::And => write!(f, "AND"),
        }
    }
}

impl FromStr for CategoryMode {
    type Err = AfsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MIXED" => Ok(CategoryMode::Mixed),
            "OR" => Ok(CategoryMode::Or),
            "AND" => Ok(CategoryMode::And),
            _ => Err(AfsError::InvalidMode(s.to_string())),
        }
    }
}

impl From<LogicMode> for CategoryMode {
    fn from(mode: LogicMode) -> Self {
        match mode {
            LogicMode::Or => CategoryMode::Or,
            LogicMode::And => CategoryMode::And,
        }
    }
}

/// The kind of UI control a toggle originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    #[default]
    Button,
    Checkbox,
    Radio,
    Select,
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ControlKind::Button => "button",
            ControlKind::Checkbox => "checkbox",
            ControlKind::Radio => "radio",
            ControlKind::Select => "select",
        };
        f.write_str(s)
    }
}

impl FromStr for ControlKind {
    type Err = AfsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "button" => Ok(ControlKind::Button),
            "checkbox" => Ok(ControlKind::Checkbox),
            "radio" => Ok(ControlKind::Radio),
            "select" => Ok(ControlKind::Select),
            other => Err(AfsError::Config(format!("Unknown control kind: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_typed_token() {
        let token = FilterToken::parse("brand:apple").unwrap();
        assert_eq!(token.type_name(), "brand");
        assert_eq!(token.value(), Some("apple"));
        assert_eq!(token.group_key(), "brand");
        assert!(!token.is_wildcard());
    }

    #[test]
    fn bare_token_groups_under_default() {
        let token = FilterToken::parse("featured").unwrap();
        assert_eq!(token.type_name(), "featured");
        assert_eq!(token.value(), None);
        assert_eq!(token.group_key(), DEFAULT_GROUP);
    }

    #[test]
    fn wildcard_is_recognised() {
        let token = FilterToken::parse(" * ").unwrap();
        assert!(token.is_wildcard());
        assert_eq!(token, FilterToken::wildcard());
    }

    #[test]
    fn rejects_malformed_tokens() {
        for bad in ["", "a:b:c", "*:x", "x:*", ":x", "x:", "two words"] {
            assert!(FilterToken::parse(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn token_deserializes_with_validation() {
        let ok: FilterToken = serde_json::from_str("\"category:tech\"").unwrap();
        assert_eq!(ok.as_str(), "category:tech");
        assert!(serde_json::from_str::<FilterToken>("\"a:b:c\"").is_err());
    }

    #[test]
    fn modes_parse_case_insensitively() {
        assert_eq!("or".parse::<LogicMode>().unwrap(), LogicMode::Or);
        assert_eq!("AND".parse::<LogicMode>().unwrap(), LogicMode::And);
        assert!("XOR".parse::<LogicMode>().is_err());
        assert_eq!("Mixed".parse::<CategoryMode>().unwrap(), CategoryMode::Mixed);
        assert_eq!(CategoryMode::Mixed.to_string(), "mixed");
    }

    #[test]
    fn item_fields_accept_json_scalars() {
        let item: Item = serde_json::from_str(
            r#"{"id":"p1","categories":"brand:apple",
                "fields":{"price":999,"title":"Phone","stock":true}}"#,
        )
        .unwrap();
        assert_eq!(item.field("price"), Some("999"));
        assert_eq!(item.field("title"), Some("Phone"));
        assert_eq!(item.field("stock"), Some("true"));
    }

    #[test]
    fn catalog_parses_items_and_controls() {
        let catalog = Catalog::from_json(
            r#"{
                "items": [{"id": "a", "categories": "brand:apple"}, {"id": "b"}],
                "controls": [{"id": "c1", "token": "brand:apple", "kind": "checkbox"}]
            }"#,
        )
        .unwrap();
        assert_eq!(catalog.items.len(), 2);
        assert_eq!(catalog.items[1].categories, "");
        assert_eq!(catalog.controls[0].kind, ControlKind::Checkbox);
    }

    #[test]
    fn catalog_rejects_bad_control_token() {
        let result = Catalog::from_json(r#"{"controls": [{"id": "c1", "token": "a:b:c"}]}"#);
        assert!(result.is_err());
    }
}
