#![forbid(unsafe_code)]

//! Items, identifiers and datasets.
//!
//! An [`Item`] is one selectable option. Items with children are group
//! headers; a flat dataset is simply a tree of depth zero, so every algorithm
//! in this crate walks one shape.
//!
//! # Identifier equality
//!
//! Identifiers ([`ItemValue`]) are compared with [`ItemValue::shallow_eq`] and
//! nothing else. `ItemValue` intentionally does not implement `PartialEq`: a
//! derived structural `==` would treat `1` and `1.0` as different and `NaN` as
//! unequal to itself, which is not how identifiers are matched.
//!
//! | Left | Right | Equal when |
//! |------|-------|------------|
//! | `Int` / `Float` | `Int` / `Float` | same numeric value (`NaN == NaN`, `+0.0 != -0.0`) |
//! | `Str` | `Str` | same text |
//! | `Record` | `Record` | same key set, every field pair equal |
//! | anything else | | same variant and payload |

use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::tree::{self, Leaves};

/// An item identifier.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(untagged))]
pub enum ItemValue {
    /// Absent identifier.
    #[default]
    Null,
    /// Boolean identifier.
    Bool(bool),
    /// Integer identifier.
    Int(i64),
    /// Floating point identifier.
    Float(f64),
    /// String identifier.
    Str(String),
    /// Object-shaped identifier.
    Record(BTreeMap<String, ItemValue>),
}

impl ItemValue {
    /// Build a record identifier from key/value pairs.
    pub fn record<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<ItemValue>,
    {
        Self::Record(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Shallow structural equality, the only identifier comparison in the crate.
    ///
    /// Record fields are compared with the same rules; owned values carry no
    /// identity, so a nested record matches when its contents match.
    #[must_use]
    pub fn shallow_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => same_float(*a, *b),
            (Self::Int(a), Self::Float(b)) | (Self::Float(b), Self::Int(a)) => {
                same_float(*a as f64, *b)
            }
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Record(a), Self::Record(b)) => {
                a.len() == b.len()
                    && a
                        .iter()
                        .all(|(key, value)| b.get(key).is_some_and(|o| value.shallow_eq(o)))
            }
            _ => false,
        }
    }

    /// Whether this is [`ItemValue::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The string payload, if this is a string identifier.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Same-value comparison for floats: `NaN` equals itself, signed zeros differ.
fn same_float(a: f64, b: f64) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    a == b && a.is_sign_negative() == b.is_sign_negative()
}

impl fmt::Display for ItemValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => f.write_str(s),
            Self::Record(fields) => {
                f.write_str("{")?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<bool> for ItemValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for ItemValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for ItemValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for ItemValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for ItemValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for ItemValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ItemValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// Whether `values` holds an identifier shallow-equal to `value`.
#[must_use]
pub fn contains_value(values: &[ItemValue], value: &ItemValue) -> bool {
    values.iter().any(|v| v.shallow_eq(value))
}

/// Position of the first identifier shallow-equal to `value`.
#[must_use]
pub fn position_of(values: &[ItemValue], value: &ItemValue) -> Option<usize> {
    values.iter().position(|v| v.shallow_eq(value))
}

/// A selectable option, or a group header when it has children.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Item {
    /// Identifier, unique within the dataset.
    pub value: ItemValue,
    /// Display text, searched by default.
    pub label: String,
    /// Child options. Non-empty means this item is a group header.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub children: Vec<Item>,
    /// Excluded from toggling and focus traversal.
    #[cfg_attr(feature = "serde", serde(default))]
    pub disabled: bool,
    /// Any further record attributes (group keys, search fields).
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "BTreeMap::is_empty"))]
    pub fields: BTreeMap<String, ItemValue>,
}

impl Item {
    /// Create a leaf item.
    pub fn new(value: impl Into<ItemValue>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            ..Self::default()
        }
    }

    /// Create a group header with the given children.
    pub fn group(label: impl Into<String>, children: Vec<Item>) -> Self {
        let label = label.into();
        Self {
            value: ItemValue::Str(label.clone()),
            label,
            children,
            ..Self::default()
        }
    }

    /// Add a child item (builder).
    #[must_use]
    pub fn child(mut self, item: Item) -> Self {
        self.children.push(item);
        self
    }

    /// Set the disabled flag (builder).
    #[must_use]
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set an extra record attribute (builder).
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<ItemValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Whether this item is a group header.
    #[must_use]
    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }

    /// Look up an extra record attribute.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&ItemValue> {
        self.fields.get(key)
    }
}

/// An ordered option collection, flat or tree-shaped.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct Dataset {
    items: Vec<Item>,
}

impl Dataset {
    /// Wrap a list of top-level items.
    #[must_use]
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    /// Top-level items.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Number of top-level items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the dataset has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Selectable (non-group) items in depth-first order.
    pub fn leaves(&self) -> Leaves<'_> {
        tree::leaves(&self.items)
    }

    /// The selectable item whose identifier matches `value`.
    #[must_use]
    pub fn find(&self, value: &ItemValue) -> Option<&Item> {
        self.leaves().find(|item| item.value.shallow_eq(value))
    }

    /// Selectable items whose identifiers appear in `values`, in dataset order.
    #[must_use]
    pub fn matching(&self, values: &[ItemValue]) -> Vec<Item> {
        if values.is_empty() {
            return Vec::new();
        }
        self.leaves()
            .filter(|item| contains_value(values, &item.value))
            .cloned()
            .collect()
    }
}

impl From<Vec<Item>> for Dataset {
    fn from(items: Vec<Item>) -> Self {
        Self::new(items)
    }
}

impl FromIterator<Item> for Dataset {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Field selectors used when importing records.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct FieldKeys {
    /// Record field holding the identifier.
    pub value_key: String,
    /// Record field holding the display text.
    pub label_key: String,
    /// Record field holding child records.
    pub children_key: String,
}

impl Default for FieldKeys {
    fn default() -> Self {
        Self {
            value_key: "value".to_string(),
            label_key: "label".to_string(),
            children_key: "children".to_string(),
        }
    }
}

#[cfg(feature = "serde")]
mod json {
    use super::{Dataset, FieldKeys, Item, ItemValue};
    use crate::error::PickerError;
    use checkpick_core::warn;
    use serde_json::Value;

    impl TryFrom<&Value> for ItemValue {
        type Error = PickerError;

        fn try_from(value: &Value) -> Result<Self, Self::Error> {
            Ok(match value {
                Value::Null => Self::Null,
                Value::Bool(b) => Self::Bool(*b),
                Value::Number(n) => match n.as_i64() {
                    Some(i) => Self::Int(i),
                    None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
                },
                Value::String(s) => Self::Str(s.clone()),
                Value::Object(map) => Self::Record(
                    map.iter()
                        .map(|(k, v)| Ok((k.clone(), Self::try_from(v)?)))
                        .collect::<Result<_, PickerError>>()?,
                ),
                Value::Array(_) => {
                    return Err(PickerError::InvalidRecord {
                        index: 0,
                        reason: "arrays cannot be used as identifiers".to_string(),
                    });
                }
            })
        }
    }

    impl Dataset {
        /// Import a dataset from an array of JSON records.
        ///
        /// Records that are not objects, lack the value field, or carry an
        /// unusable identifier are skipped with a warning. A non-array input
        /// yields an empty dataset.
        #[must_use]
        pub fn from_json(records: &Value, keys: &FieldKeys) -> Self {
            let Some(records) = records.as_array() else {
                warn!("dataset is not an array; using an empty dataset");
                return Self::default();
            };
            Self::new(import_records(records, keys))
        }
    }

    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn import_records(records: &[Value], keys: &FieldKeys) -> Vec<Item> {
        records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| match import_record(index, record, keys) {
                Ok(item) => Some(item),
                Err(err) => {
                    warn!(%err, "skipping record");
                    None
                }
            })
            .collect()
    }

    fn import_record(index: usize, record: &Value, keys: &FieldKeys) -> Result<Item, PickerError> {
        let invalid = |reason: &str| PickerError::InvalidRecord {
            index,
            reason: reason.to_string(),
        };
        let map = record.as_object().ok_or_else(|| invalid("not an object"))?;
        let children = map
            .get(&keys.children_key)
            .and_then(Value::as_array)
            .map(|c| import_records(c, keys))
            .unwrap_or_default();
        let value = match map.get(&keys.value_key) {
            Some(v) => ItemValue::try_from(v).map_err(|_| invalid("unusable identifier"))?,
            None if !children.is_empty() => ItemValue::Null,
            None => return Err(invalid("missing value field")),
        };
        let label = match map.get(&keys.label_key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => value.to_string(),
        };
        let disabled = map.get("disabled").and_then(Value::as_bool).unwrap_or(false);
        let fields = map
            .iter()
            .filter(|(k, _)| **k != keys.children_key)
            .filter_map(|(k, v)| ItemValue::try_from(v).ok().map(|v| (k.clone(), v)))
            .collect();
        Ok(Item {
            value,
            label,
            children,
            disabled,
            fields,
        })
    }
}
