//! Metadata field descriptors
//!
//! Nodes declare extra typed fields (`author`, `featured`, `tags`) as
//! explicit `{name, type, default}` descriptors. The set of value kinds is
//! closed.
//!
//! Dates are calendar dates written as ISO-8601 `YYYY-MM-DD` strings.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Kind of value a metadata field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetadataType {
    Text,
    Integer,
    Float,
    Boolean,
    Date,
    TextList,
}

impl fmt::Display for MetadataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MetadataType::Text => "text",
            MetadataType::Integer => "integer",
            MetadataType::Float => "float",
            MetadataType::Boolean => "boolean",
            MetadataType::Date => "date",
            MetadataType::TextList => "text-list",
        };
        f.write_str(name)
    }
}

/// Date format used for [`MetadataValue::Date`]
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A metadata value
///
/// Deserialized untagged, so a string shaped like `2024-03-01` reads as a
/// [`MetadataValue::Date`]. [`MetadataValue::coerce`] turns it back into
/// text for text fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Date(NaiveDate),
    Text(String),
    TextList(Vec<String>),
}

impl MetadataValue {
    pub fn type_tag(&self) -> MetadataType {
        match self {
            MetadataValue::Boolean(_) => MetadataType::Boolean,
            MetadataValue::Integer(_) => MetadataType::Integer,
            MetadataValue::Float(_) => MetadataType::Float,
            MetadataValue::Date(_) => MetadataType::Date,
            MetadataValue::Text(_) => MetadataType::Text,
            MetadataValue::TextList(_) => MetadataType::TextList,
        }
    }

    /// Whether this value may be stored in a field of `type_tag`
    ///
    /// Integers widen to floats; nothing else converts.
    pub fn fits(&self, type_tag: MetadataType) -> bool {
        self.type_tag() == type_tag
            || matches!((self, type_tag), (MetadataValue::Integer(_), MetadataType::Float))
    }

    /// Converts between the text and date forms to suit a field of
    /// `type_tag`; any other value is returned unchanged
    ///
    /// ```
    /// use rhtmx_content_router::config::{MetadataType, MetadataValue};
    ///
    /// let date = MetadataValue::from("2024-03-01").coerce(MetadataType::Date);
    /// assert_eq!(date.type_tag(), MetadataType::Date);
    ///
    /// let invalid = MetadataValue::from("2024-13-01").coerce(MetadataType::Date);
    /// assert_eq!(invalid.type_tag(), MetadataType::Text);
    ///
    /// let text = date.coerce(MetadataType::Text);
    /// assert_eq!(text.as_str(), Some("2024-03-01"));
    /// ```
    pub fn coerce(self, type_tag: MetadataType) -> Self {
        match (self, type_tag) {
            (MetadataValue::Text(text), MetadataType::Date) => {
                match NaiveDate::parse_from_str(text.trim(), DATE_FORMAT) {
                    Ok(date) => MetadataValue::Date(date),
                    Err(_) => MetadataValue::Text(text),
                }
            }
            (MetadataValue::Date(date), MetadataType::Text) => {
                MetadataValue::Text(date.format(DATE_FORMAT).to_string())
            }
            (value, _) => value,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            MetadataValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetadataValue::Float(n) => Some(*n),
            MetadataValue::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            MetadataValue::Date(date) => Some(*date),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MetadataValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            MetadataValue::TextList(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::Text(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::Text(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        MetadataValue::Integer(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        MetadataValue::Float(value)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        MetadataValue::Boolean(value)
    }
}

impl From<NaiveDate> for MetadataValue {
    fn from(value: NaiveDate) -> Self {
        MetadataValue::Date(value)
    }
}

impl From<Vec<String>> for MetadataValue {
    fn from(value: Vec<String>) -> Self {
        MetadataValue::TextList(value)
    }
}

/// A declared metadata field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataFieldSnapshot {
    pub name: String,
    #[serde(rename = "type")]
    pub type_tag: MetadataType,
    #[serde(default)]
    pub default_value: Option<MetadataValue>,
}

/// Metadata fields of one node, unique by case-insensitive name
///
/// ```
/// use rhtmx_content_router::config::{MetadataFields, MetadataType, MetadataValue};
///
/// let mut fields = MetadataFields::default();
/// fields
///     .declare("blog", "featured", MetadataType::Boolean, Some(false.into()))
///     .unwrap();
///
/// assert!(fields.declare("blog", "Featured", MetadataType::Text, None).is_err());
/// assert_eq!(
///     fields.default_value("FEATURED"),
///     Some(&MetadataValue::Boolean(false))
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataFields {
    fields: Vec<MetadataFieldSnapshot>,
}

impl MetadataFields {
    /// Adds a field to the node at `node_path`
    pub fn declare(
        &mut self,
        node_path: &str,
        name: &str,
        type_tag: MetadataType,
        default_value: Option<MetadataValue>,
    ) -> Result<(), ConfigError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigError::BlankMetadataField(node_path.to_string()));
        }

        if self.get(name).is_some() {
            return Err(ConfigError::DuplicateMetadataField {
                node: node_path.to_string(),
                field: name.to_string(),
            });
        }

        let default_value = default_value.map(|value| value.coerce(type_tag));
        if let Some(value) = &default_value {
            if !value.fits(type_tag) {
                return Err(ConfigError::MetadataTypeMismatch {
                    field: name.to_string(),
                    expected: type_tag.to_string(),
                    actual: value.type_tag().to_string(),
                });
            }
        }

        self.fields.push(MetadataFieldSnapshot {
            name: name.to_string(),
            type_tag,
            default_value,
        });
        Ok(())
    }

    /// Case-insensitive lookup
    pub fn get(&self, name: &str) -> Option<&MetadataFieldSnapshot> {
        self.fields
            .iter()
            .find(|field| field.name.eq_ignore_ascii_case(name))
    }

    pub fn default_value(&self, name: &str) -> Option<&MetadataValue> {
        self.get(name).and_then(|field| field.default_value.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetadataFieldSnapshot> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
