//! Literal values recovered from assignment right-hand sides.

use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// A Python literal recovered without evaluation.
///
/// Dict entries keep their source order; a repeated key replaces the earlier
/// entry's value in place, matching how the interpreter builds the dict. Keys
/// the interpreter considers equal (`1`, `True` and `1.0`) count as repeats.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// `None`.
    None,
    /// `True` or `False`.
    Bool(bool),
    /// An integer that fits in 64 bits.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A text string with escapes decoded.
    Str(String),
    /// A list literal; unsupported elements appear as [`LiteralValue::None`].
    List(Vec<LiteralValue>),
    /// A dict literal as ordered key/value pairs.
    Dict(Vec<(LiteralValue, LiteralValue)>),
}

impl LiteralValue {
    /// Builds a dict, letting later duplicate keys overwrite earlier ones.
    #[must_use]
    pub fn dict_from_entries(
        entries: impl IntoIterator<Item = (Self, Self)>,
    ) -> Self {
        let mut pairs: Vec<(Self, Self)> = Vec::new();
        for (key, value) in entries {
            if let Some(slot) = pairs.iter_mut().find(|(existing, _)| existing.same_key(&key)) {
                slot.1 = value;
            } else {
                pairs.push((key, value));
            }
        }
        Self::Dict(pairs)
    }

    /// Looks up a dict entry by string key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Dict(pairs) => pairs
                .iter()
                .find(|(candidate, _)| matches!(candidate, Self::Str(text) if text == key))
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// Dict key equality: booleans and integral floats equal the matching int.
    fn same_key(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(flag), Self::Int(number)) | (Self::Int(number), Self::Bool(flag)) => {
                *number == i64::from(*flag)
            }
            (Self::Float(float), Self::Int(number)) | (Self::Int(number), Self::Float(float)) => {
                i32::try_from(*number).is_ok_and(|small| *float == f64::from(small))
            }
            (Self::Float(float), Self::Bool(flag)) | (Self::Bool(flag), Self::Float(float)) => {
                *float == f64::from(u8::from(*flag))
            }
            _ => self == other,
        }
    }

    /// Renders the value the way it would appear as a JSON object key.
    fn key_text(&self) -> String {
        match self {
            Self::Str(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value:?}"),
            Self::Str(text) => write!(f, "{text:?}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Dict(pairs) => {
                f.write_str("{")?;
                for (index, (key, value)) in pairs.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl Serialize for LiteralValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::None => serializer.serialize_none(),
            Self::Bool(value) => serializer.serialize_bool(*value),
            Self::Int(value) => serializer.serialize_i64(*value),
            Self::Float(value) => serializer.serialize_f64(*value),
            Self::Str(text) => serializer.serialize_str(text),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Dict(pairs) => {
                // `1` and `'1'` render to the same JSON key; the later value
                // wins, keeping the first position.
                let mut entries: Vec<(String, &Self)> = Vec::with_capacity(pairs.len());
                for (key, value) in pairs {
                    let text = key.key_text();
                    match entries.iter_mut().find(|(existing, _)| *existing == text) {
                        Some(slot) => slot.1 = value,
                        None => entries.push((text, value)),
                    }
                }
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(&key, value)?;
                }
                map.end()
            }
        }
    }
}

/// Type tag reported for a variable binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TypeTag {
    /// A string.
    Str,
    /// An integer or boolean.
    Int,
    /// A float.
    Float,
    /// A list.
    List,
    /// A dict.
    Dict,
    /// No literal value could be recovered, or the value is `None`.
    Unknown,
}

impl TypeTag {
    /// Derives the tag from a recovered value.
    ///
    /// Booleans report [`TypeTag::Int`] because `bool` is a subclass of `int`
    /// in Python.
    #[must_use]
    pub const fn of(value: Option<&LiteralValue>) -> Self {
        match value {
            Some(LiteralValue::Str(_)) => Self::Str,
            Some(LiteralValue::Int(_) | LiteralValue::Bool(_)) => Self::Int,
            Some(LiteralValue::Float(_)) => Self::Float,
            Some(LiteralValue::List(_)) => Self::List,
            Some(LiteralValue::Dict(_)) => Self::Dict,
            Some(LiteralValue::None) | None => Self::Unknown,
        }
    }

    /// Returns the tag name as reported to the harness.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Str => "Str",
            Self::Int => "Int",
            Self::Float => "Float",
            Self::List => "List",
            Self::Dict => "Dict",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
