//! Values supplied by the filler.
//!
//! A leaf or attribute holds nothing, a single scalar, or an ordered list of
//! scalars. The serialized form is plain JSON: `null`, a string/number/bool,
//! or an array of those.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single filled value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Boolean flag.
    Bool(bool),
    /// Integer number.
    Integer(i64),
    /// Floating point number.
    Float(f64),
    /// Free text.
    Text(String),
}

impl Scalar {
    /// Returns true for the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            // Keep whole floats recognizable as decimals.
            Self::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{x:.1}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<f64> for Scalar {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// The value slot of a field descriptor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Not filled.
    #[default]
    Empty,
    /// One scalar.
    Single(Scalar),
    /// Ordered list of scalars.
    List(Vec<Scalar>),
}

impl FieldValue {
    /// Returns true when nothing usable was filled in.
    ///
    /// An empty string and an empty list both count as empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Single(s) => s.is_empty(),
            Self::List(items) => items.is_empty(),
        }
    }

    /// Returns true if the value is list-shaped.
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Returns the single scalar, if this is a non-empty single value.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Single(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    /// Returns the value as a slice of scalars.
    ///
    /// A single scalar is viewed as a one-element list.
    #[must_use]
    pub fn as_slice(&self) -> &[Scalar] {
        match self {
            Self::Empty => &[],
            Self::Single(s) => std::slice::from_ref(s),
            Self::List(items) => items,
        }
    }

    /// Appends a scalar, turning the value into a list.
    pub fn push(&mut self, scalar: Scalar) {
        match std::mem::take(self) {
            Self::Empty => *self = Self::List(vec![scalar]),
            Self::Single(first) => *self = Self::List(vec![first, scalar]),
            Self::List(mut items) => {
                items.push(scalar);
                *self = Self::List(items);
            }
        }
    }
}

macro_rules! single_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    Self::Single(value.into())
                }
            }
        )*
    };
}

single_from!(Scalar, &str, String, i64, f64, bool);

impl From<Vec<Scalar>> for FieldValue {
    fn from(items: Vec<Scalar>) -> Self {
        Self::List(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_display() {
        assert_eq!(Scalar::from("abc").to_string(), "abc");
        assert_eq!(Scalar::from(7_i64).to_string(), "7");
        assert_eq!(Scalar::from(1.5_f64).to_string(), "1.5");
        assert_eq!(Scalar::from(1.0_f64).to_string(), "1.0");
        assert_eq!(Scalar::from(-20.0_f64).to_string(), "-20.0");
        assert_eq!(Scalar::from(f64::INFINITY).to_string(), "inf");
        assert_eq!(Scalar::from(true).to_string(), "true");
    }

    #[test]
    fn test_field_value_emptiness() {
        assert!(FieldValue::Empty.is_empty());
        assert!(FieldValue::from("").is_empty());
        assert!(FieldValue::List(vec![]).is_empty());
        assert!(!FieldValue::from("x").is_empty());
        assert!(!FieldValue::from(0_i64).is_empty());
        assert!(!FieldValue::List(vec![Scalar::from("")]).is_empty());
    }

    #[test]
    fn test_field_value_push() {
        let mut value = FieldValue::Empty;
        value.push("a".into());
        assert_eq!(value, FieldValue::List(vec!["a".into()]));

        let mut value = FieldValue::from("a");
        value.push("b".into());
        assert_eq!(value.as_slice().len(), 2);
    }

    #[test]
    fn test_field_value_json_shapes() {
        let null: FieldValue = serde_json::from_str("null").expect("null");
        assert_eq!(null, FieldValue::Empty);

        let text: FieldValue = serde_json::from_str("\"7\"").expect("text");
        assert_eq!(text, FieldValue::Single(Scalar::Text("7".into())));

        let number: FieldValue = serde_json::from_str("7").expect("number");
        assert_eq!(number, FieldValue::Single(Scalar::Integer(7)));

        let list: FieldValue = serde_json::from_str("[\"A\", 2]").expect("list");
        assert_eq!(
            list,
            FieldValue::List(vec![Scalar::Text("A".into()), Scalar::Integer(2)])
        );

        assert_eq!(serde_json::to_string(&FieldValue::Empty).expect("ser"), "null");
    }

    #[test]
    fn test_field_value_shape_accessors() {
        let single = FieldValue::from(7_i64);
        assert!(!single.is_list());
        assert_eq!(single.as_scalar(), Some(&Scalar::Integer(7)));

        let list = FieldValue::List(vec![Scalar::from("a")]);
        assert!(list.is_list());
        assert_eq!(list.as_scalar(), None);

        assert_eq!(FieldValue::from("").as_scalar(), None);
        assert_eq!(FieldValue::Empty.as_scalar(), None);
        assert!(!FieldValue::Empty.is_list());
    }

    #[test]
    fn test_single_viewed_as_slice() {
        let value = FieldValue::from("only");
        assert_eq!(value.as_slice(), &[Scalar::from("only")]);
        assert!(FieldValue::Empty.as_slice().is_empty());
    }
}
