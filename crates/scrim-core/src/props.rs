use std::collections::HashMap;

use crate::signal::Signal;

/// Dynamic prop value. `Cell` carries a reactive cell; everything else is a
/// plain value. Dereferencing a cell (`plain`) resolves one level; nested
/// cells are not recursed into.
#[derive(Clone)]
pub enum PropValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Cell(Signal<PropValue>),
}

impl PropValue {
    pub fn cell(initial: PropValue) -> PropValue {
        PropValue::Cell(Signal::new(initial))
    }

    pub fn is_cell(&self) -> bool {
        matches!(self, PropValue::Cell(_))
    }

    /// Resolves a cell to its current inner value; plain values clone as-is.
    pub fn plain(&self) -> PropValue {
        match self {
            PropValue::Cell(sig) => sig.get(),
            other => other.clone(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.plain() {
            PropValue::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self.plain() {
            PropValue::Int(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self.plain() {
            PropValue::Float(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<String> {
        match self.plain() {
            PropValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropValue::Null, PropValue::Null) => true,
            (PropValue::Bool(a), PropValue::Bool(b)) => a == b,
            (PropValue::Int(a), PropValue::Int(b)) => a == b,
            (PropValue::Float(a), PropValue::Float(b)) => a == b,
            (PropValue::Str(a), PropValue::Str(b)) => a == b,
            // Cells compare by identity, not by current value.
            (PropValue::Cell(a), PropValue::Cell(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl std::fmt::Debug for PropValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropValue::Null => write!(f, "Null"),
            PropValue::Bool(b) => write!(f, "Bool({b})"),
            PropValue::Int(i) => write!(f, "Int({i})"),
            PropValue::Float(x) => write!(f, "Float({x})"),
            PropValue::Str(s) => write!(f, "Str({s:?})"),
            PropValue::Cell(sig) => f.debug_tuple("Cell").field(&sig.with(|v| format!("{v:?}"))).finish(),
        }
    }
}

impl From<bool> for PropValue {
    fn from(v: bool) -> Self {
        PropValue::Bool(v)
    }
}
impl From<i64> for PropValue {
    fn from(v: i64) -> Self {
        PropValue::Int(v)
    }
}
impl From<f64> for PropValue {
    fn from(v: f64) -> Self {
        PropValue::Float(v)
    }
}
impl From<&str> for PropValue {
    fn from(v: &str) -> Self {
        PropValue::Str(v.to_string())
    }
}
impl From<String> for PropValue {
    fn from(v: String) -> Self {
        PropValue::Str(v)
    }
}
impl From<Signal<PropValue>> for PropValue {
    fn from(v: Signal<PropValue>) -> Self {
        PropValue::Cell(v)
    }
}

/// String-keyed prop bag.
#[derive(Clone, Default, PartialEq)]
pub struct Props(HashMap<String, PropValue>);

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<PropValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PropValue)> {
        self.0.iter()
    }

    /// Union of `self` and `patch`; `patch` wins on conflicting keys.
    pub fn merged_with(&self, patch: &Props) -> Props {
        let mut out = self.0.clone();
        for (k, v) in &patch.0 {
            out.insert(k.clone(), v.clone());
        }
        Props(out)
    }

    /// Copy with every cell-valued field resolved to its current plain value.
    pub fn deref_cells(&self) -> Props {
        Props(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), v.plain()))
                .collect(),
        )
    }
}

impl std::fmt::Debug for Props {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

impl FromIterator<(String, PropValue)> for Props {
    fn from_iter<I: IntoIterator<Item = (String, PropValue)>>(iter: I) -> Self {
        Props(iter.into_iter().collect())
    }
}

// Cells serialize as their current plain value; deserialization only ever
// produces plain variants.
#[cfg(feature = "serde")]
mod serde_impls {
    use super::{PropValue, Props};
    use serde::de::{self, MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for PropValue {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self.plain() {
                PropValue::Null => serializer.serialize_unit(),
                PropValue::Bool(b) => serializer.serialize_bool(b),
                PropValue::Int(i) => serializer.serialize_i64(i),
                PropValue::Float(f) => serializer.serialize_f64(f),
                PropValue::Str(s) => serializer.serialize_str(&s),
                PropValue::Cell(_) => serializer.serialize_unit(),
            }
        }
    }

    impl<'de> Deserialize<'de> for PropValue {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            struct V;
            impl<'de> Visitor<'de> for V {
                type Value = PropValue;
                fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                    f.write_str("a plain prop value")
                }
                fn visit_unit<E: de::Error>(self) -> Result<PropValue, E> {
                    Ok(PropValue::Null)
                }
                fn visit_none<E: de::Error>(self) -> Result<PropValue, E> {
                    Ok(PropValue::Null)
                }
                fn visit_bool<E: de::Error>(self, v: bool) -> Result<PropValue, E> {
                    Ok(PropValue::Bool(v))
                }
                fn visit_i64<E: de::Error>(self, v: i64) -> Result<PropValue, E> {
                    Ok(PropValue::Int(v))
                }
                fn visit_u64<E: de::Error>(self, v: u64) -> Result<PropValue, E> {
                    Ok(PropValue::Int(v as i64))
                }
                fn visit_f64<E: de::Error>(self, v: f64) -> Result<PropValue, E> {
                    Ok(PropValue::Float(v))
                }
                fn visit_str<E: de::Error>(self, v: &str) -> Result<PropValue, E> {
                    Ok(PropValue::Str(v.to_string()))
                }
            }
            deserializer.deserialize_any(V)
        }
    }

    impl Serialize for Props {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.len()))?;
            for (k, v) in self.iter() {
                map.serialize_entry(k, v)?;
            }
            map.end()
        }
    }

    impl<'de> Deserialize<'de> for Props {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            struct V;
            impl<'de> Visitor<'de> for V {
                type Value = Props;
                fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                    f.write_str("a prop map")
                }
                fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Props, A::Error> {
                    let mut props = Props::new();
                    while let Some((k, v)) = access.next_entry::<String, PropValue>()? {
                        props.set(k, v);
                    }
                    Ok(props)
                }
            }
            deserializer.deserialize_map(V)
        }
    }
}
