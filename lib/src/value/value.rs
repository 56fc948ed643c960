use std::fmt;
use std::sync::Arc;
use std::collections::BTreeMap;

use serde::{Serialize, Deserialize, Deserializer};
use serde::de::{self, Visitor, SeqAccess, MapAccess};

pub type Dict<K = Arc<str>, V = Value> = BTreeMap<K, V>;

/// Key under which `toml` surfaces a datetime through `deserialize_any`.
const TOML_DATETIME_KEY: &str = "$__toml_private_datetime";

/// Represents any decoded front-matter value.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Num(Num),
    String(Arc<str>),
    Array(Arc<Vec<Value>>),
    Dict(Arc<Dict>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(&**s),
            _ => None
        }
    }

    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Value::Array(v) => Some(v.as_slice()),
            _ => None
        }
    }

    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Value::Dict(v) => Some(&**v),
            _ => None
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Num(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Dict(_) => "dict",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => b.fmt(f),
            Value::Num(n) => n.fmt(f),
            Value::String(s) => s.fmt(f),
            Value::Array(values) => {
                for (i, value) in values.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    value.fmt(f)?;
                }

                Ok(())
            }
            Value::Dict(dict) => {
                write!(f, "{{")?;
                for (i, (key, value)) in dict.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{key}: {value}")?;
                }

                write!(f, "}}")
            }
        }
    }
}

macro_rules! impl_from_primitive {
    ($($T:ty),+ => $E:ident::$kind:ident) => {
        $(
            impl From<$T> for $E {
                fn from(value: $T) -> Self {
                    $E::$kind(value.into())
                }
            }
        )+
    };
}

impl_from_primitive!(i8, i16, i32, i64, u8, u16, u32, f32, f64 => Value::Num);

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("any front-matter value")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E: de::Error>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Value, D::Error> {
                Value::deserialize(d)
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
                Ok(Value::Bool(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
                Ok(Value::Num(Num::Int(v)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
                Ok(Value::Num(Num::from(v)))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
                Ok(Value::Num(Num::Float(v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
                Ok(Value::String(v.into()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
                Ok(Value::String(v.into()))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
                let mut values = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(value) = seq.next_element::<Value>()? {
                    values.push(value);
                }

                Ok(Value::Array(Arc::new(values)))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
                let mut dict = Dict::new();
                while let Some((key, value)) = map.next_entry::<KeyString, Value>()? {
                    dict.insert(key.0, value);
                }

                // A TOML datetime arrives as a one-entry map; keep its text.
                if dict.len() == 1 {
                    if let Some(Value::String(datetime)) = dict.get(TOML_DATETIME_KEY) {
                        return Ok(Value::String(datetime.clone()));
                    }
                }

                Ok(Value::Dict(Arc::new(dict)))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

/// A mapping key. YAML allows scalar keys of any type; they are keyed by
/// their textual form.
struct KeyString(Arc<str>);

impl<'de> Deserialize<'de> for KeyString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(KeyString(s)),
            v @ (Value::Null | Value::Bool(_) | Value::Num(_)) => Ok(KeyString(v.to_string().into())),
            v => Err(de::Error::custom(format_args!("unsupported {} mapping key", v.kind()))),
        }
    }
}

/// An integral or floating point number.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    pub fn to_f64(self) -> f64 {
        match self {
            Num::Int(v) => v as f64,
            Num::Float(v) => v,
        }
    }
}

impl PartialEq for Num {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Num::Int(a), Num::Int(b)) => a == b,
            _ => self.to_f64() == other.to_f64(),
        }
    }
}

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Num::Int(v) => v.fmt(f),
            Num::Float(v) => v.fmt(f),
        }
    }
}

macro_rules! impl_from_for_num_value {
    ($($T:ty: $V:ident),* $(,)?) => ($(
        impl From<$T> for Num {
            fn from(value: $T) -> Num {
                Num::$V(value.into())
            }
        }
    )*)
}

impl_from_for_num_value! {
    i8: Int, i16: Int, i32: Int, i64: Int, u8: Int, u16: Int, u32: Int,
    f32: Float, f64: Float,
}

impl From<u64> for Num {
    fn from(value: u64) -> Num {
        i64::try_from(value)
            .map(Num::Int)
            .unwrap_or(Num::Float(value as f64))
    }
}
