//! Decoded argument values

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Decoded arguments keyed by bare argument name.
pub type ArgMap = BTreeMap<String, ArgValue>;

/// A dynamically typed argument value.
///
/// Integers keep the width they were decoded as so a request can tell
/// `uint8` from `int64`. Serializes to the plain JSON value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ArgValue {
    Uint(u64),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    Uintptr(usize),
    Int(i64),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Str(String),
    Json(Value),
    List(Vec<ArgValue>),
}

impl ArgValue {
    /// Name of the value's type as used in `key::type` annotations.
    pub fn type_name(&self) -> &'static str {
        match self {
            ArgValue::Uint(_) => "uint",
            ArgValue::Uint8(_) => "uint8",
            ArgValue::Uint16(_) => "uint16",
            ArgValue::Uint32(_) => "uint32",
            ArgValue::Uint64(_) => "uint64",
            ArgValue::Uintptr(_) => "uintptr",
            ArgValue::Int(_) => "int",
            ArgValue::Int8(_) => "int8",
            ArgValue::Int16(_) => "int16",
            ArgValue::Int32(_) => "int32",
            ArgValue::Int64(_) => "int64",
            ArgValue::Str(_) => "string",
            ArgValue::Json(_) => "json",
            ArgValue::List(_) => "list",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ArgValue::Uint(v) | ArgValue::Uint64(v) => Value::from(*v),
            ArgValue::Uint8(v) => Value::from(*v),
            ArgValue::Uint16(v) => Value::from(*v),
            ArgValue::Uint32(v) => Value::from(*v),
            ArgValue::Uintptr(v) => Value::from(*v),
            ArgValue::Int(v) | ArgValue::Int64(v) => Value::from(*v),
            ArgValue::Int8(v) => Value::from(*v),
            ArgValue::Int16(v) => Value::from(*v),
            ArgValue::Int32(v) => Value::from(*v),
            ArgValue::Str(s) => Value::String(s.clone()),
            ArgValue::Json(v) => v.clone(),
            ArgValue::List(items) => Value::Array(items.iter().map(ArgValue::to_json).collect()),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self {
        ArgValue::Str(s.to_string())
    }
}

/// Convert a whole map into a JSON object, preserving key order.
pub fn map_to_json(args: &ArgMap) -> Value {
    Value::Object(
        args.iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_json_matches_serialize() {
        let value = ArgValue::List(vec![ArgValue::Int8(-3), ArgValue::Str("x".into())]);
        assert_eq!(value.to_json(), json!([-3, "x"]));
        assert_eq!(serde_json::to_value(&value).unwrap(), value.to_json());
    }

    #[test]
    fn test_map_to_json() {
        let mut args = ArgMap::new();
        args.insert("age".into(), ArgValue::Int(30));
        args.insert("payload".into(), ArgValue::Json(json!({"x": 1})));

        assert_eq!(map_to_json(&args), json!({"age": 30, "payload": {"x": 1}}));
    }
}
