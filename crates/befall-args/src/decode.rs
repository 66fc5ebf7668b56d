//! Key parsing and value coercion

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::DecodeError;
use crate::value::{ArgMap, ArgValue};
use crate::Result;

/// Separates an argument name from its type tag.
pub const TYPE_SEPARATOR: &str = "::";

/// Type assumed for keys without a tag.
pub const DEFAULT_TYPE: &str = "string";

const LIST_PREFIX: &str = "[]";
const LIST_DELIMITER: char = ',';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Byte,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Json,
    /// Anything unrecognized, stored verbatim
    Raw,
}

impl ScalarType {
    fn parse(tag: &str) -> Self {
        match tag {
            "uint" => ScalarType::Uint,
            "uint8" => ScalarType::Uint8,
            "uint16" => ScalarType::Uint16,
            "uint32" => ScalarType::Uint32,
            "uint64" => ScalarType::Uint64,
            "uintptr" => ScalarType::Uintptr,
            "byte" => ScalarType::Byte,
            "int" => ScalarType::Int,
            "int8" => ScalarType::Int8,
            "int16" => ScalarType::Int16,
            "int32" => ScalarType::Int32,
            "int64" => ScalarType::Int64,
            t if t.eq_ignore_ascii_case("json") => ScalarType::Json,
            _ => ScalarType::Raw,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            ScalarType::Uint => "uint",
            ScalarType::Uint8 => "uint8",
            ScalarType::Uint16 => "uint16",
            ScalarType::Uint32 => "uint32",
            ScalarType::Uint64 => "uint64",
            ScalarType::Uintptr => "uintptr",
            ScalarType::Byte => "byte",
            ScalarType::Int => "int",
            ScalarType::Int8 => "int8",
            ScalarType::Int16 => "int16",
            ScalarType::Int32 => "int32",
            ScalarType::Int64 => "int64",
            ScalarType::Json => "json",
            ScalarType::Raw => DEFAULT_TYPE,
        }
    }

    fn decode(&self, key: &str, raw: &str) -> Result<ArgValue> {
        let value = match self {
            ScalarType::Uint => ArgValue::Uint(parse_uint::<usize>(key, raw, self)? as u64),
            ScalarType::Uint8 | ScalarType::Byte => ArgValue::Uint8(parse_uint(key, raw, self)?),
            ScalarType::Uint16 => ArgValue::Uint16(parse_uint(key, raw, self)?),
            ScalarType::Uint32 => ArgValue::Uint32(parse_uint(key, raw, self)?),
            ScalarType::Uint64 => ArgValue::Uint64(parse_uint(key, raw, self)?),
            ScalarType::Uintptr => ArgValue::Uintptr(parse_uint(key, raw, self)?),
            ScalarType::Int => ArgValue::Int(parse_int::<isize>(key, raw, self)? as i64),
            ScalarType::Int8 => ArgValue::Int8(parse_int(key, raw, self)?),
            ScalarType::Int16 => ArgValue::Int16(parse_int(key, raw, self)?),
            ScalarType::Int32 => ArgValue::Int32(parse_int(key, raw, self)?),
            ScalarType::Int64 => ArgValue::Int64(parse_int(key, raw, self)?),
            ScalarType::Json => {
                let parsed = serde_json::from_str(raw).map_err(|source| DecodeError::Json {
                    key: key.to_string(),
                    value: raw.to_string(),
                    source,
                })?;
                ArgValue::Json(parsed)
            }
            ScalarType::Raw => ArgValue::Str(raw.to_string()),
        };
        Ok(value)
    }
}

/// The type a key is annotated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    Scalar(ScalarType),
    /// `[]inner`: comma separated, each piece decoded as `inner`
    List(ScalarType),
}

impl FromStr for ArgType {
    type Err = std::convert::Infallible;

    fn from_str(tag: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match tag.strip_prefix(LIST_PREFIX) {
            Some(inner) => ArgType::List(ScalarType::parse(inner)),
            None => ArgType::Scalar(ScalarType::parse(tag)),
        })
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgType::Scalar(t) => write!(f, "{}", t.as_str()),
            ArgType::List(t) => write!(f, "{}{}", LIST_PREFIX, t.as_str()),
        }
    }
}

impl ArgType {
    fn decode(&self, key: &str, raw: &str) -> Result<ArgValue> {
        match self {
            ArgType::Scalar(t) => t.decode(key, raw),
            ArgType::List(t) => raw
                .split(LIST_DELIMITER)
                .map(|piece| t.decode(key, piece))
                .collect::<Result<Vec<_>>>()
                .map(ArgValue::List),
        }
    }
}

/// Split `name::type` into the bare name and its type.
///
/// A key without a tag is a plain string argument. Anything after a second
/// separator is ignored.
pub fn parse_key(key: &str) -> (&str, ArgType) {
    let mut parts = key.split(TYPE_SEPARATOR);
    let name = parts.next().unwrap_or(key);
    let ty = parts
        .next()
        .and_then(|tag| tag.parse().ok())
        .unwrap_or(ArgType::Scalar(ScalarType::Raw));
    (name, ty)
}

fn parse_int<T>(key: &str, raw: &str, ty: &ScalarType) -> Result<T>
where
    T: FromStr<Err = std::num::ParseIntError>,
{
    raw.parse::<T>().map_err(|source| DecodeError::Int {
        key: key.to_string(),
        value: raw.to_string(),
        ty: ty.as_str().to_string(),
        source,
    })
}

/// Unsigned values are plain digits; a leading `+` is rejected.
fn parse_uint<T>(key: &str, raw: &str, ty: &ScalarType) -> Result<T>
where
    T: FromStr<Err = std::num::ParseIntError>,
{
    if raw.starts_with('+') {
        return Err(DecodeError::Sign {
            key: key.to_string(),
            value: raw.to_string(),
            ty: ty.as_str().to_string(),
        });
    }
    parse_int(key, raw, ty)
}

/// Decode every argument. The first failure aborts the whole decode.
pub fn decode(raw: &BTreeMap<String, String>) -> Result<ArgMap> {
    decode_filtered(raw, |_| false)
}

/// Decode every argument whose key is not excluded by `skip`.
pub fn decode_filtered<F>(raw: &BTreeMap<String, String>, skip: F) -> Result<ArgMap>
where
    F: Fn(&str) -> bool,
{
    let mut decoded = ArgMap::new();
    for (key, value) in raw {
        if skip(key) {
            continue;
        }

        let (name, ty) = parse_key(key);
        decoded.insert(name.to_string(), ty.decode(name, value)?);
    }
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_decode_int() {
        let decoded = decode(&raw(&[("age::int", "30")])).unwrap();
        assert_eq!(decoded["age"], ArgValue::Int(30));
        assert_eq!(decoded["age"].to_json(), json!(30));
    }

    #[test]
    fn test_decode_int8_overflow() {
        let err = decode(&raw(&[("age::int8", "300")])).unwrap_err();
        let message = err.to_string();

        assert_eq!(err.key(), "age");
        assert!(message.contains("age"));
        assert!(message.contains("300"));
        assert!(message.contains("int8"));
    }

    #[test]
    fn test_decode_widths() {
        let decoded = decode(&raw(&[
            ("a::uint8", "255"),
            ("b::byte", "7"),
            ("c::int16", "-32768"),
            ("d::uint64", "18446744073709551615"),
            ("e::uintptr", "42"),
            ("f::int32", "-1"),
        ]))
        .unwrap();

        assert_eq!(decoded["a"], ArgValue::Uint8(255));
        assert_eq!(decoded["b"], ArgValue::Uint8(7));
        assert_eq!(decoded["c"], ArgValue::Int16(-32768));
        assert_eq!(decoded["d"], ArgValue::Uint64(u64::MAX));
        assert_eq!(decoded["e"], ArgValue::Uintptr(42));
        assert_eq!(decoded["f"], ArgValue::Int32(-1));
    }

    #[test]
    fn test_decode_non_numeric() {
        assert!(decode(&raw(&[("n::uint", "-1")])).is_err());
        assert!(decode(&raw(&[("n::int64", "ten")])).is_err());
    }

    #[test]
    fn test_decode_unsigned_rejects_plus_sign() {
        let err = decode(&raw(&[("n::uint8", "+5")])).unwrap_err();
        assert!(matches!(err, DecodeError::Sign { .. }));
        assert_eq!(err.key(), "n");
        assert!(err.to_string().contains("uint8"));

        assert!(decode(&raw(&[("ids::[]uint", "1,+2")])).is_err());

        let decoded = decode(&raw(&[("n::int8", "+5")])).unwrap();
        assert_eq!(decoded["n"], ArgValue::Int8(5));
    }

    #[test]
    fn test_decode_string_list() {
        let decoded = decode(&raw(&[("tags::[]string", "a,b,c")])).unwrap();
        assert_eq!(
            decoded["tags"],
            ArgValue::List(vec!["a".into(), "b".into(), "c".into()])
        );
    }

    #[test]
    fn test_decode_int_list_fails_on_bad_piece() {
        let decoded = decode(&raw(&[("ids::[]uint32", "1,2,3")])).unwrap();
        assert_eq!(decoded["ids"].to_json(), json!([1, 2, 3]));

        assert!(decode(&raw(&[("ids::[]uint32", "1,,3")])).is_err());
    }

    #[test]
    fn test_decode_json() {
        let decoded = decode(&raw(&[("payload::json", r#"{"x":1,"y":[1,2]}"#)])).unwrap();
        let expected: serde_json::Value = serde_json::from_str(r#"{"x":1,"y":[1,2]}"#).unwrap();
        assert_eq!(decoded["payload"], ArgValue::Json(expected));

        let decoded = decode(&raw(&[("payload::JSON", "[1]")])).unwrap();
        assert_eq!(decoded["payload"].to_json(), json!([1]));
    }

    #[test]
    fn test_decode_invalid_json() {
        let err = decode(&raw(&[("payload::json", "{")])).unwrap_err();
        assert!(matches!(err, DecodeError::Json { .. }));
    }

    #[test]
    fn test_decode_untagged_and_unknown() {
        let decoded = decode(&raw(&[("name", "bob"), ("flag::bool", "true")])).unwrap();
        assert_eq!(decoded["name"], ArgValue::Str("bob".into()));
        assert_eq!(decoded["flag"], ArgValue::Str("true".into()));
    }

    #[test]
    fn test_decode_no_partial_result() {
        let result = decode(&raw(&[("a::int", "1"), ("b::int", "x"), ("c", "ok")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_filtered() {
        let decoded = decode_filtered(
            &raw(&[("route", "ping"), ("__debug", "true"), ("id::uint", "5")]),
            |k| k == "route" || k.starts_with("__"),
        )
        .unwrap();

        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded["id"], ArgValue::Uint(5));
    }

    #[test]
    fn test_parse_key() {
        assert_eq!(parse_key("name"), ("name", ArgType::Scalar(ScalarType::Raw)));
        assert_eq!(parse_key("n::[]int"), ("n", ArgType::List(ScalarType::Int)));
        assert_eq!(parse_key("a::int::x"), ("a", ArgType::Scalar(ScalarType::Int)));
        assert_eq!(ArgType::List(ScalarType::Int8).to_string(), "[]int8");
    }
}
