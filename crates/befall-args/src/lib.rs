//! Evil Befall Argument Decoding
//!
//! Turns raw `key=value` command arguments into typed values.
//!
//! Key format:
//! - `name` → string
//! - `name::int64` → base-10 integer of that width
//! - `name::json` → arbitrary JSON value
//! - `name::[]uint8` → comma separated list of the inner type
//!
//! List values are split on a literal `,` with no quoting or nesting. Use
//! `name::json` with a JSON array when elements contain commas.

mod decode;
mod error;
mod value;

pub use decode::{
    decode, decode_filtered, parse_key, ArgType, ScalarType, DEFAULT_TYPE, TYPE_SEPARATOR,
};
pub use error::DecodeError;
pub use value::{map_to_json, ArgMap, ArgValue};

pub type Result<T> = std::result::Result<T, DecodeError>;
