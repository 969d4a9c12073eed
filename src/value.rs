//! Typed property values
//!
//! Decodes the raw payload of a property into a [`PropertyValue`]. The variant
//! is chosen by the value type alone; the payload only decides how many
//! elements a multi-valued property holds.

use crate::charset::{CharsetDetector, decode_narrow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use tracing::debug;
use uuid::Uuid;

/// MAPI value type codes
pub mod value_type {
    pub const INT16: u16 = 0x0002;
    pub const INT32: u16 = 0x0003;
    pub const FLOAT32: u16 = 0x0004;
    pub const FLOAT64: u16 = 0x0005;
    pub const CURRENCY: u16 = 0x0006;
    pub const APP_TIME: u16 = 0x0007;
    pub const ERROR: u16 = 0x000A;
    pub const BOOLEAN: u16 = 0x000B;
    pub const OBJECT: u16 = 0x000D;
    pub const INT64: u16 = 0x0014;
    pub const STRING8: u16 = 0x001E;
    pub const UNICODE: u16 = 0x001F;
    pub const SYSTIME: u16 = 0x0040;
    pub const GUID: u16 = 0x0048;
    pub const SERVER_ID: u16 = 0x00FB;
    pub const BINARY: u16 = 0x0102;

    /// Flag marking a multi-valued variant of a base type
    pub const MULTI_VALUE: u16 = 0x1000;

    pub const MV_STRING8: u16 = MULTI_VALUE | STRING8;
    pub const MV_UNICODE: u16 = MULTI_VALUE | UNICODE;
    pub const MV_SERVER_ID: u16 = MULTI_VALUE | SERVER_ID;
    pub const MV_BINARY: u16 = MULTI_VALUE | BINARY;

    /// Width in bytes of a fixed-width type, `None` for variable-width types
    #[must_use]
    pub const fn fixed_width(value_type: u16) -> Option<usize> {
        match value_type {
            INT16 | BOOLEAN => Some(2),
            INT32 | FLOAT32 | ERROR => Some(4),
            FLOAT64 | CURRENCY | APP_TIME | INT64 | SYSTIME => Some(8),
            GUID => Some(16),
            _ => None,
        }
    }
}

/// 100-nanosecond ticks per millisecond
const TICKS_PER_MILLISECOND: u64 = 10_000;

/// Milliseconds between 1601-01-01 and 1970-01-01
const FILETIME_UNIX_EPOCH_MILLIS: i64 = 11_644_473_600_000;

/// Single element of a fixed-width property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Bool(bool),
    Guid(String),
    Timestamp(DateTime<Utc>),
}

/// Decoded property payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Bool(bool),
    Guid(String),
    Timestamp(DateTime<Utc>),
    Text(String),
    Binary(Vec<u8>),
    Array(Vec<Scalar>),
    TextArray(Vec<String>),
}

impl PropertyValue {
    /// Text content of string and binary values.
    ///
    /// Binary payloads are read as UTF-8 with invalid sequences replaced,
    /// since several producers store body text in binary properties.
    #[must_use]
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Text(text) => Some(Cow::Borrowed(text)),
            Self::Binary(bytes) => Some(String::from_utf8_lossy(bytes)),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    /// Variant name used in diagnostics
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Int16(_) => "int16",
            Self::Int32(_) => "int32",
            Self::Int64(_) => "int64",
            Self::Float32(_) => "float32",
            Self::Float64(_) => "float64",
            Self::Bool(_) => "bool",
            Self::Guid(_) => "guid",
            Self::Timestamp(_) => "timestamp",
            Self::Text(_) => "text",
            Self::Binary(_) => "binary",
            Self::Array(_) => "array",
            Self::TextArray(_) => "text array",
        }
    }
}

impl From<Scalar> for PropertyValue {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Int16(v) => Self::Int16(v),
            Scalar::Int32(v) => Self::Int32(v),
            Scalar::Int64(v) => Self::Int64(v),
            Scalar::Float32(v) => Self::Float32(v),
            Scalar::Float64(v) => Self::Float64(v),
            Scalar::Bool(v) => Self::Bool(v),
            Scalar::Guid(v) => Self::Guid(v),
            Scalar::Timestamp(v) => Self::Timestamp(v),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int16(v) => write!(f, "{v}"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Float32(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Guid(v) => write!(f, "{{{v}}}"),
            Self::Timestamp(v) => write!(f, "{}", v.to_rfc3339()),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int16(v) => write!(f, "{v}"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Float32(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Guid(v) => write!(f, "{{{v}}}"),
            Self::Timestamp(v) => write!(f, "{}", v.to_rfc3339()),
            Self::Text(text) => write!(f, "{text:?}"),
            Self::Binary(bytes) => write!(f, "<{} bytes>", bytes.len()),
            Self::Array(items) => {
                let items: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", items.join(", "))
            }
            Self::TextArray(items) => write!(f, "{items:?}"),
        }
    }
}

/// Decode a property payload according to its value type.
///
/// Returns `None` when the payload is too short for a fixed-width type or
/// the value type is not supported. Multi-valued payloads decode as many
/// whole elements as fit and never fail.
#[must_use]
pub fn decode_value(
    payload: &[u8],
    value_type: u16,
    detector: &dyn CharsetDetector,
) -> Option<PropertyValue> {
    use self::value_type::{
        BINARY, MULTI_VALUE, MV_BINARY, MV_SERVER_ID, MV_STRING8, MV_UNICODE, OBJECT, SERVER_ID,
        STRING8, UNICODE,
    };

    match value_type {
        STRING8 => {
            let text = decode_narrow(payload, detector);
            Some(PropertyValue::Text(trim_terminators(text)))
        }
        UNICODE => {
            let text = decode_utf16le(payload);
            Some(PropertyValue::Text(trim_terminators(text)))
        }
        BINARY | SERVER_ID | OBJECT | MV_BINARY | MV_SERVER_ID => {
            Some(PropertyValue::Binary(payload.to_vec()))
        }
        MV_STRING8 => Some(PropertyValue::TextArray(split_terminated(
            payload
                .split(|&b| b == 0)
                .map(|segment| decode_narrow(segment, detector)),
        ))),
        MV_UNICODE => Some(PropertyValue::TextArray(split_terminated(
            decode_utf16le(payload).split('\0').map(str::to_string),
        ))),
        multi if multi & MULTI_VALUE != 0 => {
            let base = multi & !MULTI_VALUE;
            let Some(width) = self::value_type::fixed_width(base) else {
                debug!("Unsupported multi-value type {multi:#06x}");
                return None;
            };
            Some(PropertyValue::Array(
                payload
                    .chunks_exact(width)
                    .filter_map(|element| decode_scalar(element, base))
                    .collect(),
            ))
        }
        single => decode_scalar(payload, single).map(PropertyValue::from),
    }
}

/// Decode one fixed-width element from the front of `payload`
#[must_use]
pub fn decode_scalar(payload: &[u8], value_type: u16) -> Option<Scalar> {
    use self::value_type::{
        APP_TIME, BOOLEAN, CURRENCY, ERROR, FLOAT32, FLOAT64, GUID, INT16, INT32, INT64, SYSTIME,
    };

    match value_type {
        INT16 => le::<2>(payload).map(|b| Scalar::Int16(i16::from_le_bytes(b))),
        INT32 | ERROR => le::<4>(payload).map(|b| Scalar::Int32(i32::from_le_bytes(b))),
        INT64 | CURRENCY => le::<8>(payload).map(|b| Scalar::Int64(i64::from_le_bytes(b))),
        FLOAT32 => le::<4>(payload).map(|b| Scalar::Float32(f32::from_le_bytes(b))),
        FLOAT64 | APP_TIME => le::<8>(payload).map(|b| Scalar::Float64(f64::from_le_bytes(b))),
        BOOLEAN => le::<2>(payload).map(|b| Scalar::Bool(u16::from_le_bytes(b) != 0)),
        SYSTIME => le::<8>(payload)
            .and_then(|b| filetime_to_datetime(u64::from_le_bytes(b)))
            .map(Scalar::Timestamp),
        GUID => le::<16>(payload).map(|b| Scalar::Guid(format_guid(b))),
        other => {
            debug!("Unsupported value type {other:#06x}");
            None
        }
    }
}

/// Milliseconds since the Unix epoch for a FILETIME tick count
#[must_use]
pub fn filetime_to_unix_millis(ticks: u64) -> i64 {
    // u64::MAX / 10_000 always fits in an i64
    i64::try_from(ticks / TICKS_PER_MILLISECOND).unwrap_or(i64::MAX) - FILETIME_UNIX_EPOCH_MILLIS
}

/// Absolute time for a FILETIME tick count
#[must_use]
pub fn filetime_to_datetime(ticks: u64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(filetime_to_unix_millis(ticks))
}

/// Format a GUID in its mixed-endian wire layout: the first three groups are
/// little-endian, the remaining eight bytes are written in order.
#[must_use]
pub fn format_guid(bytes: [u8; 16]) -> String {
    Uuid::from_bytes_le(bytes).hyphenated().to_string()
}

/// Decode UTF-16LE without byte-order-mark handling.
///
/// A trailing odd byte is ignored and unpaired surrogates become U+FFFD.
#[must_use]
pub fn decode_utf16le(bytes: &[u8]) -> String {
    let units = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]));
    char::decode_utf16(units)
        .map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

fn le<const N: usize>(payload: &[u8]) -> Option<[u8; N]> {
    payload.first_chunk::<N>().copied()
}

fn trim_terminators(text: String) -> String {
    if text.ends_with('\0') {
        text.trim_end_matches('\0').to_string()
    } else {
        text
    }
}

/// Collect null-separated segments, dropping the empty segment left after
/// the final terminator.
fn split_terminated(segments: impl Iterator<Item = String>) -> Vec<String> {
    let mut values: Vec<String> = segments.collect();
    if values.last().is_some_and(String::is_empty) {
        values.pop();
    }
    values
}
