//! Property stream names
//!
//! Every property stored in its own stream is named
//! `__substg1.0_<4 hex property id><4 hex value type>`, optionally followed
//! by a suffix for multi-valued element streams.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Prefix carried by every property stream
pub const PROPERTY_STREAM_PREFIX: &str = "__substg1.0_";

/// Name of the fixed-length property stream found in every storage
pub const PROPERTIES_STREAM_NAME: &str = "__properties_version1.0";

/// Identifier and value type of a single property
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PropertyTag {
    /// Semantic key ("subject", "sender address", ...)
    pub id: u16,

    /// Binary encoding of the payload, see [`crate::value_type`]
    pub value_type: u16,
}

impl PropertyTag {
    #[must_use]
    pub const fn new(id: u16, value_type: u16) -> Self {
        Self { id, value_type }
    }

    /// Parse a property stream name.
    ///
    /// Returns `None` for names without the property prefix, names too short
    /// to hold both hex fields, and names whose hex fields do not parse.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let rest = name.strip_prefix(PROPERTY_STREAM_PREFIX)?;

        let (Some(id), Some(value_type)) = (rest.get(0..4), rest.get(4..8)) else {
            debug!("Property stream name too short: {name}");
            return None;
        };

        match (parse_hex(id), parse_hex(value_type)) {
            (Some(id), Some(value_type)) => Some(Self { id, value_type }),
            _ => {
                debug!("Malformed property stream name: {name}");
                None
            }
        }
    }

    /// Split a packed 32-bit tag (id in the high word, type in the low word)
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_packed(raw: u32) -> Self {
        Self {
            id: (raw >> 16) as u16,
            value_type: (raw & 0xFFFF) as u16,
        }
    }
}

impl fmt::Display for PropertyTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}{:04X}", self.id, self.value_type)
    }
}

fn parse_hex(field: &str) -> Option<u16> {
    if !field.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(field, 16).ok()
}
