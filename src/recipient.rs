//! Recipient routing
//!
//! Recipients live in storages named `__recip_version1.0_#<ordinal>`. The
//! decoder remembers the last ordinal it walked through and uses it to route
//! subsequent address properties into the To, Cc or Bcc list.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// Prefix of every recipient storage name
pub const RECIPIENT_STORAGE_PREFIX: &str = "__recip_version1.0_";

/// Addresses longer than this are never accepted
pub const MAX_EMAIL_LEN: usize = 60;

static EMAIL_REGEX: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9-]+(\.[a-zA-Z0-9-]+)*\.[a-zA-Z]{2,}$").unwrap()
});

/// Recipient list an address is routed to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RecipientSlot {
    To,
    Cc,
    Bcc,
}

impl fmt::Display for RecipientSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::To => write!(f, "To"),
            Self::Cc => write!(f, "Cc"),
            Self::Bcc => write!(f, "Bcc"),
        }
    }
}

/// Cursor over the recipient storages seen so far.
///
/// Starts at zero. Ordinal zero never moves the cursor, so the first
/// recipient storage leaves routing on the To list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecipientState {
    ordinal: u32,
}

impl RecipientState {
    #[must_use]
    pub const fn new() -> Self {
        Self { ordinal: 0 }
    }

    #[must_use]
    pub const fn ordinal(&self) -> u32 {
        self.ordinal
    }

    /// Record an ordinal parsed from a recipient storage name
    pub const fn update(&mut self, ordinal: u32) {
        if ordinal != 0 {
            self.ordinal = ordinal;
        }
    }

    /// Update the cursor from the structural path of a container entry.
    ///
    /// Entries outside a recipient storage, and storages whose ordinal is
    /// not a decimal number, leave the cursor untouched.
    pub fn observe(&mut self, path: &[String]) {
        let Some(storage) = path.first() else {
            return;
        };
        let Some(ordinal) = parse_recipient_ordinal(storage) else {
            return;
        };
        trace!("Recipient storage {storage} -> ordinal {ordinal}");
        self.update(ordinal);
    }

    /// List that address properties are currently routed to
    #[must_use]
    pub const fn slot(&self) -> Option<RecipientSlot> {
        match self.ordinal {
            0 => Some(RecipientSlot::To),
            1 => Some(RecipientSlot::Cc),
            2 => Some(RecipientSlot::Bcc),
            _ => None,
        }
    }
}

/// Ordinal suffix of a recipient storage name (`__recip_version1.0_#00000002` -> 2)
#[must_use]
pub fn parse_recipient_ordinal(storage: &str) -> Option<u32> {
    let start = storage.find(RECIPIENT_STORAGE_PREFIX)?;
    let suffix = &storage[start + RECIPIENT_STORAGE_PREFIX.len()..];
    let digits = suffix.strip_prefix('#').unwrap_or(suffix);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Check that a value looks like a plain SMTP address
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    email.len() <= MAX_EMAIL_LEN && EMAIL_REGEX.is_match(email)
}

/// Check a comma-separated list of addresses; every entry must be valid
#[must_use]
pub fn validate_email_list(list: &str) -> bool {
    list.split(',').map(str::trim).all(is_valid_email)
}
