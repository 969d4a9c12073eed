//! Decoded message record

use crate::value::PropertyValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A message decoded from an Outlook `.msg` file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Message class, e.g. `IPM.Note`
    pub message_class: String,

    /// Internet Message-ID
    pub message_id: String,

    /// Subject line
    pub subject: String,

    /// Sender addresses, comma separated
    pub from_email: String,

    /// Sender display name
    pub from_name: String,

    /// Display names of the To recipients, as stored by the producer
    pub to_display: String,

    /// Display names of the Cc recipients
    pub cc_display: String,

    /// Display names of the Bcc recipients
    pub bcc_display: String,

    /// To addresses, each followed by `"; "`
    pub to: String,

    /// Cc addresses, each followed by `"; "`
    pub cc: String,

    /// Bcc addresses, each followed by `"; "`
    pub bcc: String,

    /// Every valid recipient address in container order
    pub addresses: Vec<String>,

    /// Plain-text body
    pub body_plain_text: String,

    /// HTML body
    pub body_html: String,

    /// Raw transport headers (not parsed)
    pub transport_message_headers: String,

    /// Delivery time
    pub date: Option<DateTime<Utc>>,

    pub client_submit_time: Option<DateTime<Utc>>,

    pub creation_date: Option<DateTime<Utc>>,

    pub last_modification_date: Option<DateTime<Utc>>,

    /// Properties without a dedicated field, keyed by property id
    pub properties: BTreeMap<u16, PropertyValue>,

    #[serde(skip)]
    pub(crate) body_candidates: Vec<String>,

    #[serde(skip)]
    pub(crate) html_candidates: Vec<String>,
}

impl Message {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the best available text content
    #[must_use]
    pub fn best_text(&self) -> &str {
        if self.body_plain_text.is_empty() {
            &self.body_html
        } else {
            &self.body_plain_text
        }
    }

    /// Look up a property kept in the generic map
    #[must_use]
    pub fn property(&self, id: u16) -> Option<&PropertyValue> {
        self.properties.get(&id)
    }
}
