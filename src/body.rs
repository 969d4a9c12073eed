//! Body candidate validation and selection
//!
//! Producers store the message body under many property ids, and some of
//! those ids also carry binary identifiers or leaked directory-service
//! addresses. Every candidate is cleaned and screened here; the longest
//! survivor of each kind becomes the final body.

use crate::route::BodyKind;
use crate::types::Message;
use tracing::trace;

/// Minimum trimmed length of an accepted candidate
pub const MIN_BODY_LEN: usize = 10;

/// Body text used when no candidate survived
pub const NO_CONTENT: &str = "No content available";

/// Maximum share of characters outside letters, digits, whitespace and
/// [`ALLOWED_PUNCTUATION`]
const MAX_SYMBOL_RATIO: f64 = 0.4;

/// Replacement characters always tolerated regardless of length
const REPLACEMENT_FLOOR: usize = 2;

const ALLOWED_PUNCTUATION: &str = ",.;:!?()[]{}-_'\"/@#%&$*";

/// Clean a body candidate and decide whether to keep it.
///
/// Returns the text with non-printable characters removed, or `None` when
/// the candidate is too short, looks like an X.500 address, is dominated by
/// symbols, or carries too many replacement characters.
#[must_use]
pub fn clean_body_candidate(input: &str, min_len: usize) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.chars().count() < min_len {
        trace!("Body candidate rejected: too short");
        return None;
    }

    // Exchange legacy DN, e.g. "/O=ORG/OU=EXCHANGE/CN=RECIPIENTS/CN=USER"
    if trimmed.contains("/O=") && trimmed.contains("/CN=") {
        trace!("Body candidate rejected: directory address");
        return None;
    }

    let mut cleaned = String::with_capacity(trimmed.len());
    let mut total = 0usize;
    let mut symbols = 0usize;
    for c in trimmed.chars() {
        if !(is_printable(c) || matches!(c, '\n' | '\r' | '\t')) {
            continue;
        }
        cleaned.push(c);
        total += 1;
        if !(c.is_alphabetic()
            || c.is_numeric()
            || c.is_whitespace()
            || ALLOWED_PUNCTUATION.contains(c))
        {
            symbols += 1;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let symbol_ratio = symbols as f64 / total.max(1) as f64;
    if total == 0 || symbol_ratio > MAX_SYMBOL_RATIO {
        trace!("Body candidate rejected: {symbols}/{total} symbols");
        return None;
    }

    let replacements = cleaned
        .chars()
        .filter(|&c| c == char::REPLACEMENT_CHARACTER)
        .count();
    if replacements > replacement_allowance(total) && replacements > REPLACEMENT_FLOOR {
        trace!("Body candidate rejected: {replacements} replacement characters");
        return None;
    }

    Some(cleaned)
}

/// 20% below 50 characters, 10% below 500, 5% beyond
const fn replacement_allowance(len: usize) -> usize {
    if len < 50 {
        len / 5
    } else if len < 500 {
        len / 10
    } else {
        len / 20
    }
}

/// Printable in the sense of letters, marks, numbers, punctuation, symbols
/// and the ASCII space. Other whitespace, controls, format characters and
/// private-use code points are not.
fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    if c.is_control() || c.is_whitespace() {
        return false;
    }
    !matches!(
        c,
        '\u{00AD}'
            | '\u{061C}'
            | '\u{180E}'
            | '\u{200B}'..='\u{200F}'
            | '\u{202A}'..='\u{202E}'
            | '\u{2060}'..='\u{206F}'
            | '\u{FEFF}'
            | '\u{FFF9}'..='\u{FFFB}'
            | '\u{E000}'..='\u{F8FF}'
            | '\u{F0000}'..='\u{10FFFF}'
    )
}

/// Longest entry by character count; ties keep the earliest
fn longest(candidates: &[String]) -> Option<&String> {
    let mut best: Option<(&String, usize)> = None;
    for candidate in candidates {
        let len = candidate.chars().count();
        if best.is_none_or(|(_, best_len)| len > best_len) {
            best = Some((candidate, len));
        }
    }
    best.map(|(candidate, _)| candidate)
}

impl Message {
    /// Validate `text` and queue it as a body candidate
    pub fn add_body_candidate(&mut self, kind: BodyKind, text: &str, min_len: usize) -> bool {
        let Some(cleaned) = clean_body_candidate(text, min_len) else {
            return false;
        };
        match kind {
            BodyKind::Plain => self.body_candidates.push(cleaned),
            BodyKind::Html => self.html_candidates.push(cleaned),
        }
        true
    }

    /// Pending plain-text candidates
    #[must_use]
    pub fn body_candidates(&self) -> &[String] {
        &self.body_candidates
    }

    /// Pending HTML candidates
    #[must_use]
    pub fn html_candidates(&self) -> &[String] {
        &self.html_candidates
    }

    /// Pick the final bodies from the collected candidates.
    ///
    /// The longest HTML and plain-text candidates win. When only one kind
    /// produced a body it is copied into the other; when neither did, both
    /// are set to [`NO_CONTENT`]. The candidate lists are drained, so a second
    /// call leaves the bodies unchanged.
    pub fn finalize_body(&mut self) {
        let html = std::mem::take(&mut self.html_candidates);
        let plain = std::mem::take(&mut self.body_candidates);

        if let Some(best) = longest(&html) {
            self.body_html.clone_from(best);
        }
        if let Some(best) = longest(&plain) {
            self.body_plain_text.clone_from(best);
        }

        if self.body_html.is_empty() && !self.body_plain_text.is_empty() {
            self.body_html.clone_from(&self.body_plain_text);
        }
        if self.body_plain_text.is_empty() && !self.body_html.is_empty() {
            self.body_plain_text.clone_from(&self.body_html);
        }
        if self.body_plain_text.is_empty() && self.body_html.is_empty() {
            self.body_plain_text = NO_CONTENT.to_string();
            self.body_html = NO_CONTENT.to_string();
        }
    }
}
