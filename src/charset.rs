//! Single-byte text decoding
//!
//! `PT_STRING8` payloads carry no codepage information of their own. The
//! encoding is guessed by a [`CharsetDetector`] and the bytes are decoded
//! with `encoding_rs`.

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, WINDOWS_1252};
use tracing::debug;

/// Best-guess charset detection for raw single-byte text.
///
/// Implementations return a WHATWG encoding label (`"utf-8"`,
/// `"windows-1252"`, `"shift_jis"`, ...) or `None` when they cannot tell.
pub trait CharsetDetector {
    fn detect(&self, bytes: &[u8]) -> Option<String>;
}

/// Statistical detector backed by `chardetng`.
///
/// A byte-order mark wins outright. Otherwise the whole payload is fed to
/// the detector and its guess is returned; UTF-8 is allowed as a result.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChardetDetector;

impl CharsetDetector for ChardetDetector {
    fn detect(&self, bytes: &[u8]) -> Option<String> {
        if let Some((encoding, _)) = Encoding::for_bom(bytes) {
            return Some(label(encoding));
        }
        let mut detector = EncodingDetector::new();
        detector.feed(bytes, true);
        Some(label(detector.guess(None, true)))
    }
}

/// Detector that recognises byte-order marks and well-formed UTF-8 only.
///
/// Anything else is reported as unknown and decoded as Windows-1252.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8Detector;

impl CharsetDetector for Utf8Detector {
    fn detect(&self, bytes: &[u8]) -> Option<String> {
        if let Some((encoding, _)) = Encoding::for_bom(bytes) {
            return Some(label(encoding));
        }
        std::str::from_utf8(bytes).ok().map(|_| "utf-8".to_string())
    }
}

fn label(encoding: &'static Encoding) -> String {
    encoding.name().to_ascii_lowercase()
}

/// Decode single-byte text using the detector's guess.
///
/// Unknown or unsupported labels fall back to Windows-1252. It maps every
/// byte to a character, so the later ISO-8859-1 and raw UTF-8 fallbacks
/// are never needed.
#[must_use]
pub fn decode_narrow(bytes: &[u8], detector: &dyn CharsetDetector) -> String {
    if let Some(label) = detector.detect(bytes) {
        if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
            let (text, _, _) = encoding.decode(bytes);
            return text.into_owned();
        }
        debug!("Unsupported charset label {label}, using fallback");
    }

    WINDOWS_1252
        .decode_without_bom_handling(bytes)
        .0
        .into_owned()
}
