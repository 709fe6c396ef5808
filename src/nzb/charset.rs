//! Character-encoding detection and transcoding.
//!
//! NZB files in the wild are frequently ISO-8859-1 rather than UTF-8. The
//! raw bytes are transcoded to UTF-8 here, before the XML parser sees them.

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use once_cell::sync::Lazy;
use regex::bytes::Regex;
use std::borrow::Cow;

use crate::error::DecodeError;

/// The XML declaration must appear at the very start, so only a short
/// prefix is searched.
const DECLARATION_WINDOW: usize = 1024;

static DECLARED_ENCODING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?-u)\A\s*<\?xml\s[^>]*?\bencoding\s*=\s*["']([A-Za-z0-9._:\-]+)["']"#)
        .expect("encoding declaration pattern is valid")
});

/// The encoding label from `<?xml ... encoding="..."?>`, if any.
pub fn declared_label(input: &[u8]) -> Option<&str> {
    let window = &input[..input.len().min(DECLARATION_WINDOW)];
    let caps = DECLARED_ENCODING.captures(window)?;
    // the pattern only admits ASCII
    std::str::from_utf8(caps.get(1)?.as_bytes()).ok()
}

/// Pick the encoding for `input`: byte-order mark first, then the XML
/// declaration, then UTF-8. Returns the encoding and the BOM length to skip.
pub fn detect(input: &[u8]) -> Result<(&'static Encoding, usize), DecodeError> {
    if let Some(found) = Encoding::for_bom(input) {
        return Ok(found);
    }

    let Some(label) = declared_label(input) else {
        return Ok((UTF_8, 0));
    };

    let encoding = Encoding::for_label(label.as_bytes())
        .ok_or_else(|| DecodeError::UnsupportedCharset(label.to_string()))?;

    // A readable declaration means the bytes are ASCII-compatible, which
    // UTF-16 without a BOM cannot be.
    if encoding == UTF_16LE || encoding == UTF_16BE {
        return Ok((UTF_8, 0));
    }

    Ok((encoding, 0))
}

/// Transcode `input` to UTF-8 according to its detected encoding.
///
/// Malformed byte sequences are an error; nothing is replaced with U+FFFD.
pub fn transcode(input: &[u8]) -> Result<Cow<'_, str>, DecodeError> {
    let (encoding, bom_len) = detect(input)?;
    tracing::trace!(encoding = encoding.name(), "transcoding NZB input");

    encoding
        .decode_without_bom_handling_and_without_replacement(&input[bom_len..])
        .ok_or(DecodeError::Transcode {
            encoding: encoding.name(),
        })
}
