//! Domain-specific error types for newznab
//!
//! Every failure is returned to the immediate caller. Nothing in the library
//! logs or swallows an error; the binary reports it once and exits.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the newznab client
#[derive(Error, Debug)]
pub enum NewznabError {
    #[error("NZB decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("JSON encode error: {0}")]
    Encode(#[from] EncodeError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// NZB decoding errors
///
/// A failed decode never yields a partial document.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("malformed XML at byte {position}: {source}")]
    Xml {
        position: u64,
        source: quick_xml::Error,
    },

    #[error("malformed attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("unsupported character encoding: {0}")]
    UnsupportedCharset(String),

    #[error("input is not valid {encoding}")]
    Transcode { encoding: &'static str },

    #[error("document has no root element")]
    MissingRoot,

    #[error("unexpected <{element}> inside {parent}")]
    UnexpectedElement { element: String, parent: String },

    #[error("document ended before </{0}>")]
    UnclosedElement(String),
}

/// JSON re-encoding errors
#[derive(Error, Debug)]
#[error("failed to serialize NZB as JSON: {0}")]
pub struct EncodeError(#[from] serde_json::Error);

/// HTTP transport errors
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server responded {0}")]
    Status(String),

    #[error("response body is not valid text in its declared encoding")]
    Body,
}

/// Query construction errors
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("invalid base URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("incorrect number of query parameters: {0} (expected key/value pairs)")]
    OddParameterCount(usize),
}

/// Configuration validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {field}: {reason}")]
    Invalid { field: String, reason: String },

    #[error("Server URL not configured")]
    NoServer,

    #[error("API key not configured")]
    NoApiKey,
}

/// Result type alias using NewznabError
pub type Result<T> = std::result::Result<T, NewznabError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DecodeError::UnexpectedElement {
            element: "group".to_string(),
            parent: "<file>".to_string(),
        };
        assert_eq!(err.to_string(), "unexpected <group> inside <file>");

        let err = QueryError::OddParameterCount(3);
        assert!(err.to_string().contains("3"));
    }

    #[test]
    fn test_error_conversion() {
        let err: NewznabError = DecodeError::MissingRoot.into();
        assert!(matches!(err, NewznabError::Decode(DecodeError::MissingRoot)));

        let err: NewznabError = TransportError::Status("404 Not Found".to_string()).into();
        assert_eq!(err.to_string(), "Transport error: server responded 404 Not Found");
    }
}
