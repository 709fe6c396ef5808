//! newznab - Newznab indexer client and NZB to JSON converter
//!
//! This library talks to Newznab-compatible Usenet indexers and turns the NZB
//! documents they serve into JSON.
//!
//! # Features
//!
//! - Typed query parameters and the standard category table
//! - Async search, caps and NZB download over a pluggable transport
//! - Charset-aware NZB decoding (UTF-8, ISO-8859-1, windows-1252, ...)
//! - Deterministic JSON output with flattened group and segment lists
//!
//! # Example
//!
//! ```no_run
//! use newznab::{config::Config, query::param, NewznabClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(None)?;
//!     let client = NewznabClient::from_config(&config.server)?;
//!     let results = client.search(&[param::query("ubuntu"), param::limit(10)]).await?;
//!     println!("{}", results);
//!     Ok(())
//! }
//! ```
//!
//! Converting a document without any network access:
//!
//! ```
//! let xml = br#"<nzb><file poster="p" date="1" subject="s">
//!   <groups><group>alt.binaries.test</group></groups>
//!   <segments><segment bytes="10" number="1">id@host</segment></segments>
//! </file></nzb>"#;
//! let json = newznab::nzb_to_json(xml).unwrap();
//! assert!(json.contains(r#""name": "id@host""#));
//! ```

// Core modules
pub mod cli;
pub mod config;
pub mod error;

// Feature modules organized by functionality
pub mod client;
pub mod nzb;
pub mod query;

// Re-export commonly used types
pub use client::{HttpTransport, NewznabClient, Transport};
pub use config::Config;
pub use error::{DecodeError, EncodeError, NewznabError, QueryError, Result, TransportError};
pub use nzb::{nzb_to_json, Nzb};
pub use query::{encode_url, param, Category, Param};
