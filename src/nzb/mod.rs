//! NZB document model and its XML to JSON conversion
//!
//! Decoding is charset-aware ([`charset`]) and builds an [`Nzb`] tree
//! ([`decode`]). Re-encoding goes through an explicit shape transform
//! ([`shape`]) that flattens the XML wrapper elements into bare arrays.

pub mod charset;
mod decode;
mod model;
pub mod schema;
pub mod shape;

pub use decode::decode;
pub use model::{Group, Groups, Head, Meta, Nzb, NzbFile, Segment, Segments};

use crate::error::Result;

/// Decode raw NZB bytes and re-encode them as indented JSON.
pub fn nzb_to_json(data: &[u8]) -> Result<String> {
    let nzb = Nzb::from_bytes(data)?;
    Ok(nzb.to_json()?)
}
