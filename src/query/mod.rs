//! Query construction for Newznab requests
//!
//! Parameters are plain name/value pairs built by the constructors in
//! [`param`]; [`encode_url`] turns a base URL and a parameter list into a
//! request URL.

mod category;
pub mod param;
mod url;

pub use category::Category;
pub use param::Param;
pub use url::{encode_url, encode_url_pairs, redact_api_key};
