//! Newznab HTTP client
//!
//! [`NewznabClient`] builds request URLs and hands them to a [`Transport`].
//! The default transport is reqwest; anything implementing the trait can
//! stand in for it.

mod newznab;
mod transport;

pub use newznab::NewznabClient;
pub use transport::{HttpTransport, Transport};
