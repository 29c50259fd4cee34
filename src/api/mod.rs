//! Upstream API surface: endpoint URL construction and the fetch-error
//! taxonomy.
//!
//! The verse page URLs built here double as cache keys, so the precache
//! loader and the runtime interceptor agree on request identity.

pub mod error;
pub mod urls;

pub use error::FetchError;
