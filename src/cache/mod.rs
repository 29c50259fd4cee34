//! Durable cache stores for offline serving.
//!
//! Two stores exist concurrently: one for static application assets and one
//! for scripture data and audio. A store's name carries a generation tag
//! (`pwa-cache-v2`, `quran-cache-v1`); bumping the tag and deleting stale
//! generations on activation is the only migration mechanism.

pub mod lifecycle;
pub mod store;

pub use store::CacheStore;
