//! Data models for the upstream Quran.com API payloads.
//!
//! This module contains the structures the precache loader parses:
//!
//! - `Chapter`, `ChaptersResponse`: the chapters index
//! - `Verse`, `Word`, `VerseTranslation`: one verse with word-level breakdown
//! - `VersesResponse`, `Pagination`: one page of a chapter's verses

pub mod chapter;
pub mod verse;

pub use chapter::{Chapter, ChaptersResponse, TranslatedName};
pub use verse::{Pagination, Verse, VerseAudio, VerseTranslation, VersesResponse, Word};
