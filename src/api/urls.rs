//! Endpoint URL builders for the Quran.com API.
//!
//! Page 1 of a chapter omits the `page` parameter and subsequent pages
//! append `&page=N`, matching the request URLs the reader issues at runtime.
//! A precached key is only useful if it is byte-identical to the runtime
//! request URL, so the parameter order here is fixed.

use crate::config::WorkerConfig;

/// URL of the chapters index.
pub fn chapters_url(config: &WorkerConfig) -> String {
    format!("{}/chapters?language={}", config.api_base, config.language)
}

/// URL of one page of a chapter's verses, with the fixed verse query:
/// word-level fields enabled, the configured translation, audio pointers,
/// and the configured recitation.
pub fn verses_page_url(config: &WorkerConfig, chapter_id: u32, page: u32) -> String {
    let mut url = format!(
        "{}/verses/by_chapter/{}?language={}&words=true&word_fields=text_uthmani,translation,transliteration&translations={}&audio=1&recitation={}&per_page={}&word_translation_language={}",
        config.api_base,
        chapter_id,
        config.language,
        config.translation_id,
        config.recitation_id,
        config.per_page,
        config.language
    );
    if page > 1 {
        url.push_str(&format!("&page={}", page));
    }
    url
}
