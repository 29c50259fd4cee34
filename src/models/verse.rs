use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordText {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Word {
    pub id: Option<u64>,
    pub position: Option<u32>,
    pub audio_url: Option<String>,
    pub char_type_name: Option<String>,
    pub text_uthmani: Option<String>,
    pub translation: Option<WordText>,
    pub transliteration: Option<WordText>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerseTranslation {
    pub id: Option<u64>,
    pub resource_id: Option<u64>,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerseAudio {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verse {
    pub id: u64,
    /// "chapter:verse", e.g. "18:3".
    pub verse_key: String,
    #[serde(default)]
    pub words: Vec<Word>,
    pub translations: Option<Vec<VerseTranslation>>,
    pub audio: Option<VerseAudio>,
}

/// Audio file naming scheme per recitation (qari). Unknown ids fall back
/// to Alafasy, the reader's default narrator.
fn recitation_path(recitation_id: u32) -> &'static str {
    match recitation_id {
        1 => "AbdulBaset/Mujawwad",
        _ => "Alafasy",
    }
}

impl Verse {
    /// Resolve this verse's audio pointer to an absolute URL.
    ///
    /// The API usually returns a path relative to the audio host
    /// (`Alafasy/mp3/018003.mp3`); an already-absolute URL is used verbatim.
    /// Returns `None` when the verse carries no audio pointer.
    pub fn audio_url(&self, audio_base: &str) -> Option<String> {
        let raw = self.audio.as_ref().map(|a| a.url.as_str())?;
        if raw.is_empty() {
            return None;
        }
        if raw.starts_with("http") {
            Some(raw.to_string())
        } else {
            Some(format!(
                "{}/{}",
                audio_base.trim_end_matches('/'),
                raw.trim_start_matches('/')
            ))
        }
    }

    /// Like `audio_url`, but when the verse carries no audio pointer the URL
    /// is constructed from the verse key using the recitation's naming
    /// scheme: `{qari}/mp3/{chapter:3}{verse:3}.mp3`, so "18:3" becomes
    /// `Alafasy/mp3/018003.mp3`.
    pub fn resolve_audio_url(&self, audio_base: &str, recitation_id: u32) -> Option<String> {
        if let Some(url) = self.audio_url(audio_base) {
            return Some(url);
        }
        self.constructed_audio_url(audio_base, recitation_id)
    }

    fn constructed_audio_url(&self, audio_base: &str, recitation_id: u32) -> Option<String> {
        let (chapter, verse) = self.verse_key.split_once(':')?;
        let chapter: u32 = chapter.parse().ok()?;
        let verse: u32 = verse.parse().ok()?;
        Some(format!(
            "{}/{}/mp3/{:03}{:03}.mp3",
            audio_base.trim_end_matches('/'),
            recitation_path(recitation_id),
            chapter,
            verse
        ))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub per_page: u32,
    pub current_page: u32,
    pub next_page: Option<u32>,
    pub total_pages: u32,
    pub total_records: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersesResponse {
    pub verses: Vec<Verse>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verse_with_audio(url: &str) -> Verse {
        Verse {
            id: 1,
            verse_key: "18:1".to_string(),
            words: Vec::new(),
            translations: None,
            audio: Some(VerseAudio {
                url: url.to_string(),
            }),
        }
    }

    #[test]
    fn test_relative_audio_url_gets_base_prefix() {
        let verse = verse_with_audio("Alafasy/mp3/018001.mp3");
        assert_eq!(
            verse.audio_url("https://verses.quran.com/"),
            Some("https://verses.quran.com/Alafasy/mp3/018001.mp3".to_string())
        );
    }

    #[test]
    fn test_absolute_audio_url_used_verbatim() {
        let verse = verse_with_audio("https://audio.quran.com/Alafasy/mp3/018001.mp3");
        assert_eq!(
            verse.audio_url("https://verses.quran.com/"),
            Some("https://audio.quran.com/Alafasy/mp3/018001.mp3".to_string())
        );
    }

    #[test]
    fn test_missing_audio_yields_none() {
        let verse = Verse {
            id: 1,
            verse_key: "18:1".to_string(),
            words: Vec::new(),
            translations: None,
            audio: None,
        };
        assert_eq!(verse.audio_url("https://verses.quran.com/"), None);
    }

    fn verse_without_audio(key: &str) -> Verse {
        Verse {
            id: 1,
            verse_key: key.to_string(),
            words: Vec::new(),
            translations: None,
            audio: None,
        }
    }

    #[test]
    fn test_resolve_prefers_the_verse_audio_pointer() {
        let verse = verse_with_audio("Alafasy/mp3/018001.mp3");
        assert_eq!(
            verse.resolve_audio_url("https://verses.quran.com/", 1),
            Some("https://verses.quran.com/Alafasy/mp3/018001.mp3".to_string())
        );
    }

    #[test]
    fn test_resolve_constructs_zero_padded_path_without_pointer() {
        let verse = verse_without_audio("56:48");
        assert_eq!(
            verse.resolve_audio_url("https://verses.quran.com/", 7),
            Some("https://verses.quran.com/Alafasy/mp3/056048.mp3".to_string())
        );
    }

    #[test]
    fn test_resolve_uses_recitation_name_table() {
        let verse = verse_without_audio("18:3");
        assert_eq!(
            verse.resolve_audio_url("https://verses.quran.com/", 1),
            Some("https://verses.quran.com/AbdulBaset/Mujawwad/mp3/018003.mp3".to_string())
        );
        // Unknown qari ids fall back to the default narrator.
        assert_eq!(
            verse.resolve_audio_url("https://verses.quran.com/", 99),
            Some("https://verses.quran.com/Alafasy/mp3/018003.mp3".to_string())
        );
    }

    #[test]
    fn test_resolve_with_malformed_verse_key_yields_none() {
        assert_eq!(
            verse_without_audio("not-a-key").resolve_audio_url("https://verses.quran.com/", 7),
            None
        );
        assert_eq!(
            verse_without_audio("18").resolve_audio_url("https://verses.quran.com/", 7),
            None
        );
    }

    #[test]
    fn test_parse_verses_page_with_pagination() {
        let json = r#"{
            "verses": [{
                "id": 2230,
                "verse_key": "18:1",
                "words": [{
                    "id": 1,
                    "position": 1,
                    "audio_url": null,
                    "char_type_name": "word",
                    "text_uthmani": "ٱلْحَمْدُ",
                    "translation": {"text": "segala puji"},
                    "transliteration": {"text": "al-hamdu"}
                }],
                "translations": [{"id": 1, "resource_id": 33, "text": "Segala puji bagi Allah"}],
                "audio": {"url": "Alafasy/mp3/018001.mp3"}
            }],
            "pagination": {
                "per_page": 50,
                "current_page": 1,
                "next_page": 2,
                "total_pages": 3,
                "total_records": 110
            }
        }"#;
        let page: VersesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(page.verses.len(), 1);
        assert_eq!(page.pagination.next_page, Some(2));
        assert_eq!(page.pagination.total_pages, 3);
        assert_eq!(
            page.verses[0].words[0].text_uthmani.as_deref(),
            Some("ٱلْحَمْدُ")
        );
    }

    #[test]
    fn test_parse_last_page_has_null_next_page() {
        let json = r#"{
            "verses": [],
            "pagination": {
                "per_page": 50,
                "current_page": 3,
                "next_page": null,
                "total_pages": 3,
                "total_records": 110
            }
        }"#;
        let page: VersesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(page.pagination.next_page, None);
    }
}
