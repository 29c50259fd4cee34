// Allow dead code: the worker stores the chapters index as opaque bytes;
// these types document the payload shape and back the UI-facing surface.
#![allow(dead_code)]

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatedName {
    pub language_name: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    pub id: u32,
    pub revelation_place: Option<String>,
    pub revelation_order: Option<u32>,
    #[serde(default)]
    pub bismillah_pre: bool,
    pub name_simple: String,
    pub name_complex: Option<String>,
    pub name_arabic: Option<String>,
    pub verses_count: u32,
    #[serde(default)]
    pub pages: Vec<u32>,
    pub translated_name: Option<TranslatedName>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChaptersResponse {
    pub chapters: Vec<Chapter>,
}
