use serde::Serialize;

use crate::language::{Language, LanguageMode, TextDirection};

/// Everything the widget renders. Lives only as long as its session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetState {
    pub input_text: String,
    pub char_limit: usize,
    pub language_mode: LanguageMode,
    pub selected_language: Language,
    pub target_language: Language,
    pub translated_text: Option<String>,
    pub error_message: Option<String>,
    pub direction: TextDirection,
    pub direction_overridden: bool,
    /// Highest edit revision received from the client; lets the client tell
    /// an echo of an older edit from one that has caught up
    pub input_revision: u64,
    /// True while the most recent network request is outstanding
    pub pending: bool,
    /// Sequence number of the most recent network request
    pub request_seq: u64,
}

impl WidgetState {
    pub fn new(char_limit: usize, target_language: Language) -> Self {
        Self {
            input_text: String::new(),
            char_limit,
            language_mode: LanguageMode::Detect,
            selected_language: Language::En,
            target_language,
            translated_text: None,
            error_message: None,
            direction: TextDirection::Ltr,
            direction_overridden: false,
            input_revision: 0,
            pending: false,
            request_seq: 0,
        }
    }

    /// Input length in UTF-16 code units, the unit the limit is expressed in
    pub fn input_len(&self) -> usize {
        text_len(&self.input_text)
    }

    /// Source language to pin on the next request, if any
    pub fn request_source(&self) -> Option<Language> {
        match self.language_mode {
            LanguageMode::Select => Some(self.selected_language),
            LanguageMode::Detect => None,
        }
    }

    /// Apply an automatically derived direction unless the user pinned one
    pub(crate) fn apply_auto_direction(&mut self, direction: TextDirection) {
        if !self.direction_overridden {
            self.direction = direction;
        }
    }
}

pub fn text_len(text: &str) -> usize {
    text.encode_utf16().count()
}
