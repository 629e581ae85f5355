use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::WidgetError;

/// Languages offered in the source language picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
    Fr,
    De,
    Ar,
    Zh,
    He,
}

impl Language {
    pub const ALL: [Language; 7] = [
        Language::En,
        Language::Es,
        Language::Fr,
        Language::De,
        Language::Ar,
        Language::Zh,
        Language::He,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::De => "de",
            Language::Ar => "ar",
            Language::Zh => "zh",
            Language::He => "he",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Es => "Spanish",
            Language::Fr => "French",
            Language::De => "German",
            Language::Ar => "Arabic",
            Language::Zh => "Chinese",
            Language::He => "Hebrew",
        }
    }

    pub fn is_rtl(&self) -> bool {
        matches!(self, Language::Ar | Language::He)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = WidgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.code() == code)
            .ok_or_else(|| WidgetError::UnknownLanguage(s.to_string()))
    }
}

/// Whether requests pin the source language or let the service detect it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageMode {
    #[default]
    Detect,
    Select,
}

impl FromStr for LanguageMode {
    type Err = WidgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "detect" => Ok(LanguageMode::Detect),
            "select" => Ok(LanguageMode::Select),
            other => Err(WidgetError::UnknownMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

impl TextDirection {
    /// Direction for a language code as reported by the translation service.
    /// Only Arabic and Hebrew render right-to-left; anything else, including
    /// codes outside the picker, is left-to-right.
    pub fn for_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "ar" | "he" => TextDirection::Rtl,
            _ => TextDirection::Ltr,
        }
    }

    pub fn for_language(language: Language) -> Self {
        if language.is_rtl() {
            TextDirection::Rtl
        } else {
            TextDirection::Ltr
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            TextDirection::Ltr => TextDirection::Rtl,
            TextDirection::Rtl => TextDirection::Ltr,
        }
    }

    pub fn as_attr(&self) -> &'static str {
        match self {
            TextDirection::Ltr => "ltr",
            TextDirection::Rtl => "rtl",
        }
    }
}
