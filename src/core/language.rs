//! # Language Selection
//!
//! The widget speaks four languages. The selection drives three things:
//! the `language` field sent with every chat request, the locale handed to
//! speech recognition, and the direction the composer is laid out in.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
    Fr,
    Es,
}

impl Language {
    pub const ALL: [Language; 4] = [Language::En, Language::Ar, Language::Fr, Language::Es];

    /// Wire code, as sent in the `language` request field.
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
            Language::Fr => "fr",
            Language::Es => "es",
        }
    }

    /// BCP 47 locale used for speech recognition.
    pub fn locale(self) -> &'static str {
        match self {
            Language::En => "en-US",
            Language::Ar => "ar-AE",
            Language::Fr => "fr-FR",
            Language::Es => "es-ES",
        }
    }

    pub fn is_rtl(self) -> bool {
        matches!(self, Language::Ar)
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Language::Ar => "أكتب رسالتك...",
            _ => "Type your message...",
        }
    }

    /// Cycle to the next language (for the Ctrl+L toggle).
    pub fn next(self) -> Self {
        match self {
            Language::En => Language::Ar,
            Language::Ar => Language::Fr,
            Language::Fr => Language::Es,
            Language::Es => Language::En,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Language::En => "EN",
            Language::Ar => "AR",
            Language::Fr => "FR",
            Language::Es => "ES",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLanguage(pub String);

impl fmt::Display for UnknownLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown language '{}' (expected en, ar, fr or es)", self.0)
    }
}

impl std::error::Error for UnknownLanguage {}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.code() == code)
            .ok_or(UnknownLanguage(s.to_string()))
    }
}

/// True if the text contains Arabic script (U+0600..=U+06FF).
/// Such messages render right-to-left regardless of the selected language.
pub fn contains_arabic(text: &str) -> bool {
    text.chars().any(|c| ('\u{0600}'..='\u{06FF}').contains(&c))
}
