//! Languages and localized text values.
//!
//! Dataset and UI strings are either a plain string shared by every
//! language or a per-language mapping. [`LocalizedText::resolve`] picks the
//! best match for the active language.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Languages the interface ships translations for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    Ru,
    En,
}

impl Lang {
    /// All supported languages in preference order.
    pub const ALL: [Lang; 2] = [Lang::Ru, Lang::En];

    /// Language used when a text has no entry for the active one.
    pub const FALLBACK: Lang = Lang::Ru;

    /// Two-letter code.
    pub fn code(self) -> &'static str {
        match self {
            Lang::Ru => "ru",
            Lang::En => "en",
        }
    }

    /// Parse a two-letter code, case-insensitively.
    pub fn from_code(code: &str) -> Option<Lang> {
        Lang::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(code))
    }

    /// Derive the initial language from a host locale such as `en-US` or
    /// `ru_RU.UTF-8`. Unsupported locales fall back to [`Lang::FALLBACK`].
    pub fn from_locale(locale: &str) -> Lang {
        let prefix: String = locale.chars().take(2).collect();
        Lang::from_code(&prefix).unwrap_or(Lang::FALLBACK)
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A text value that is either shared by all languages or translated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocalizedText {
    Plain(String),
    Localized(BTreeMap<String, String>),
}

impl LocalizedText {
    /// Build a translated text from `(code, text)` pairs.
    pub fn localized<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        LocalizedText::Localized(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    /// Best-match string for `lang`: the exact language, then the fallback
    /// language, then the other supported languages, then any non-empty
    /// entry. Empty entries count as missing.
    pub fn resolve(&self, lang: Lang) -> &str {
        match self {
            LocalizedText::Plain(s) => s,
            LocalizedText::Localized(map) => {
                let lookup = |code: &str| map.get(code).filter(|s| !s.is_empty());
                lookup(lang.code())
                    .or_else(|| lookup(Lang::FALLBACK.code()))
                    .or_else(|| Lang::ALL.iter().find_map(|l| lookup(l.code())))
                    .or_else(|| map.values().find(|s| !s.is_empty()))
                    .map_or("", String::as_str)
            },
        }
    }

    /// Whether the text resolves to nothing in every language.
    pub fn is_blank(&self) -> bool {
        self.resolve(Lang::FALLBACK).is_empty()
    }
}

impl From<&str> for LocalizedText {
    fn from(s: &str) -> Self {
        LocalizedText::Plain(s.to_string())
    }
}

/// Resolve an optional text, treating absence as the empty string.
pub fn resolve_opt(text: Option<&LocalizedText>, lang: Lang) -> &str {
    text.map_or("", |t| t.resolve(lang))
}
