//! Mood + language to catalog query string.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Genre used for moods without a table entry
pub const DEFAULT_GENRE: &str = "chill";

/// Query used for a neutral mood with Indonesian preference
pub const INDONESIA_NEUTRAL_QUERY: &str = "relax indonesia";

/// Static mood -> genre keyword table
pub const MOOD_GENRES: &[(&str, &str)] = &[
    ("happy", "pop"),
    ("sad", "acoustic"),
    ("angry", "rock"),
    ("surprised", "dance"),
    ("neutral", "chill"),
    ("fear", "ambient"),
    ("disgust", "metal"),
];

/// Regional music preference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Indonesia,
    Korea,
    Japan,
    Mandarin,
}

pub const ALL_LANGUAGES: [Language; 5] = [
    Language::English,
    Language::Indonesia,
    Language::Korea,
    Language::Japan,
    Language::Mandarin,
];

impl Language {
    /// Case-sensitive parse; anything unrecognized behaves like English
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Indonesia => "Indonesia",
            Language::Korea => "Korea",
            Language::Japan => "Japan",
            Language::Mandarin => "Mandarin",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "English" => Ok(Language::English),
            "Indonesia" => Ok(Language::Indonesia),
            "Korea" => Ok(Language::Korea),
            "Japan" => Ok(Language::Japan),
            "Mandarin" => Ok(Language::Mandarin),
            other => Err(format!("Unknown language: {other}")),
        }
    }
}

/// Genre keyword for a mood label, `chill` when unmapped
pub fn genre_for(mood: &str) -> &'static str {
    MOOD_GENRES
        .iter()
        .find(|(m, _)| *m == mood)
        .map(|(_, genre)| *genre)
        .unwrap_or(DEFAULT_GENRE)
}

/// Build the catalog search query for a mood and language
pub fn build_query(mood: &str, language: Language) -> String {
    let genre = genre_for(mood);

    match language {
        Language::Indonesia if mood == "neutral" => INDONESIA_NEUTRAL_QUERY.to_string(),
        Language::Indonesia => format!("{genre} indonesia"),
        Language::Korea => format!("{genre} k-pop"),
        Language::Japan => format!("{genre} j-pop"),
        Language::Mandarin => format!("{genre} mandarin"),
        Language::English => genre.to_string(),
    }
}
