//! Moodify
//!
//! Mood-to-music recommender: infers a mood from a face photo (or takes one
//! chosen by the user) and maps it to streaming playlists for a language
//! preference.

pub mod catalog;
pub mod classifier;
pub mod config;
pub mod error;
pub mod mood;
pub mod playlist;
pub mod recommend;
pub mod server;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, Result};

pub use mood::{resolve, Emotion, EmotionScoreSet, MoodResult, MoodSource};
pub use playlist::{Language, PlaylistEntry, PlaylistSelector, Selection};
pub use recommend::{MoodInput, Recommendation, Recommender};
