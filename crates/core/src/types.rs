use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::CaptionError;

/// Output of a speech recognition engine for one media file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecognitionResult {
    #[serde(default)]
    pub text: String,
    pub segments: Vec<Segment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl RecognitionResult {
    /// End of the last segment, in seconds.
    pub fn duration(&self) -> f64 {
        self.segments.last().map(|s| s.end).unwrap_or(0.0)
    }

    pub fn has_word_timestamps(&self) -> bool {
        !self.segments.is_empty() && self.segments.iter().all(|s| s.words.is_some())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<Word>>,
}

impl Segment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
            words: None,
        }
    }

    pub fn with_words(mut self, words: Vec<Word>) -> Self {
        self.words = Some(words);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Whisper's JSON writer calls this field `word` and keeps the leading space.
    #[serde(alias = "word")]
    pub text: String,
    pub start: f64,
    pub end: f64,
}

impl Word {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }

    /// Text as shown on screen, without the engine's surrounding whitespace.
    pub fn display_text(&self) -> &str {
        self.text.trim()
    }

    /// Width of the word in characters, as counted by the line packer.
    pub fn char_len(&self) -> usize {
        self.display_text().chars().count()
    }
}

/// Consecutive words shown together on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayLine {
    pub words: Vec<Word>,
}

impl DisplayLine {
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(Word::display_text)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Character count of the line with single-space separators.
    pub fn char_len(&self) -> usize {
        let words: usize = self.words.iter().map(Word::char_len).sum();
        words + self.words.len().saturating_sub(1)
    }

    pub fn start(&self) -> f64 {
        self.words.first().map(|w| w.start).unwrap_or(0.0)
    }

    pub fn end(&self) -> f64 {
        self.words.last().map(|w| w.end).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Format {
    Plain,
    Srt,
    Vtt,
    Ass,
}

impl Format {
    pub const ALL: [Format; 4] = [Format::Plain, Format::Srt, Format::Vtt, Format::Ass];

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Plain => "plain",
            Format::Srt => "srt",
            Format::Vtt => "vtt",
            Format::Ass => "ass",
        }
    }

    /// File extension used when a document is written to disk.
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Plain => "txt",
            Format::Srt => "srt",
            Format::Vtt => "vtt",
            Format::Ass => "ass",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = CaptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" | "txt" | "text" => Ok(Format::Plain),
            "srt" => Ok(Format::Srt),
            "vtt" | "webvtt" => Ok(Format::Vtt),
            "ass" => Ok(Format::Ass),
            other => Err(CaptionError::InvalidConfiguration {
                reason: format!("unknown output format '{other}'"),
            }),
        }
    }
}

impl TryFrom<String> for Format {
    type Error = CaptionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A rendered subtitle document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleDocument {
    pub format: Format,
    pub body: String,
}

impl SubtitleDocument {
    pub fn new(format: Format, body: String) -> Self {
        Self { format, body }
    }
}
