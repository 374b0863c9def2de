use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

use crate::types::Format;

#[derive(Error, Debug)]
pub enum CaptionError {
    #[error("Invalid timestamp {seconds}s{}", at_segment(.segment))]
    InvalidTime {
        seconds: f64,
        segment: Option<usize>,
    },

    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("Word timestamps are missing in segment {segment}")]
    MissingWordTimestamps { segment: usize },

    #[error("Transcript has no timed segments to render")]
    EmptySegments,

    #[error("{format} output failed: {error}")]
    FormatFailure {
        format: Format,
        error: Box<CaptionError>,
    },

    #[error("Media not found: {path}")]
    MediaNotFound { path: PathBuf },

    #[error("Transcoding failed for {media}: {reason}")]
    Transcode { media: PathBuf, reason: String },

    #[error("Recognition failed for {media}: {reason}")]
    Recognition { media: PathBuf, reason: String },

    #[error("Job {job_id} not found")]
    JobNotFound { job_id: Uuid },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigError(#[from] toml::de::Error),
}

fn at_segment(segment: &Option<usize>) -> String {
    match segment {
        Some(index) => format!(" in segment {index}"),
        None => String::new(),
    }
}

impl CaptionError {
    /// Attach the index of the segment being rendered when the error lacks one.
    pub fn in_segment(self, index: usize) -> Self {
        match self {
            CaptionError::InvalidTime {
                seconds,
                segment: None,
            } => CaptionError::InvalidTime {
                seconds,
                segment: Some(index),
            },
            other => other,
        }
    }

    pub fn for_format(self, format: Format) -> Self {
        match self {
            e @ CaptionError::FormatFailure { .. } => e,
            other => CaptionError::FormatFailure {
                format,
                error: Box::new(other),
            },
        }
    }

    pub fn invalid_config(reason: impl Into<String>) -> Self {
        CaptionError::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CaptionError>;
