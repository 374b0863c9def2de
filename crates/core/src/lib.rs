//! Captionist Core Library
//!
//! Turns time-aligned speech transcripts into plain text, SRT, WebVTT and ASS
//! subtitles, and hosts the transcode → recognize → render pipeline around it.

pub mod artifacts;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod highlight;
pub mod jobs;
pub mod layout;
pub mod media;
pub mod paths;
pub mod pipeline;
pub mod style;
pub mod synthesize;
pub mod timecode;
pub mod types;

// Re-export commonly used items at crate root
pub use artifacts::{ArtifactSet, DocumentOutput};
pub use config::{EngineKind, Settings};
pub use engine::{RecognitionEngine, RecognitionOptions, TranscriptFileEngine, WhisperCliEngine};
pub use error::{CaptionError, Result};
pub use format::RenderOptions;
pub use highlight::{HighlightInterval, compute_highlight_intervals};
pub use jobs::{FileJobStore, JobState, JobStore, MemoryJobStore};
pub use layout::{DEFAULT_MAX_CHARS, pack_lines, wrap_text};
pub use pipeline::{Delivery, JobReport, JobRequest, Pipeline, deliver};
pub use style::{AssColor, HighlightMode, Position, StyleSettings};
pub use synthesize::{Synthesis, synthesize};
pub use timecode::{TimeStyle, format_time, format_timestamp};
pub use types::{DisplayLine, Format, RecognitionResult, Segment, SubtitleDocument, Word};
