//! Speech recognition engines.
//!
//! The synthesis core only sees a [`RecognitionResult`]; these adapters are
//! how the CLI obtains one.

pub mod transcript_file;
pub mod whisper_cli;
#[cfg(feature = "whisper")]
pub mod whisper_rs;

use std::path::Path;

use async_trait::async_trait;

use crate::{error::Result, types::RecognitionResult};

pub use transcript_file::TranscriptFileEngine;
pub use whisper_cli::WhisperCliEngine;
#[cfg(feature = "whisper")]
pub use whisper_rs::WhisperRsEngine;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecognitionOptions {
    /// Passed to the engine untouched.
    pub language: Option<String>,
    pub word_timestamps: bool,
}

#[async_trait]
pub trait RecognitionEngine: Send + Sync {
    fn name(&self) -> &'static str;

    async fn transcribe(
        &self,
        audio: &Path,
        options: &RecognitionOptions,
    ) -> Result<RecognitionResult>;
}
