use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::{
    engine::{RecognitionEngine, RecognitionOptions},
    error::Result,
    types::RecognitionResult,
};

/// Replays a transcript saved earlier, ignoring the audio it is given.
pub struct TranscriptFileEngine {
    path: PathBuf,
}

impl TranscriptFileEngine {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RecognitionEngine for TranscriptFileEngine {
    fn name(&self) -> &'static str {
        "transcript"
    }

    async fn transcribe(
        &self,
        _audio: &Path,
        _options: &RecognitionOptions,
    ) -> Result<RecognitionResult> {
        load_transcript(&self.path).await
    }
}

/// Load a recognition result from a JSON file.
pub async fn load_transcript(path: &Path) -> Result<RecognitionResult> {
    let json_content = fs::read_to_string(path).await?;
    let transcript: RecognitionResult = serde_json::from_str(&json_content)?;
    Ok(transcript)
}

/// Save a recognition result as pretty-printed JSON.
pub async fn save_transcript(transcript: &RecognitionResult, path: &Path) -> Result<()> {
    let pretty_json = serde_json::to_string_pretty(transcript)?;
    fs::write(path, &pretty_json).await?;
    Ok(())
}
