use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::{fs, process::Command};
use tracing::{debug, warn};

use crate::{
    engine::{RecognitionEngine, RecognitionOptions},
    error::{CaptionError, Result},
    types::RecognitionResult,
};

/// Runs the `whisper` command-line tool and reads its JSON output.
pub struct WhisperCliEngine {
    binary: PathBuf,
    model: String,
    output_dir: PathBuf,
}

impl WhisperCliEngine {
    pub fn new(binary: impl Into<PathBuf>, model: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            model: model.into(),
            output_dir: output_dir.into(),
        }
    }

    fn command(&self, audio: &Path, options: &RecognitionOptions) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .arg(audio)
            .arg("--model")
            .arg(&self.model)
            .arg("--output_format")
            .arg("json")
            .arg("--output_dir")
            .arg(&self.output_dir)
            .arg("--verbose")
            .arg("False");

        if options.word_timestamps {
            command.arg("--word_timestamps").arg("True");
        }
        if let Some(language) = &options.language {
            command.arg("--language").arg(language);
        }
        command
    }
}

/// Whisper names its output after the input file's stem.
fn output_path(output_dir: &Path, audio: &Path) -> PathBuf {
    let stem = audio
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "audio".to_string());
    output_dir.join(format!("{stem}.json"))
}

#[async_trait]
impl RecognitionEngine for WhisperCliEngine {
    fn name(&self) -> &'static str {
        "whisper-cli"
    }

    async fn transcribe(
        &self,
        audio: &Path,
        options: &RecognitionOptions,
    ) -> Result<RecognitionResult> {
        fs::create_dir_all(&self.output_dir).await?;

        let output = self.command(audio, options).output().await?;
        if !output.status.success() {
            return Err(CaptionError::Recognition {
                media: audio.to_path_buf(),
                reason: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        let json_path = output_path(&self.output_dir, audio);
        let json_content = fs::read_to_string(&json_path).await;
        discard_scratch(&json_path).await;

        let transcript: RecognitionResult = serde_json::from_str(&json_content?)?;
        debug!(
            segments = transcript.segments.len(),
            language = transcript.language.as_deref().unwrap_or("unknown"),
            "whisper finished"
        );
        Ok(transcript)
    }
}

/// Remove whisper's JSON once read. A missing file is fine; other failures
/// are logged.
async fn discard_scratch(path: &Path) -> bool {
    match fs::remove_file(path).await {
        Ok(()) => true,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to remove whisper output");
            false
        }
    }
}
