use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::{fs, process::Command};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    error::{CaptionError, Result},
    paths::transcoded_audio_path,
};

/// Resolve a media reference to a local file. Accepts `file://` URLs and
/// plain paths; remote URLs must be downloaded by the caller.
pub fn resolve_media(reference: &str) -> Result<PathBuf> {
    let path = PathBuf::from(reference.strip_prefix("file://").unwrap_or(reference));
    if !path.is_file() {
        return Err(CaptionError::MediaNotFound { path });
    }
    Ok(path)
}

/// A transcoded copy of the source media, deleted when dropped.
#[derive(Debug)]
pub struct TranscodedAudio {
    path: PathBuf,
}

impl TranscodedAudio {
    /// Take ownership of an existing file; it is deleted on drop.
    pub fn adopt(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TranscodedAudio {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "removed transcoded audio"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "failed to remove transcoded audio"),
        }
    }
}

#[async_trait]
pub trait Transcoder: Send + Sync {
    async fn transcode(&self, media: &Path, work_dir: &Path, job_id: Uuid) -> Result<TranscodedAudio>;
}

pub struct FfmpegTranscoder;

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn transcode(&self, media: &Path, work_dir: &Path, job_id: Uuid) -> Result<TranscodedAudio> {
        transcode_to_wav(media, work_dir, job_id).await
    }
}

/// Transcode media to 16 kHz mono PCM WAV using ffmpeg.
pub async fn transcode_to_wav(media: &Path, work_dir: &Path, job_id: Uuid) -> Result<TranscodedAudio> {
    fs::create_dir_all(work_dir).await?;
    // Guard first so a half-written file from a failed run is removed too.
    let audio = TranscodedAudio::adopt(transcoded_audio_path(work_dir, job_id));

    let output = Command::new("ffmpeg")
        .arg("-y")
        .arg("-i")
        .arg(media)
        .arg("-vn")
        .arg("-acodec")
        .arg("pcm_s16le")
        .arg("-ar")
        .arg("16000")
        .arg("-ac")
        .arg("1")
        .arg(audio.path())
        .output()
        .await?;

    if !output.status.success() {
        return Err(CaptionError::Transcode {
            media: media.to_path_buf(),
            reason: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    Ok(audio)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_plain_paths_and_file_urls() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_string_lossy().to_string();

        assert_eq!(resolve_media(&path).unwrap(), file.path());
        assert_eq!(
            resolve_media(&format!("file://{path}")).unwrap(),
            file.path()
        );
    }

    #[test]
    fn missing_media_is_reported() {
        assert!(matches!(
            resolve_media("/definitely/not/here.mp4"),
            Err(CaptionError::MediaNotFound { .. })
        ));
    }

    #[test]
    fn dropping_the_guard_deletes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audio.wav");
        std::fs::write(&path, b"RIFF").unwrap();

        let audio = TranscodedAudio::adopt(&path);
        drop(audio);
        assert!(!path.exists());
    }
}
