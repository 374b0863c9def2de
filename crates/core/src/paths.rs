use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::types::Format;

pub fn get_root_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("captionist")
}

/// Scratch space for transcoded audio and engine output.
pub fn get_work_dir(root: &Path) -> PathBuf {
    root.join("work")
}

pub fn get_jobs_dir(root: &Path) -> PathBuf {
    root.join("jobs")
}

pub fn get_output_dir(root: &Path) -> PathBuf {
    root.join("output")
}

pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("captionist").join("config.toml"))
}

/// `<dir>/<job_id>.<ext>`; the job id keeps concurrent requests apart.
pub fn artifact_path(dir: &Path, job_id: Uuid, format: Format) -> PathBuf {
    dir.join(format!("{}.{}", job_id, format.extension()))
}

pub fn transcoded_audio_path(work_dir: &Path, job_id: Uuid) -> PathBuf {
    work_dir.join(format!("{}.wav", job_id))
}

pub fn job_state_path(jobs_dir: &Path, job_id: Uuid) -> PathBuf {
    jobs_dir.join(format!("{}.json", job_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_names_use_format_extension() {
        let id = Uuid::nil();
        let path = artifact_path(Path::new("/out"), id, Format::Plain);
        assert_eq!(
            path,
            PathBuf::from("/out/00000000-0000-0000-0000-000000000000.txt")
        );
        assert!(
            transcoded_audio_path(Path::new("/w"), id)
                .to_string_lossy()
                .ends_with(".wav")
        );
    }
}
