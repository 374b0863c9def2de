use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    error::Result,
    paths::artifact_path,
    types::{Format, SubtitleDocument},
};

/// How a rendered document is handed to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentOutput {
    InMemory(String),
    File(PathBuf),
}

/// Subtitle files written for one job.
///
/// The files belong to the set until [`ArtifactSet::into_paths`] hands them
/// off; a set that is dropped first deletes them.
#[derive(Debug)]
pub struct ArtifactSet {
    paths: BTreeMap<Format, PathBuf>,
}

impl ArtifactSet {
    /// Write each document to `<dir>/<job_id>.<ext>`. When a write fails, the
    /// files written so far are removed before the error is returned.
    pub async fn write<'a>(
        documents: impl IntoIterator<Item = &'a SubtitleDocument>,
        dir: &Path,
        job_id: Uuid,
    ) -> Result<Self> {
        fs::create_dir_all(dir).await?;

        let mut set = ArtifactSet {
            paths: BTreeMap::new(),
        };
        for document in documents {
            let path = artifact_path(dir, job_id, document.format);
            fs::write(&path, &document.body).await?;
            debug!(format = %document.format, path = %path.display(), "wrote subtitle file");
            set.paths.insert(document.format, path);
        }
        Ok(set)
    }

    pub fn path(&self, format: Format) -> Option<&Path> {
        self.paths.get(&format).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Read every file back into memory. The files are removed when the set
    /// is dropped afterwards.
    pub async fn read_all(&self) -> Result<BTreeMap<Format, String>> {
        let mut bodies = BTreeMap::new();
        for (format, path) in &self.paths {
            bodies.insert(*format, fs::read_to_string(path).await?);
        }
        Ok(bodies)
    }

    /// Give the files to the caller, who becomes responsible for them.
    pub fn into_paths(mut self) -> BTreeMap<Format, PathBuf> {
        std::mem::take(&mut self.paths)
    }
}

impl Drop for ArtifactSet {
    fn drop(&mut self) {
        for path in self.paths.values() {
            if let Err(e) = std::fs::remove_file(path) {
                warn!(path = %path.display(), error = %e, "failed to remove subtitle file");
            }
        }
    }
}
