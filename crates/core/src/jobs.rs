use std::{
    collections::{BTreeMap, HashMap},
    path::PathBuf,
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::{fs, sync::RwLock};
use uuid::Uuid;

use crate::{error::Result, paths::job_state_path, types::Format};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobState {
    Queued,
    Processing {
        stage: String,
    },
    Completed {
        /// Output per format: a file path, or `inline` when returned in memory.
        outputs: BTreeMap<Format, String>,
        /// Error message per format that failed to render.
        #[serde(default)]
        failures: BTreeMap<Format, String>,
    },
    Failed {
        error: String,
    },
}

impl JobState {
    pub fn processing(stage: impl Into<String>) -> Self {
        JobState::Processing {
            stage: stage.into(),
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, JobState::Completed { .. } | JobState::Failed { .. })
    }
}

/// Where job progress is recorded, keyed by opaque job ids.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn set(&self, job_id: Uuid, state: JobState) -> Result<()>;
    async fn get(&self, job_id: Uuid) -> Result<Option<JobState>>;
}

#[derive(Default)]
pub struct MemoryJobStore {
    jobs: RwLock<HashMap<Uuid, JobState>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn set(&self, job_id: Uuid, state: JobState) -> Result<()> {
        self.jobs.write().await.insert(job_id, state);
        Ok(())
    }

    async fn get(&self, job_id: Uuid) -> Result<Option<JobState>> {
        Ok(self.jobs.read().await.get(&job_id).cloned())
    }
}

/// One JSON file per job, so state outlives the process that ran the job.
pub struct FileJobStore {
    dir: PathBuf,
}

impl FileJobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl JobStore for FileJobStore {
    async fn set(&self, job_id: Uuid, state: JobState) -> Result<()> {
        fs::create_dir_all(&self.dir).await?;
        let path = job_state_path(&self.dir, job_id);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&state)?).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn get(&self, job_id: Uuid) -> Result<Option<JobState>> {
        let path = job_state_path(&self.dir, job_id);
        match fs::read_to_string(&path).await {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
