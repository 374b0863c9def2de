use std::{
    collections::{BTreeMap, BTreeSet},
    path::PathBuf,
    sync::Arc,
    time::Instant,
};

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    artifacts::{ArtifactSet, DocumentOutput},
    engine::{RecognitionEngine, RecognitionOptions},
    error::{CaptionError, Result},
    format::RenderOptions,
    jobs::{JobState, JobStore},
    media::{FfmpegTranscoder, Transcoder, resolve_media},
    synthesize::{Synthesis, synthesize},
    types::{Format, RecognitionResult},
};

pub const STAGE_TRANSCODE: &str = "transcode";
pub const STAGE_TRANSCRIBE: &str = "transcribe";
pub const STAGE_RENDER: &str = "render";
pub const STAGE_DELIVER: &str = "deliver";

#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    InMemory,
    Files { dir: PathBuf },
}

#[derive(Debug, Clone)]
pub struct JobRequest {
    pub job_id: Uuid,
    /// Local path or `file://` URL.
    pub media: String,
    pub formats: BTreeSet<Format>,
    pub options: RenderOptions,
    pub language: Option<String>,
    pub delivery: Delivery,
}

impl JobRequest {
    pub fn new(media: impl Into<String>, formats: BTreeSet<Format>) -> Self {
        Self {
            job_id: Uuid::new_v4(),
            media: media.into(),
            formats,
            options: RenderOptions::default(),
            language: None,
            delivery: Delivery::InMemory,
        }
    }

    /// Word timings are only worth requesting when an ASS highlight mode
    /// will use them.
    pub fn needs_word_timestamps(&self) -> bool {
        self.formats.contains(&Format::Ass) && self.options.style.mode.needs_word_timestamps()
    }
}

#[derive(Debug)]
pub struct JobReport {
    pub job_id: Uuid,
    pub transcript: RecognitionResult,
    pub outputs: BTreeMap<Format, DocumentOutput>,
    pub failures: BTreeMap<Format, CaptionError>,
}

pub struct Pipeline {
    engine: Arc<dyn RecognitionEngine>,
    jobs: Arc<dyn JobStore>,
    transcoder: Arc<dyn Transcoder>,
    work_dir: PathBuf,
}

impl Pipeline {
    pub fn new(
        engine: Arc<dyn RecognitionEngine>,
        jobs: Arc<dyn JobStore>,
        work_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            engine,
            jobs,
            transcoder: Arc::new(FfmpegTranscoder),
            work_dir: work_dir.into(),
        }
    }

    pub fn with_transcoder(mut self, transcoder: Arc<dyn Transcoder>) -> Self {
        self.transcoder = transcoder;
        self
    }

    /// Run one job end to end and record its final state.
    pub async fn run(&self, request: &JobRequest) -> Result<JobReport> {
        let job_id = request.job_id;
        self.jobs.set(job_id, JobState::Queued).await?;

        let outcome = self.process(request).await;
        let final_state = match &outcome {
            Ok(report) => completed_state(report),
            Err(e) => JobState::Failed {
                error: e.to_string(),
            },
        };
        if let Err(e) = self.jobs.set(job_id, final_state).await {
            warn!(%job_id, error = %e, "failed to record final job state");
        }
        outcome
    }

    async fn process(&self, request: &JobRequest) -> Result<JobReport> {
        let job_id = request.job_id;
        let started = Instant::now();

        self.stage(job_id, STAGE_TRANSCODE).await?;
        let media = resolve_media(&request.media)?;
        let audio = self
            .transcoder
            .transcode(&media, &self.work_dir, job_id)
            .await?;

        self.stage(job_id, STAGE_TRANSCRIBE).await?;
        let recognition = RecognitionOptions {
            language: request.language.clone(),
            word_timestamps: request.needs_word_timestamps(),
        };
        let transcript = self.engine.transcribe(audio.path(), &recognition).await?;
        drop(audio);
        info!(
            %job_id,
            engine = self.engine.name(),
            segments = transcript.segments.len(),
            "transcription finished"
        );

        self.stage(job_id, STAGE_RENDER).await?;
        let synthesis = synthesize(&transcript, &request.formats, &request.options)?;

        self.stage(job_id, STAGE_DELIVER).await?;
        let outputs = deliver(&synthesis, &request.delivery, job_id).await?;
        info!(
            %job_id,
            rendered = outputs.len(),
            failed = synthesis.failures.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "job finished"
        );

        Ok(JobReport {
            job_id,
            transcript,
            outputs,
            failures: synthesis.failures,
        })
    }

    async fn stage(&self, job_id: Uuid, stage: &str) -> Result<()> {
        self.jobs.set(job_id, JobState::processing(stage)).await
    }
}

/// Hand rendered documents to the caller, in memory or as written files.
pub async fn deliver(
    synthesis: &Synthesis,
    delivery: &Delivery,
    job_id: Uuid,
) -> Result<BTreeMap<Format, DocumentOutput>> {
    match delivery {
        Delivery::InMemory => Ok(synthesis
            .documents
            .iter()
            .map(|(format, doc)| (*format, DocumentOutput::InMemory(doc.body.clone())))
            .collect()),
        Delivery::Files { dir } => {
            let artifacts = ArtifactSet::write(synthesis.documents.values(), dir, job_id).await?;
            Ok(artifacts
                .into_paths()
                .into_iter()
                .map(|(format, path)| (format, DocumentOutput::File(path)))
                .collect())
        }
    }
}

fn completed_state(report: &JobReport) -> JobState {
    JobState::Completed {
        outputs: report
            .outputs
            .iter()
            .map(|(format, output)| {
                let value = match output {
                    DocumentOutput::InMemory(_) => "inline".to_string(),
                    DocumentOutput::File(path) => path.display().to_string(),
                };
                (*format, value)
            })
            .collect(),
        failures: report
            .failures
            .iter()
            .map(|(format, error)| (*format, error.to_string()))
            .collect(),
    }
}
