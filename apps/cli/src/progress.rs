use std::{
    sync::Mutex,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use captionist_core::{
    JobState, JobStore,
    pipeline::{STAGE_DELIVER, STAGE_RENDER, STAGE_TRANSCODE, STAGE_TRANSCRIBE},
};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use uuid::Uuid;

pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", (secs / 60.0).floor(), secs % 60.0)
    }
}

pub fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn done_line(label: &str, started: Instant) -> String {
    format!(
        "{} {} {}",
        style("✓").green().bold(),
        label,
        style(format!("[{}]", format_duration(started.elapsed()))).dim()
    )
}

fn stage_labels(stage: &str) -> (&'static str, &'static str) {
    match stage {
        STAGE_TRANSCODE => ("Extracting audio...", "Audio extracted"),
        STAGE_TRANSCRIBE => ("Transcribing...", "Transcribed"),
        STAGE_RENDER => ("Rendering subtitles...", "Subtitles rendered"),
        STAGE_DELIVER => ("Writing outputs...", "Outputs delivered"),
        _ => ("Working...", "Done"),
    }
}

struct ActiveStage {
    spinner: ProgressBar,
    done: &'static str,
    started: Instant,
}

/// Job store that mirrors stage transitions onto terminal spinners before
/// forwarding them to the real store.
pub struct SpinnerJobStore<S> {
    inner: S,
    active: Mutex<Option<ActiveStage>>,
}

impl<S: JobStore> SpinnerJobStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            active: Mutex::new(None),
        }
    }

    fn advance(&self, state: &JobState) {
        let Ok(mut active) = self.active.lock() else {
            return;
        };

        match state {
            JobState::Queued => {}
            JobState::Processing { stage } => {
                if let Some(previous) = active.take() {
                    previous
                        .spinner
                        .finish_with_message(done_line(previous.done, previous.started));
                }
                let (running, done) = stage_labels(stage);
                *active = Some(ActiveStage {
                    spinner: create_spinner(running),
                    done,
                    started: Instant::now(),
                });
            }
            JobState::Completed { .. } => {
                if let Some(previous) = active.take() {
                    previous
                        .spinner
                        .finish_with_message(done_line(previous.done, previous.started));
                }
            }
            JobState::Failed { .. } => {
                if let Some(previous) = active.take() {
                    previous
                        .spinner
                        .abandon_with_message(format!("{} Failed", style("✗").red().bold()));
                }
            }
        }
    }
}

#[async_trait]
impl<S: JobStore> JobStore for SpinnerJobStore<S> {
    async fn set(&self, job_id: Uuid, state: JobState) -> captionist_core::Result<()> {
        self.advance(&state);
        self.inner.set(job_id, state).await
    }

    async fn get(&self, job_id: Uuid) -> captionist_core::Result<Option<JobState>> {
        self.inner.get(job_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use captionist_core::MemoryJobStore;

    #[test]
    fn formats_short_and_long_durations() {
        assert_eq!(format_duration(Duration::from_millis(3400)), "3.4s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
    }

    #[tokio::test]
    async fn forwards_states_to_inner_store() {
        let store = SpinnerJobStore::new(MemoryJobStore::new());
        let job_id = Uuid::new_v4();

        store.set(job_id, JobState::processing(STAGE_RENDER)).await.unwrap();
        store
            .set(job_id, JobState::Failed { error: "boom".into() })
            .await
            .unwrap();

        assert_eq!(
            store.get(job_id).await.unwrap(),
            Some(JobState::Failed { error: "boom".into() })
        );
    }
}
