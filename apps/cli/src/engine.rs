use std::{path::PathBuf, sync::Arc};

use anyhow::{Result, bail};
use captionist_core::{
    EngineKind, RecognitionEngine, Settings, TranscriptFileEngine, WhisperCliEngine,
};
use clap::ValueEnum;

/// CLI wrapper for EngineKind (needed for clap ValueEnum)
#[derive(Clone, Copy, ValueEnum)]
pub enum CliEngine {
    WhisperCli,
    WhisperRs,
    Transcript,
}

impl From<CliEngine> for EngineKind {
    fn from(cli: CliEngine) -> Self {
        match cli {
            CliEngine::WhisperCli => EngineKind::WhisperCli,
            CliEngine::WhisperRs => EngineKind::WhisperRs,
            CliEngine::Transcript => EngineKind::Transcript,
        }
    }
}

pub fn build_engine(
    settings: &Settings,
    transcript: Option<PathBuf>,
) -> Result<Arc<dyn RecognitionEngine>> {
    let engine = &settings.engine;
    match engine.kind {
        EngineKind::WhisperCli => Ok(Arc::new(WhisperCliEngine::new(
            &engine.whisper_bin,
            &engine.model,
            settings.work_dir(),
        ))),
        EngineKind::Transcript => match transcript {
            Some(path) => Ok(Arc::new(TranscriptFileEngine::new(path))),
            None => bail!("the transcript engine needs --transcript <file.json>"),
        },
        EngineKind::WhisperRs => whisper_rs_engine(settings),
    }
}

#[cfg(feature = "whisper")]
fn whisper_rs_engine(settings: &Settings) -> Result<Arc<dyn RecognitionEngine>> {
    use captionist_core::engine::WhisperRsEngine;

    unsafe {
        whisper_rs::set_log_callback(Some(whisper_log_callback), std::ptr::null_mut());
    }
    Ok(Arc::new(WhisperRsEngine::new(
        &settings.engine.model,
        settings.engine.use_gpu,
    )))
}

#[cfg(feature = "whisper")]
extern "C" fn whisper_log_callback(
    _level: u32,
    _message: *const std::ffi::c_char,
    _user_data: *mut std::ffi::c_void,
) {
    // silent
}

#[cfg(not(feature = "whisper"))]
fn whisper_rs_engine(_settings: &Settings) -> Result<Arc<dyn RecognitionEngine>> {
    bail!("this build has no in-process whisper support; rebuild with `--features whisper`")
}
