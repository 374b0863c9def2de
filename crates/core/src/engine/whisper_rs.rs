use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::{
    engine::{RecognitionEngine, RecognitionOptions},
    error::{CaptionError, Result},
    types::{RecognitionResult, Segment, Word},
};

/// In-process whisper.cpp inference over 16 kHz mono WAV.
pub struct WhisperRsEngine {
    model_path: PathBuf,
    use_gpu: bool,
}

impl WhisperRsEngine {
    pub fn new(model_path: impl Into<PathBuf>, use_gpu: bool) -> Self {
        Self {
            model_path: model_path.into(),
            use_gpu,
        }
    }
}

#[async_trait]
impl RecognitionEngine for WhisperRsEngine {
    fn name(&self) -> &'static str {
        "whisper-rs"
    }

    async fn transcribe(
        &self,
        audio: &Path,
        options: &RecognitionOptions,
    ) -> Result<RecognitionResult> {
        let model_path = self.model_path.clone();
        let use_gpu = self.use_gpu;
        let audio = audio.to_path_buf();
        let options = options.clone();

        tokio::task::spawn_blocking(move || run_inference(&model_path, use_gpu, &audio, &options))
            .await
            .map_err(|e| CaptionError::Recognition {
                media: PathBuf::new(),
                reason: format!("inference task failed: {e}"),
            })?
    }
}

fn run_inference(
    model_path: &Path,
    use_gpu: bool,
    audio: &Path,
    options: &RecognitionOptions,
) -> Result<RecognitionResult> {
    let fail = |reason: String| CaptionError::Recognition {
        media: audio.to_path_buf(),
        reason,
    };

    let mut reader = hound::WavReader::open(audio).map_err(|e| fail(e.to_string()))?;
    let samples: Vec<f32> = reader
        .samples::<i16>()
        .map(|s| s.map(|v| v as f32 / i16::MAX as f32))
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| fail(e.to_string()))?;

    let ctx_params = WhisperContextParameters {
        use_gpu,
        flash_attn: true,
        ..Default::default()
    };
    let model_path_str = model_path
        .to_str()
        .ok_or_else(|| fail(format!("model path is not UTF-8: {}", model_path.display())))?;
    let ctx = WhisperContext::new_with_params(model_path_str, ctx_params)
        .map_err(|e| fail(format!("failed to load model: {e}")))?;

    let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 5 });
    params.set_language(options.language.as_deref());
    if options.word_timestamps {
        // One word per whisper segment; regrouped into sentences below.
        params.set_token_timestamps(true);
        params.set_split_on_word(true);
        params.set_max_len(1);
    }

    let mut state = ctx
        .create_state()
        .map_err(|e| fail(format!("failed to create state: {e}")))?;
    state
        .full(params, &samples)
        .map_err(|e| fail(format!("failed to run model: {e}")))?;

    let mut pieces = Vec::new();
    for segment in state.as_iter() {
        let Ok(text) = segment.to_str() else {
            continue;
        };
        pieces.push(Segment::new(
            segment.start_timestamp() as f64 / 100.0,
            segment.end_timestamp() as f64 / 100.0,
            text,
        ));
    }

    let segments = if options.word_timestamps {
        group_words(pieces)
    } else {
        pieces
    };
    let text = segments.iter().map(|s| s.text.as_str()).collect::<String>();

    let language = whisper_rs::get_lang_str(state.full_lang_id_from_state()).map(str::to_string);
    debug!(segments = segments.len(), "whisper-rs finished");

    Ok(RecognitionResult {
        text,
        segments,
        language,
    })
}

const MAX_WORDS_PER_SEGMENT: usize = 24;

/// Regroup single-word pieces into segments ending at sentence punctuation.
fn group_words(pieces: Vec<Segment>) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut words: Vec<Word> = Vec::new();

    for piece in pieces {
        if piece.text.trim().is_empty() {
            continue;
        }
        let ends_sentence = piece.text.trim_end().ends_with(['.', '?', '!']);
        words.push(Word::new(piece.text, piece.start, piece.end));

        if ends_sentence || words.len() >= MAX_WORDS_PER_SEGMENT {
            segments.push(segment_from_words(std::mem::take(&mut words)));
        }
    }
    if !words.is_empty() {
        segments.push(segment_from_words(words));
    }
    segments
}

fn segment_from_words(words: Vec<Word>) -> Segment {
    let start = words.first().map(|w| w.start).unwrap_or(0.0);
    let end = words.last().map(|w| w.end).unwrap_or(start);
    let text = words.iter().map(|w| w.text.as_str()).collect::<String>();
    Segment::new(start, end, text).with_words(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_regroup_at_sentence_ends() {
        let pieces = vec![
            Segment::new(0.0, 0.3, " Hello"),
            Segment::new(0.3, 0.6, " there."),
            Segment::new(0.7, 1.0, " Bye"),
        ];
        let segments = group_words(pieces);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, " Hello there.");
        assert_eq!((segments[0].start, segments[0].end), (0.0, 0.6));
        assert_eq!(segments[1].words.as_ref().unwrap().len(), 1);
    }
}
