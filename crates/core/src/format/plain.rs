use crate::{
    error::{CaptionError, Result},
    types::{RecognitionResult, Segment},
};

/// The engine's own transcript text, or the trimmed segments when it has none.
pub fn render(result: &RecognitionResult) -> Result<String> {
    if !result.text.trim().is_empty() {
        return Ok(result.text.clone());
    }
    if result.segments.is_empty() {
        return Err(CaptionError::EmptySegments);
    }
    Ok(from_segments(&result.segments))
}

pub fn from_segments(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| s.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn whisper_like() -> RecognitionResult {
        RecognitionResult {
            text: " Hello there. How are you?".to_string(),
            segments: vec![
                Segment::new(0.0, 1.0, " Hello there."),
                Segment::new(1.0, 2.0, " How are you?"),
            ],
            language: Some("en".to_string()),
        }
    }

    #[test]
    fn engine_text_is_returned_unmodified() {
        let result = whisper_like();
        assert_eq!(render(&result).unwrap(), " Hello there. How are you?");
    }

    #[test]
    fn segment_path_matches_engine_text() {
        let result = whisper_like();
        assert_eq!(from_segments(&result.segments), result.text.trim());
    }

    #[test]
    fn text_without_segments_is_still_valid() {
        let result = RecognitionResult {
            text: "just text".to_string(),
            segments: Vec::new(),
            language: None,
        };
        assert_eq!(render(&result).unwrap(), "just text");
    }

    #[test]
    fn nothing_to_render_fails() {
        let result = RecognitionResult::default();
        assert!(matches!(render(&result), Err(CaptionError::EmptySegments)));
    }
}
