//! Subtitle serializers.
//!
//! Every serializer renders the whole document in memory and either returns
//! it complete or fails; nothing is written anywhere from here.

pub mod ass;
pub mod plain;
pub mod srt;
pub mod vtt;

use crate::{
    error::{CaptionError, Result},
    layout::DEFAULT_MAX_CHARS,
    style::StyleSettings,
    types::{Format, RecognitionResult, Segment, SubtitleDocument},
};

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub max_chars: usize,
    pub style: StyleSettings,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
            style: StyleSettings::default(),
        }
    }
}

pub fn render(
    format: Format,
    result: &RecognitionResult,
    options: &RenderOptions,
) -> Result<SubtitleDocument> {
    let body = match format {
        Format::Plain => plain::render(result)?,
        Format::Srt => srt::render(&result.segments)?,
        Format::Vtt => vtt::render(&result.segments)?,
        Format::Ass => ass::render(&result.segments, options)?,
    };
    Ok(SubtitleDocument::new(format, body))
}

pub(crate) fn ensure_segments(segments: &[Segment]) -> Result<()> {
    if segments.is_empty() {
        return Err(CaptionError::EmptySegments);
    }
    Ok(())
}

/// Trimmed cue text with blank lines dropped, since a blank line ends a cue.
pub(crate) fn cue_text(text: &str) -> String {
    text.trim()
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cue_text_trims_and_drops_blank_lines() {
        assert_eq!(cue_text("  Hello  "), "Hello");
        assert_eq!(cue_text("one\n\n  \ntwo"), "one\ntwo");
        assert_eq!(cue_text("a, b"), "a, b");
    }

    #[test]
    fn render_tags_document_with_format() {
        let result = RecognitionResult {
            text: "hi".to_string(),
            segments: vec![Segment::new(0.0, 1.0, "hi")],
            language: None,
        };
        let doc = render(Format::Vtt, &result, &RenderOptions::default()).unwrap();
        assert_eq!(doc.format, Format::Vtt);
        assert!(doc.body.starts_with("WEBVTT\n\n"));
    }
}
