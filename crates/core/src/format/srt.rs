use crate::{
    error::Result,
    format::{cue_text, ensure_segments},
    timecode::{TimeStyle, format_time},
    types::Segment,
};

pub fn render(segments: &[Segment]) -> Result<String> {
    render_cues(segments, TimeStyle::Srt)
}

/// Numbered cue blocks shared by SRT and VTT. Segments with no text are
/// skipped and the remaining cues numbered consecutively from 1.
pub(crate) fn render_cues(segments: &[Segment], style: TimeStyle) -> Result<String> {
    ensure_segments(segments)?;

    let mut output = String::new();
    let mut index = 1;
    for (i, segment) in segments.iter().enumerate() {
        let start = format_time(segment.start, style).map_err(|e| e.in_segment(i))?;
        let end = format_time(segment.end, style).map_err(|e| e.in_segment(i))?;
        let text = cue_text(&segment.text);
        if text.is_empty() {
            continue;
        }

        output.push_str(&format!("{}\n{} --> {}\n{}\n\n", index, start, end, text));
        index += 1;
    }

    Ok(output)
}
