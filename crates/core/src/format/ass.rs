use crate::{
    error::{CaptionError, Result},
    format::{RenderOptions, ensure_segments},
    highlight::compute_highlight_intervals,
    layout::{pack_lines, wrap_text},
    style::{HighlightMode, StyleSettings},
    timecode::{TimeStyle, format_time},
    types::{DisplayLine, Segment, Word},
};

pub fn render(segments: &[Segment], options: &RenderOptions) -> Result<String> {
    ensure_segments(segments)?;

    let mut output = header(&options.style);
    for (i, segment) in segments.iter().enumerate() {
        // Segment bounds are checked even when only word times are printed.
        format_time(segment.start, TimeStyle::Ass).map_err(|e| e.in_segment(i))?;
        format_time(segment.end, TimeStyle::Ass).map_err(|e| e.in_segment(i))?;

        let events = match options.style.mode {
            HighlightMode::Classic => segment_events(segment, options.max_chars),
            HighlightMode::WordByWord => {
                word_by_word_events(words_of(segment, i)?, options.max_chars, &options.style)
            }
            HighlightMode::Karaoke => {
                karaoke_events(words_of(segment, i)?, options.max_chars, &options.style)
            }
        }
        .map_err(|e| e.in_segment(i))?;
        output.push_str(&events);
    }

    Ok(output)
}

pub fn header(style: &StyleSettings) -> String {
    let mut header = String::new();
    header.push_str("[Script Info]\n");
    header.push_str("ScriptType: v4.00+\n");
    header.push_str("PlayResX: 384\n");
    header.push_str("PlayResY: 288\n");
    header.push_str("ScaledBorderAndShadow: yes\n\n");

    header.push_str("[V4+ Styles]\n");
    header.push_str("Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding\n");
    header.push_str(&style.ass_style_line());
    header.push_str("\n\n");

    header.push_str("[Events]\n");
    header.push_str("Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n");
    header
}

/// Escape recognized text so it cannot open override blocks or break lines.
pub fn escape_text(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\n', "\\N")
        .replace('{', "\\{")
        .replace('}', "\\}")
}

fn dialogue(start: f64, end: f64, text: &str) -> Result<String> {
    Ok(format!(
        "Dialogue: 0,{},{},Default,,0,0,0,,{}\n",
        format_time(start, TimeStyle::Ass)?,
        format_time(end, TimeStyle::Ass)?,
        text
    ))
}

fn words_of(segment: &Segment, index: usize) -> Result<&[Word]> {
    segment
        .words
        .as_deref()
        .ok_or(CaptionError::MissingWordTimestamps { segment: index })
}

/// Wrapped sub-lines all share the segment's own timing.
fn segment_events(segment: &Segment, max_chars: usize) -> Result<String> {
    let mut events = String::new();
    for line in wrap_text(&segment.text, max_chars)? {
        events.push_str(&dialogue(segment.start, segment.end, &escape_text(&line))?);
    }
    Ok(events)
}

/// One event per word, the full line shown with the active word recoloured.
fn word_by_word_events(words: &[Word], max_chars: usize, style: &StyleSettings) -> Result<String> {
    let highlight = style.highlight_color.to_inline_tag();
    let normal = style.primary_color.to_inline_tag();

    let mut events = String::new();
    for line in pack_lines(words, max_chars)? {
        for interval in compute_highlight_intervals(&line) {
            let text = line
                .words
                .iter()
                .enumerate()
                .map(|(j, word)| {
                    let tag = if j == interval.index { &highlight } else { &normal };
                    format!("{}{}", tag, escape_text(word.display_text()))
                })
                .collect::<Vec<_>>()
                .join(" ");
            events.push_str(&dialogue(interval.start, interval.end, &text)?);
        }
    }
    Ok(events)
}

/// One event per line; `\k` durations come from the highlight intervals so the
/// sweep reaches each word when it is spoken.
fn karaoke_events(words: &[Word], max_chars: usize, style: &StyleSettings) -> Result<String> {
    let mut events = String::new();
    for line in pack_lines(words, max_chars)? {
        events.push_str(&dialogue(line.start(), line.end(), &karaoke_text(&line, style))?);
    }
    Ok(events)
}

fn karaoke_text(line: &DisplayLine, style: &StyleSettings) -> String {
    // \k fills from SecondaryColour to PrimaryColour.
    let prefix = format!(
        "{{\\1c&H{b1:02X}{g1:02X}{r1:02X}&\\2c&H{b2:02X}{g2:02X}{r2:02X}&}}",
        b1 = style.highlight_color.blue,
        g1 = style.highlight_color.green,
        r1 = style.highlight_color.red,
        b2 = style.primary_color.blue,
        g2 = style.primary_color.green,
        r2 = style.primary_color.red,
    );

    let body = compute_highlight_intervals(line)
        .iter()
        .map(|interval| {
            let centis = (interval.duration() * 100.0).round().max(0.0) as u64;
            format!(
                "{{\\k{}}}{}",
                centis,
                escape_text(interval.word.display_text())
            )
        })
        .collect::<Vec<_>>()
        .join(" ");

    format!("{prefix}{body}")
}
