use crate::{error::Result, format::srt::render_cues, timecode::TimeStyle, types::Segment};

const HEADER: &str = "WEBVTT\n\n";

pub fn render(segments: &[Segment]) -> Result<String> {
    let cues = render_cues(segments, TimeStyle::Vtt)?;
    Ok(format!("{HEADER}{cues}"))
}

/// Convert an SRT document to WebVTT by rewriting only the timing line of
/// each cue block. Commas in cue text are left alone.
pub fn from_srt(srt: &str) -> String {
    let mut output = String::from(HEADER);
    let mut block_start = true;
    let mut expect_timing = false;

    for line in srt.split_inclusive('\n') {
        if line.trim().is_empty() {
            block_start = true;
            expect_timing = false;
            output.push_str(line);
        } else if block_start {
            block_start = false;
            expect_timing = true;
            output.push_str(line);
        } else if expect_timing {
            expect_timing = false;
            output.push_str(&line.replace(',', "."));
        } else {
            output.push_str(line);
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::srt;

    fn segments() -> Vec<Segment> {
        vec![
            Segment::new(0.0, 1.25, "Well, hello"),
            Segment::new(1.25, 62.5, " 1,000 people --> here\nsecond line "),
            Segment::new(62.5, 3661.999, "Bye, now."),
        ]
    }

    #[test]
    fn renders_header_and_cues() {
        let vtt = render(&[Segment::new(0.0, 2.5, "Hello world")]).unwrap();
        assert_eq!(
            vtt,
            "WEBVTT\n\n1\n00:00:00.000 --> 00:00:02.500\nHello world\n\n"
        );
    }

    #[test]
    fn srt_conversion_matches_direct_rendering() {
        let segments = segments();
        let from_srt = from_srt(&srt::render(&segments).unwrap());
        let direct = render(&segments).unwrap();
        assert_eq!(from_srt, direct);
        assert!(direct.contains("Well, hello"));
        assert!(direct.contains("1,000 people --> here"));
    }
}
