use crate::error::{CaptionError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeStyle {
    /// `HH:MM:SS,mmm`
    Srt,
    /// `HH:MM:SS.mmm`
    Vtt,
    /// `H:MM:SS.cc`
    Ass,
}

/// Format a seconds offset as the timecode a subtitle format expects.
///
/// SRT and VTT truncate to whole milliseconds after resolving the offset to
/// microseconds, so `3661.999` stays `...,999` despite float error. ASS rounds
/// to the nearest centisecond and carries into the seconds field.
pub fn format_time(seconds: f64, style: TimeStyle) -> Result<String> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(CaptionError::InvalidTime {
            seconds,
            segment: None,
        });
    }

    let formatted = match style {
        TimeStyle::Srt => millis_timecode(seconds, ','),
        TimeStyle::Vtt => millis_timecode(seconds, '.'),
        TimeStyle::Ass => {
            let total_cs = (seconds * 100.0).round() as u64;
            let hours = total_cs / 360_000;
            let minutes = (total_cs % 360_000) / 6_000;
            let secs = (total_cs % 6_000) / 100;
            let cs = total_cs % 100;
            format!("{}:{:02}:{:02}.{:02}", hours, minutes, secs, cs)
        }
    };

    Ok(formatted)
}

/// Truncates to whole milliseconds after rounding to microseconds, so float
/// noise like `3661.999` stays `,999`. Values within 0.5 µs below a
/// millisecond boundary round up to it (`0.9999996` gives `,000` of the
/// next second).
fn millis_timecode(seconds: f64, separator: char) -> String {
    let total_us = (seconds * 1_000_000.0).round() as u64;
    let total_ms = total_us / 1_000;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1_000;
    let ms = total_ms % 1_000;
    format!(
        "{:02}:{:02}:{:02}{}{:03}",
        hours, minutes, secs, separator, ms
    )
}

/// Format seconds as MM:SS for progress and log output.
pub fn format_timestamp(seconds: f64) -> String {
    let mins = (seconds / 60.0) as u32;
    let secs = (seconds % 60.0) as u32;
    format!("{:02}:{:02}", mins, secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srt_truncates_milliseconds() {
        assert_eq!(
            format_time(3661.999, TimeStyle::Srt).unwrap(),
            "01:01:01,999"
        );
        assert_eq!(format_time(1.5, TimeStyle::Srt).unwrap(), "00:00:01,500");
        assert_eq!(format_time(0.0019, TimeStyle::Srt).unwrap(), "00:00:00,001");
    }

    #[test]
    fn vtt_uses_period_separator() {
        assert_eq!(format_time(61.234, TimeStyle::Vtt).unwrap(), "00:01:01.234");
    }

    #[test]
    fn hours_pad_to_two_digits_but_grow_past_them() {
        assert_eq!(
            format_time(360_000.0, TimeStyle::Srt).unwrap(),
            "100:00:00,000"
        );
    }

    #[test]
    fn ass_hours_are_not_padded() {
        assert_eq!(format_time(3600.0, TimeStyle::Ass).unwrap(), "1:00:00.00");
        assert_eq!(format_time(1.234, TimeStyle::Ass).unwrap(), "0:00:01.23");
    }

    #[test]
    fn ass_centiseconds_round_and_carry() {
        assert_eq!(format_time(59.996, TimeStyle::Ass).unwrap(), "0:01:00.00");
        assert_eq!(format_time(3599.999, TimeStyle::Ass).unwrap(), "1:00:00.00");
        assert_eq!(format_time(2.346, TimeStyle::Ass).unwrap(), "0:00:02.35");
    }

    #[test]
    fn negative_and_nan_are_rejected() {
        assert!(matches!(
            format_time(-1.0, TimeStyle::Srt),
            Err(CaptionError::InvalidTime { segment: None, .. })
        ));
        assert!(format_time(f64::NAN, TimeStyle::Ass).is_err());
    }

    #[test]
    fn sub_microsecond_noise_rounds_up_to_the_boundary() {
        assert_eq!(format_time(0.9999996, TimeStyle::Srt).unwrap(), "00:00:01,000");
        assert_eq!(format_time(0.9994, TimeStyle::Srt).unwrap(), "00:00:00,999");
    }

    #[test]
    fn short_timestamp() {
        assert_eq!(format_timestamp(75.9), "01:15");
    }
}
