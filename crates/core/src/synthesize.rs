use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::{
    error::{CaptionError, Result},
    format::{self, RenderOptions, vtt},
    layout::validate_max_chars,
    types::{Format, RecognitionResult, SubtitleDocument},
};

/// Documents rendered for one request, plus the formats that failed.
#[derive(Debug, Default)]
pub struct Synthesis {
    pub documents: BTreeMap<Format, SubtitleDocument>,
    pub failures: BTreeMap<Format, CaptionError>,
}

impl Synthesis {
    pub fn get(&self, format: Format) -> Option<&SubtitleDocument> {
        self.documents.get(&format)
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// True when at least one format was requested and none rendered.
    pub fn is_total_failure(&self) -> bool {
        self.documents.is_empty() && !self.failures.is_empty()
    }
}

/// Render every requested format from one recognition result.
///
/// A format that fails is recorded in [`Synthesis::failures`] and the others
/// still render. Only request-wide configuration errors fail the whole call.
pub fn synthesize(
    result: &RecognitionResult,
    formats: &BTreeSet<Format>,
    options: &RenderOptions,
) -> Result<Synthesis> {
    validate_max_chars(options.max_chars)?;

    let mut synthesis = Synthesis::default();
    for &format in formats {
        let rendered = match (format, synthesis.documents.get(&Format::Srt)) {
            // SRT sorts before VTT, so a finished SRT can be reused.
            (Format::Vtt, Some(srt)) => Ok(SubtitleDocument::new(
                Format::Vtt,
                vtt::from_srt(&srt.body),
            )),
            _ => format::render(format, result, options),
        };

        match rendered {
            Ok(document) => {
                debug!(%format, bytes = document.body.len(), "rendered subtitle document");
                synthesis.documents.insert(format, document);
            }
            Err(e) => {
                let error = e.for_format(format);
                warn!(%format, error = %error, "subtitle format failed");
                synthesis.failures.insert(format, error);
            }
        }
    }

    Ok(synthesis)
}
