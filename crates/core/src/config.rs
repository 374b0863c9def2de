use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    error::{CaptionError, Result},
    format::RenderOptions,
    layout::{DEFAULT_MAX_CHARS, validate_max_chars},
    paths::{get_config_path, get_output_dir, get_root_cache_dir, get_work_dir},
    style::StyleSettings,
    types::Format,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub subtitles: SubtitleConfig,
    #[serde(default)]
    pub style: StyleSettings,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleConfig {
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
    #[serde(default = "default_formats")]
    pub formats: BTreeSet<Format>,
}

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
            formats: default_formats(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EngineKind {
    #[default]
    WhisperCli,
    WhisperRs,
    Transcript,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub kind: EngineKind,
    #[serde(default = "default_whisper_bin")]
    pub whisper_bin: String,
    /// Model name for the CLI, or a ggml model path for whisper-rs.
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default = "default_true")]
    pub use_gpu: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            kind: EngineKind::default(),
            whisper_bin: default_whisper_bin(),
            model: default_model(),
            language: None,
            use_gpu: default_true(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default)]
    pub work_dir: Option<PathBuf>,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl Settings {
    /// Load settings from `path`, or the default config location. A missing
    /// file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match get_config_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        Self::from_toml(&content)
    }

    /// Malformed TOML is a `ConfigError`; well-formed TOML with values that
    /// do not fit the settings (unknown format, mode or colour, wrong types)
    /// is `InvalidConfiguration`.
    pub fn from_toml(content: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(content)?;
        let settings: Settings = toml::Value::Table(table)
            .try_into()
            .map_err(|e: toml::de::Error| CaptionError::invalid_config(e.message()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        validate_max_chars(self.subtitles.max_chars)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            max_chars: self.subtitles.max_chars,
            style: self.style.clone(),
        }
    }

    pub fn work_dir(&self) -> PathBuf {
        self.paths
            .work_dir
            .clone()
            .unwrap_or_else(|| get_work_dir(&get_root_cache_dir()))
    }

    pub fn output_dir(&self) -> PathBuf {
        self.paths
            .output_dir
            .clone()
            .unwrap_or_else(|| get_output_dir(&get_root_cache_dir()))
    }
}

fn default_max_chars() -> usize {
    DEFAULT_MAX_CHARS
}

fn default_formats() -> BTreeSet<Format> {
    Format::ALL.into_iter().collect()
}

fn default_whisper_bin() -> String {
    "whisper".to_string()
}

fn default_model() -> String {
    "base".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{AssColor, HighlightMode, Position};

    #[test]
    fn empty_file_gives_defaults() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.subtitles.max_chars, 56);
        assert_eq!(settings.subtitles.formats.len(), 4);
        assert_eq!(settings.engine.kind, EngineKind::WhisperCli);
    }

    #[test]
    fn parses_full_config() {
        let settings = Settings::from_toml(
            r##"
            [subtitles]
            max_chars = 32
            formats = ["srt", "ass"]

            [style]
            font_family = "Inter"
            font_size = 28
            highlight_color = "#00FF00"
            position = "top"
            mode = "word_by_word"

            [engine]
            kind = "transcript"
            language = "de"

            [paths]
            output_dir = "/srv/subs"
            "##,
        )
        .unwrap();

        assert_eq!(settings.subtitles.max_chars, 32);
        assert_eq!(
            settings.subtitles.formats,
            BTreeSet::from([Format::Srt, Format::Ass])
        );
        assert_eq!(settings.style.font_family, "Inter");
        assert_eq!(settings.style.position, Position::Top);
        assert_eq!(settings.style.mode, HighlightMode::WordByWord);
        assert_eq!(settings.style.highlight_color, AssColor::rgb(0, 0xFF, 0));
        assert_eq!(settings.engine.kind, EngineKind::Transcript);
        assert_eq!(settings.engine.language.as_deref(), Some("de"));
        assert_eq!(settings.output_dir(), PathBuf::from("/srv/subs"));
        assert_eq!(settings.render_options().max_chars, 32);
    }

    #[test]
    fn rejects_zero_max_chars() {
        assert!(matches!(
            Settings::from_toml("[subtitles]\nmax_chars = 0\n"),
            Err(CaptionError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn unknown_enum_values_are_invalid_configuration() {
        for content in [
            "[style]\nmode = \"bouncy\"\n",
            "[style]\nposition = \"left\"\n",
            "[style]\nprimary_color = \"teal\"\n",
            "[subtitles]\nformats = [\"docx\"]\n",
        ] {
            match Settings::from_toml(content) {
                Err(CaptionError::InvalidConfiguration { reason }) => {
                    assert!(reason.contains("unknown") || reason.contains("invalid"), "{reason}")
                }
                other => panic!("{content:?} gave {other:?}"),
            }
        }
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        assert!(matches!(
            Settings::from_toml("[style\nmode = "),
            Err(CaptionError::ConfigError(_))
        ));
    }

    #[test]
    fn format_aliases_parse_from_config() {
        let settings = Settings::from_toml("[subtitles]\nformats = [\"txt\", \"webvtt\"]\n").unwrap();
        assert_eq!(
            settings.subtitles.formats,
            BTreeSet::from([Format::Plain, Format::Vtt])
        );
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(settings, Settings::default());
    }
}
