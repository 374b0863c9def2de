use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::CaptionError;

/// An ASS colour. Written as `&HAABBGGRR` in styles and `&HBBGGRR&` inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    /// 0 is opaque.
    pub alpha: u8,
}

impl AssColor {
    pub const WHITE: AssColor = AssColor::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: AssColor = AssColor::rgb(0, 0, 0);
    pub const RED: AssColor = AssColor::rgb(0xFF, 0, 0);
    pub const YELLOW: AssColor = AssColor::rgb(0xFF, 0xFF, 0);

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 0,
        }
    }

    pub fn to_style_value(&self) -> String {
        format!(
            "&H{:02X}{:02X}{:02X}{:02X}",
            self.alpha, self.blue, self.green, self.red
        )
    }

    /// Primary colour override tag, e.g. `{\c&H00FFFF&}`.
    pub fn to_inline_tag(&self) -> String {
        format!(
            "{{\\c&H{:02X}{:02X}{:02X}&}}",
            self.blue, self.green, self.red
        )
    }
}

/// `#RRGGBB` when opaque, otherwise the `&HAABBGGRR` form so alpha survives.
impl fmt::Display for AssColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.alpha != 0 {
            return f.write_str(&self.to_style_value());
        }
        write!(
            f,
            "#{:02X}{:02X}{:02X}",
            self.red, self.green, self.blue
        )
    }
}

impl FromStr for AssColor {
    type Err = CaptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CaptionError::invalid_config(format!("invalid colour '{s}'"));
        let value = s.trim();

        if let Some(hex) = value.strip_prefix('#') {
            if hex.len() != 6 {
                return Err(invalid());
            }
            let packed = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
            return Ok(AssColor::rgb(
                (packed >> 16) as u8,
                (packed >> 8) as u8,
                packed as u8,
            ));
        }

        let hex = value
            .strip_prefix("&H")
            .or_else(|| value.strip_prefix("&h"))
            .ok_or_else(invalid)?
            .trim_end_matches('&');
        if hex.is_empty() || hex.len() > 8 {
            return Err(invalid());
        }
        let packed = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
        Ok(AssColor {
            alpha: (packed >> 24) as u8,
            blue: (packed >> 16) as u8,
            green: (packed >> 8) as u8,
            red: packed as u8,
        })
    }
}

impl TryFrom<String> for AssColor {
    type Error = CaptionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AssColor> for String {
    fn from(color: AssColor) -> Self {
        color.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum HighlightMode {
    /// Plain wrapped lines, no per-word timing.
    #[default]
    Classic,
    /// One event per line with `\k` karaoke sweeps.
    Karaoke,
    /// One event per word with the active word recoloured.
    WordByWord,
}

impl HighlightMode {
    pub fn needs_word_timestamps(&self) -> bool {
        !matches!(self, HighlightMode::Classic)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HighlightMode::Classic => "classic",
            HighlightMode::Karaoke => "karaoke",
            HighlightMode::WordByWord => "word_by_word",
        }
    }
}

impl FromStr for HighlightMode {
    type Err = CaptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "classic" => Ok(HighlightMode::Classic),
            "karaoke" => Ok(HighlightMode::Karaoke),
            "word_by_word" => Ok(HighlightMode::WordByWord),
            other => Err(CaptionError::invalid_config(format!(
                "unknown highlight mode '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Position {
    Top,
    Middle,
    #[default]
    Bottom,
}

impl Position {
    /// Numpad-style ASS alignment, horizontally centred.
    pub fn alignment(&self) -> u8 {
        match self {
            Position::Bottom => 2,
            Position::Middle => 5,
            Position::Top => 8,
        }
    }
}

impl FromStr for Position {
    type Err = CaptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Position::Top),
            "middle" | "center" => Ok(Position::Middle),
            "bottom" => Ok(Position::Bottom),
            other => Err(CaptionError::invalid_config(format!(
                "unknown position '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for HighlightMode {
    type Error = CaptionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for Position {
    type Error = CaptionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleSettings {
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    #[serde(default = "default_primary_color")]
    pub primary_color: AssColor,
    #[serde(default = "default_highlight_color")]
    pub highlight_color: AssColor,
    #[serde(default = "default_outline_color")]
    pub outline_color: AssColor,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub mode: HighlightMode,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            font_family: default_font_family(),
            font_size: default_font_size(),
            primary_color: default_primary_color(),
            highlight_color: default_highlight_color(),
            outline_color: default_outline_color(),
            position: Position::default(),
            mode: HighlightMode::default(),
        }
    }
}

impl StyleSettings {
    /// The `Style: Default,...` line of the `[V4+ Styles]` section.
    pub fn ass_style_line(&self) -> String {
        format!(
            "Style: Default,{},{},{},{},{},{},0,0,0,0,100,100,0,0,1,2,2,{},10,10,10,1",
            self.font_family,
            self.font_size,
            self.primary_color.to_style_value(),
            AssColor::RED.to_style_value(),
            self.outline_color.to_style_value(),
            AssColor::BLACK.to_style_value(),
            self.position.alignment(),
        )
    }
}

fn default_font_family() -> String {
    "Arial".to_string()
}

fn default_font_size() -> u32 {
    20
}

fn default_primary_color() -> AssColor {
    AssColor::WHITE
}

fn default_highlight_color() -> AssColor {
    AssColor::YELLOW
}

fn default_outline_color() -> AssColor {
    AssColor::BLACK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_style_line_matches_reference_header() {
        assert_eq!(
            StyleSettings::default().ass_style_line(),
            "Style: Default,Arial,20,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,0,0,0,0,100,100,0,0,1,2,2,2,10,10,10,1"
        );
    }

    #[test]
    fn colours_parse_from_css_and_ass_literals() {
        let yellow: AssColor = "#FFFF00".parse().unwrap();
        assert_eq!(yellow, AssColor::YELLOW);
        assert_eq!(yellow.to_inline_tag(), "{\\c&H00FFFF&}");

        let red: AssColor = "&H000000FF".parse().unwrap();
        assert_eq!(red, AssColor::RED);
        let red_inline: AssColor = "&H0000FF&".parse().unwrap();
        assert_eq!(red_inline, AssColor::RED);
    }

    #[test]
    fn bad_colours_are_configuration_errors() {
        for input in ["yellow", "#FFF", "&Hxyz", "&H"] {
            assert!(
                matches!(
                    input.parse::<AssColor>(),
                    Err(CaptionError::InvalidConfiguration { .. })
                ),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn modes_and_positions_parse() {
        assert_eq!(
            "word-by-word".parse::<HighlightMode>().unwrap(),
            HighlightMode::WordByWord
        );
        assert!("bouncy".parse::<HighlightMode>().is_err());
        assert_eq!("top".parse::<Position>().unwrap().alignment(), 8);
        assert!(HighlightMode::Karaoke.needs_word_timestamps());
        assert!(!HighlightMode::Classic.needs_word_timestamps());
    }

    #[test]
    fn style_deserializes_with_defaults() {
        let style: StyleSettings =
            serde_json::from_str(r##"{"font_size": 32, "mode": "karaoke", "highlight_color": "#00FF00"}"##)
                .unwrap();
        assert_eq!(style.font_family, "Arial");
        assert_eq!(style.font_size, 32);
        assert_eq!(style.mode, HighlightMode::Karaoke);
        assert_eq!(style.highlight_color, AssColor::rgb(0, 0xFF, 0));
    }

    #[test]
    fn translucent_colour_keeps_alpha_through_serde() {
        let translucent: AssColor = "&H80FFFFFF".parse().unwrap();
        assert_eq!(translucent.alpha, 0x80);

        let json = serde_json::to_string(&translucent).unwrap();
        assert_eq!(json, "\"&H80FFFFFF\"");
        let back: AssColor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, translucent);

        assert_eq!(AssColor::YELLOW.to_string(), "#FFFF00");
    }

    #[test]
    fn enum_values_accept_their_aliases() {
        let style: StyleSettings =
            serde_json::from_str(r#"{"mode": "word-by-word", "position": "center"}"#).unwrap();
        assert_eq!(style.mode, HighlightMode::WordByWord);
        assert_eq!(style.position, Position::Middle);
        assert_eq!(
            serde_json::to_string(&HighlightMode::WordByWord).unwrap(),
            "\"word_by_word\""
        );
    }
}
