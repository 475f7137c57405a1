use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The media node variants supported by the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Youtube,
}

impl MediaKind {
    /// Node type name as it appears in serialized documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Youtube => "youtube",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AttrParseError {
    #[error("invalid dimension value: {0:?}")]
    Dimension(String),

    #[error("invalid aspect ratio: {0:?}")]
    AspectRatio(String),

    #[error("invalid text alignment: {0:?}")]
    TextAlign(String),
}

/// A width/height attribute value.
///
/// `Px` is an explicit pixel size (what resizing produces), `Percent` is a
/// fluid size relative to the container, and `Auto` defers to the browser's
/// natural sizing (the default for heights, so CSS width-driven resize keeps
/// the aspect ratio).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Px(u32),
    Percent(u32),
    Auto,
}

impl Dimension {
    /// Pixel value, if this dimension is an explicit pixel size.
    pub fn as_px(&self) -> Option<u32> {
        match self {
            Dimension::Px(px) => Some(*px),
            _ => None,
        }
    }

    /// Parse leniently, falling back to `default` for malformed input.
    ///
    /// Programmatic attribute values are coerced rather than rejected, so a
    /// bad width never fails a whole insert.
    pub fn parse_or(s: &str, default: Option<Dimension>) -> Option<Dimension> {
        s.parse().ok().or(default)
    }
}

impl FromStr for Dimension {
    type Err = AttrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Ok(Dimension::Auto);
        }
        if let Some(pct) = s.strip_suffix('%') {
            return pct
                .trim()
                .parse::<u32>()
                .map(Dimension::Percent)
                .map_err(|_| AttrParseError::Dimension(s.to_string()));
        }
        // Accept fractional pixel values by rounding, as browsers do.
        if let Ok(px) = s.parse::<f64>() {
            if px.is_finite() && px >= 0.0 {
                return Ok(Dimension::Px(px.round() as u32));
            }
        }
        Err(AttrParseError::Dimension(s.to_string()))
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Px(px) => write!(f, "{px}"),
            Dimension::Percent(pct) => write!(f, "{pct}%"),
            Dimension::Auto => f.write_str("auto"),
        }
    }
}

/// An aspect ratio in `W/H` form, e.g. `16/9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct AspectRatio {
    pub w: u32,
    pub h: u32,
}

impl AspectRatio {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    /// Width-over-height ratio as a float.
    pub fn ratio(&self) -> f64 {
        f64::from(self.w) / f64::from(self.h)
    }
}

impl FromStr for AspectRatio {
    type Err = AttrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || AttrParseError::AspectRatio(s.to_string());
        let (w, h) = s.split_once('/').ok_or_else(err)?;
        let w = w.trim().parse::<u32>().map_err(|_| err())?;
        let h = h.trim().parse::<u32>().map_err(|_| err())?;
        if h == 0 {
            return Err(err());
        }
        Ok(AspectRatio { w, h })
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.w, self.h)
    }
}

impl From<AspectRatio> for String {
    fn from(r: AspectRatio) -> String {
        r.to_string()
    }
}

impl TryFrom<String> for AspectRatio {
    type Error = AttrParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Block-level alignment, applied to the node's outer wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
            TextAlign::Justify => "justify",
        }
    }
}

impl FromStr for TextAlign {
    type Err = AttrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "left" => Ok(TextAlign::Left),
            "center" => Ok(TextAlign::Center),
            "right" => Ok(TextAlign::Right),
            "justify" => Ok(TextAlign::Justify),
            other => Err(AttrParseError::TextAlign(other.to_string())),
        }
    }
}

impl fmt::Display for TextAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The attribute set carried by a media node.
///
/// Every field is optional; node specs declare per-variant defaults which are
/// layered in when a node is created, so absence of an attribute in stored
/// markup never produces an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaAttrs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<AspectRatio>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controls: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_fullscreen: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl MediaAttrs {
    /// Attribute set with just a source, everything else deferred to defaults.
    pub fn with_src(src: impl Into<String>) -> Self {
        Self {
            src: Some(src.into()),
            ..Self::default()
        }
    }

    /// Whether a non-empty `src` is present.
    pub fn has_src(&self) -> bool {
        self.src.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Layer `patch` over `self`: fields set in the patch win.
    pub fn merge(&self, patch: &MediaAttrs) -> MediaAttrs {
        MediaAttrs {
            src: patch.src.clone().or_else(|| self.src.clone()),
            width: patch.width.or(self.width),
            height: patch.height.or(self.height),
            aspect_ratio: patch.aspect_ratio.or(self.aspect_ratio),
            controls: patch.controls.or(self.controls),
            allow_fullscreen: patch.allow_fullscreen.or(self.allow_fullscreen),
            text_align: patch.text_align.or(self.text_align),
            alt: patch.alt.clone().or_else(|| self.alt.clone()),
            title: patch.title.clone().or_else(|| self.title.clone()),
        }
    }

    /// Fill unset fields from `defaults`: fields already set in `self` win.
    pub fn with_defaults(&self, defaults: &MediaAttrs) -> MediaAttrs {
        defaults.merge(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("300", Dimension::Px(300))]
    #[case("300.6", Dimension::Px(301))]
    #[case("100%", Dimension::Percent(100))]
    #[case(" 50 %", Dimension::Percent(50))]
    #[case("auto", Dimension::Auto)]
    #[case("AUTO", Dimension::Auto)]
    fn dimension_parses(#[case] input: &str, #[case] expected: Dimension) {
        assert_eq!(input.parse::<Dimension>().unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("wide")]
    #[case("-20")]
    #[case("%")]
    fn dimension_rejects_malformed(#[case] input: &str) {
        assert!(input.parse::<Dimension>().is_err());
    }

    #[test]
    fn dimension_coercion_falls_back_to_default() {
        assert_eq!(
            Dimension::parse_or("not-a-size", Some(Dimension::Auto)),
            Some(Dimension::Auto)
        );
        assert_eq!(
            Dimension::parse_or("640", Some(Dimension::Auto)),
            Some(Dimension::Px(640))
        );
    }

    #[test]
    fn dimension_round_trips_through_display() {
        for dim in [Dimension::Px(640), Dimension::Percent(100), Dimension::Auto] {
            assert_eq!(dim.to_string().parse::<Dimension>().unwrap(), dim);
        }
    }

    #[test]
    fn aspect_ratio_parses_and_displays() {
        let ratio: AspectRatio = "16 / 9".parse().unwrap();
        assert_eq!(ratio, AspectRatio::new(16, 9));
        assert_eq!(ratio.to_string(), "16/9");
        assert!("16/0".parse::<AspectRatio>().is_err());
        assert!("16:9".parse::<AspectRatio>().is_err());
    }

    #[test]
    fn merge_prefers_patch_fields() {
        let base = MediaAttrs {
            src: Some("a.mp4".into()),
            width: Some(Dimension::Percent(100)),
            controls: Some(true),
            ..MediaAttrs::default()
        };
        let patch = MediaAttrs {
            width: Some(Dimension::Px(640)),
            height: Some(Dimension::Px(360)),
            ..MediaAttrs::default()
        };
        let merged = base.merge(&patch);
        assert_eq!(merged.src.as_deref(), Some("a.mp4"));
        assert_eq!(merged.width, Some(Dimension::Px(640)));
        assert_eq!(merged.height, Some(Dimension::Px(360)));
        assert_eq!(merged.controls, Some(true));
    }

    #[test]
    fn with_defaults_only_fills_gaps() {
        let defaults = MediaAttrs {
            controls: Some(true),
            width: Some(Dimension::Percent(100)),
            height: Some(Dimension::Auto),
            ..MediaAttrs::default()
        };
        let parsed = MediaAttrs {
            src: Some("x.mp4".into()),
            width: Some(Dimension::Px(300)),
            ..MediaAttrs::default()
        };
        let full = parsed.with_defaults(&defaults);
        assert_eq!(full.width, Some(Dimension::Px(300)));
        assert_eq!(full.height, Some(Dimension::Auto));
        assert_eq!(full.controls, Some(true));
    }
}
