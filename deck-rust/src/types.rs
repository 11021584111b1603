use serde::{Deserialize, Deserializer, Serialize};

/// Content for one slide as produced by the splitter. Index identity is
/// positional: page 0 is the cover, the last page the summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub key_points: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub emphasis: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub layout_suggestion: String,
}

/// Models sometimes emit `null` for a field they have nothing to say about.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMethod {
    ImageModel,
    HtmlGeneration,
}

/// The rendered output for one page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// A `/generated/...` path for persisted files, or the provider URL when
    /// the image could not be downloaded.
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_content: Option<String>,
    pub method: GenerationMethod,
}

/// Coarse content density requested for prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailLevel {
    Brief,
    #[default]
    Balanced,
    Detailed,
}

impl DetailLevel {
    /// `brief` and `detailed` are recognized; anything else is balanced.
    #[must_use]
    pub fn from_request(value: Option<&str>) -> Self {
        match value {
            Some("brief") => Self::Brief,
            Some("detailed") => Self::Detailed,
            _ => Self::Balanced,
        }
    }
}

pub const DEFAULT_RATIO: &str = "16:9";

/// Supported slide aspect ratios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlideRatio {
    #[default]
    Widescreen,
    Standard,
    Square,
    Portrait,
    Vertical,
}

impl SlideRatio {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "16:9" => Some(Self::Widescreen),
            "4:3" => Some(Self::Standard),
            "1:1" => Some(Self::Square),
            "3:4" => Some(Self::Portrait),
            "9:16" => Some(Self::Vertical),
            _ => None,
        }
    }

    /// Unknown or missing ratios resolve to 16:9.
    #[must_use]
    pub fn resolve(value: Option<&str>) -> Self {
        value.and_then(Self::parse).unwrap_or_default()
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Widescreen => "16:9",
            Self::Standard => "4:3",
            Self::Square => "1:1",
            Self::Portrait => "3:4",
            Self::Vertical => "9:16",
        }
    }

    /// Pixel size of an HTML slide as `(width, height)`.
    #[must_use]
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            Self::Widescreen => (1280, 720),
            Self::Standard => (1024, 768),
            Self::Square => (1024, 1024),
            Self::Portrait => (768, 1024),
            Self::Vertical => (720, 1280),
        }
    }
}

/// A built-in slide template. Read-only; feeds prompt assembly.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub colors: &'static [&'static str],
    pub font_family: &'static str,
    pub layout_style: &'static str,
    pub cover_style: &'static str,
    pub content_style: &'static str,
    pub thumbnail: &'static str,
}
