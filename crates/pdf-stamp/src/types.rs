use thiserror::Error;

#[derive(Error, Debug)]
pub enum StampError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("stamp text is empty")]
    EmptyText,
    #[error("invalid font size: {0}")]
    InvalidFontSize(String),
    #[error("overlay document has no pages")]
    EmptyOverlay,
    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, StampError>;

/// Page orientation; selects letter page dimensions for the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// The fixed stamp palette. `Red` is the palette's first entry and the
/// fallback for unrecognized color names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StampColor {
    #[default]
    Red,
    Blue,
    Black,
}

impl StampColor {
    pub fn from_name(name: &str) -> Self {
        match name {
            "blue" => StampColor::Blue,
            "black" => StampColor::Black,
            _ => StampColor::Red,
        }
    }

    /// Fill/stroke triple in the 0..=1 RGB space of the `rg`/`RG` operators.
    pub fn rgb(self) -> (f32, f32, f32) {
        match self {
            StampColor::Red => (1.0, 0.0, 0.0),
            StampColor::Blue => (0.0, 0.0, 1.0),
            StampColor::Black => (0.0, 0.0, 0.0),
        }
    }
}

pub const DEFAULT_FONT_SIZE: u32 = 20;

/// Everything needed to draw one stamp. Rebuilt fresh from current inputs
/// each time an overlay is produced; never persisted between stamps unless
/// the caller saves it explicitly.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StampSpec {
    pub text: String,
    pub font_size: u32,
    pub color: StampColor,
    pub underline: bool,
    /// Rotation in degrees, counter-clockwise positive. `None` draws
    /// horizontally without a local-frame transform.
    pub angle: Option<f64>,
    pub orientation: Orientation,
    /// Anchor in real page units (bottom-left origin), already converted
    /// from preview space.
    pub position: (f64, f64),
}

impl Default for StampSpec {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size: DEFAULT_FONT_SIZE,
            color: StampColor::default(),
            underline: false,
            angle: None,
            orientation: Orientation::default(),
            position: (0.0, 0.0),
        }
    }
}

impl StampSpec {
    pub fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(StampError::EmptyText);
        }
        if self.font_size == 0 {
            return Err(StampError::InvalidFontSize("0".to_string()));
        }
        Ok(())
    }

    /// Parse a user-entered font size. Mirrors the free-text entry this value
    /// historically came from: anything that is not a positive integer fails.
    pub fn font_size_from_str(input: &str) -> Result<u32> {
        match input.trim().parse::<u32>() {
            Ok(size) if size > 0 => Ok(size),
            _ => Err(StampError::InvalidFontSize(input.to_string())),
        }
    }

    /// Load a stamp spec from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let spec = serde_json::from_slice(&bytes)
            .map_err(|e| StampError::Config(format!("Failed to parse stamp spec: {}", e)))?;
        Ok(spec)
    }

    /// Save a stamp spec to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| StampError::Config(format!("Failed to serialize stamp spec: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_rejected() {
        let spec = StampSpec::default();
        assert!(matches!(spec.validate(), Err(StampError::EmptyText)));

        let spec = StampSpec {
            text: "   ".to_string(),
            ..Default::default()
        };
        assert!(matches!(spec.validate(), Err(StampError::EmptyText)));
    }

    #[test]
    fn zero_font_size_is_rejected() {
        let spec = StampSpec {
            text: "DRAFT".to_string(),
            font_size: 0,
            ..Default::default()
        };
        assert!(matches!(spec.validate(), Err(StampError::InvalidFontSize(_))));
    }

    #[test]
    fn font_size_parsing() {
        assert_eq!(StampSpec::font_size_from_str(" 24 ").unwrap(), 24);
        assert!(matches!(
            StampSpec::font_size_from_str("big"),
            Err(StampError::InvalidFontSize(_))
        ));
        assert!(matches!(
            StampSpec::font_size_from_str("0"),
            Err(StampError::InvalidFontSize(_))
        ));
        assert!(matches!(
            StampSpec::font_size_from_str("-3"),
            Err(StampError::InvalidFontSize(_))
        ));
    }

    #[test]
    fn unknown_color_falls_back_to_palette_first() {
        assert_eq!(StampColor::from_name("chartreuse"), StampColor::Red);
        assert_eq!(StampColor::from_name("blue"), StampColor::Blue);
        assert_eq!(StampColor::from_name("black"), StampColor::Black);
    }
}
