use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Poster canvas aspect ratio. Only these three values are accepted by the
/// image model instruction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    /// Landscape, `16:9`.
    #[default]
    #[serde(rename = "16:9")]
    Wide,
    /// Portrait, `9:16`.
    #[serde(rename = "9:16")]
    Tall,
    /// Square, `1:1`.
    #[serde(rename = "1:1")]
    Square,
}

impl AspectRatio {
    /// Return the literal ratio string used in prompts and stored JSON.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wide => "16:9",
            Self::Tall => "9:16",
            Self::Square => "1:1",
        }
    }

    /// Parse a ratio string, returning `None` for anything outside the
    /// three allowed values.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "16:9" => Some(Self::Wide),
            "9:16" => Some(Self::Tall),
            "1:1" => Some(Self::Square),
            _ => None,
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failures for caller-supplied product metadata.
#[derive(Debug, Error)]
pub enum InvalidProduct {
    /// The product name is empty or whitespace.
    #[error("product name must not be empty")]
    EmptyName,

    /// The feature list is empty or contains only blank entries.
    #[error("at least one non-empty product feature is required")]
    NoFeatures,
}

/// Structured metadata describing the product being advertised.
///
/// Immutable once a session starts: the generator snapshots it into the
/// [`Session`](crate::Session) and every derived prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInfo {
    /// Product name, rendered verbatim in the poster copy.
    pub name: String,
    /// Ordered feature list; joined into the exact feature-list literal.
    pub features: Vec<String>,
    /// Who the poster is aimed at, if the caller knows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    /// Free-form description of the usage scene to fold into backgrounds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene_description: Option<String>,
    /// Requested canvas ratio; proposals may override per design.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_aspect_ratio: Option<AspectRatio>,
    /// Opaque reference to the uploaded product photo in blob storage.
    pub source_image_ref: String,
}

impl ProductInfo {
    /// Check the invariants required before any pipeline stage runs:
    /// a non-empty name and at least one non-empty feature.
    pub fn validate(&self) -> Result<(), InvalidProduct> {
        if self.name.trim().is_empty() {
            return Err(InvalidProduct::EmptyName);
        }
        if !self.features.iter().any(|f| !f.trim().is_empty()) {
            return Err(InvalidProduct::NoFeatures);
        }
        Ok(())
    }

    /// The exact feature-list literal embedded in prompts and checked by
    /// the literal-repair pass.
    #[must_use]
    pub fn feature_literal(&self) -> String {
        self.features
            .iter()
            .filter(|f| !f.trim().is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ProductInfo {
        ProductInfo {
            name: "Aurora Strip".into(),
            features: vec!["waterproof".into(), "dimmable".into()],
            target_audience: None,
            scene_description: None,
            poster_aspect_ratio: None,
            source_image_ref: "uploads/aurora.jpg".into(),
        }
    }

    #[test]
    fn valid_product_passes() {
        sample().validate().unwrap();
    }

    #[test]
    fn empty_name_rejected() {
        let mut p = sample();
        p.name = "   ".into();
        assert!(matches!(p.validate(), Err(InvalidProduct::EmptyName)));
    }

    #[test]
    fn blank_features_rejected() {
        let mut p = sample();
        p.features = vec![String::new(), "  ".into()];
        assert!(matches!(p.validate(), Err(InvalidProduct::NoFeatures)));
    }

    #[test]
    fn feature_literal_joins_with_comma() {
        assert_eq!(sample().feature_literal(), "waterproof, dimmable");
    }

    #[test]
    fn feature_literal_skips_blanks() {
        let mut p = sample();
        p.features.insert(1, "  ".into());
        assert_eq!(p.feature_literal(), "waterproof, dimmable");
    }

    #[test]
    fn aspect_ratio_serde_uses_literal_strings() {
        let json = serde_json::to_string(&AspectRatio::Tall).unwrap();
        assert_eq!(json, "\"9:16\"");
        let back: AspectRatio = serde_json::from_str("\"1:1\"").unwrap();
        assert_eq!(back, AspectRatio::Square);
    }

    #[test]
    fn aspect_ratio_parse() {
        assert_eq!(AspectRatio::parse("16:9"), Some(AspectRatio::Wide));
        assert_eq!(AspectRatio::parse(" 9:16 "), Some(AspectRatio::Tall));
        assert_eq!(AspectRatio::parse("4:3"), None);
    }
}
