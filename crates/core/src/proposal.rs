use serde::{Deserialize, Serialize};

use crate::product::AspectRatio;

/// Maximum number of feature lines rendered on the poster itself.
pub const MAX_DISPLAYED_FEATURES: usize = 3;

/// Literal copy to be rendered verbatim on the poster.
///
/// These are the only values allowed to appear inside rendering
/// directives; the image model is instructed to reproduce them exactly,
/// unparaphrased.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayedText {
    /// Main headline.
    pub headline: String,
    /// Supporting tagline.
    pub tagline: String,
    /// At most [`MAX_DISPLAYED_FEATURES`] short feature lines.
    #[serde(default)]
    pub features: Vec<String>,
}

impl DisplayedText {
    /// Drop feature lines beyond the display limit, preserving order.
    pub fn truncate_features(&mut self) {
        self.features.truncate(MAX_DISPLAYED_FEATURES);
    }
}

/// Notes on how the product integrates with the proposed scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationNotes {
    /// How the product's light interacts with the environment light.
    #[serde(default)]
    pub light_integration: String,
    /// How and where the product is installed in the scene.
    #[serde(default)]
    pub installation_context: String,
    /// Material and color harmony between product and scene.
    #[serde(default)]
    pub visual_harmony: String,
}

/// One candidate poster design offered to the user before final generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    /// Unique within a session; assigned by the generator when absent.
    #[serde(default)]
    pub proposal_id: String,
    /// Short style name, e.g. "Futuristic Tech".
    #[serde(default)]
    pub style_name: String,
    /// One or two sentences describing the design idea.
    #[serde(default)]
    pub style_description: String,
    /// Where the product sits on the canvas. The subject occupies 15-30%
    /// of the frame area.
    #[serde(default)]
    pub product_placement: String,
    /// Scene and setting behind the product.
    #[serde(default)]
    pub background_description: String,
    /// Where the displayed copy is placed.
    #[serde(default)]
    pub text_placement: String,
    /// Overall composition of the canvas.
    #[serde(default)]
    pub layout_description: String,
    /// Light direction, intensity, temperature, reflections.
    #[serde(default)]
    pub lighting_requirements: String,
    /// Dominant palette and mood.
    #[serde(default)]
    pub color_tone: String,
    /// Canvas ratio for this design.
    #[serde(default)]
    pub poster_aspect_ratio: AspectRatio,
    /// Product/scene coordination notes.
    #[serde(default)]
    pub integration_notes: IntegrationNotes,
    /// Literal copy rendered on the poster.
    #[serde(default)]
    pub displayed_text: DisplayedText,
}
