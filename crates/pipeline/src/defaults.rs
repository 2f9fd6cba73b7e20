//! Built-in fallback proposals and prompt templates.
//!
//! When the text model is unreachable or returns output that fails
//! validation, proposal generation falls back to these hand-authored
//! designs, parameterized by the product so every downstream stage keeps
//! working with the same literal-copy guarantees.

use posterforge_core::{
    AspectRatio, DisplayedText, IntegrationNotes, ProductInfo, Proposal, MAX_DISPLAYED_FEATURES,
};

use crate::types::PromptTemplate;

/// Default headline used when the model never supplied displayed copy.
fn default_text(product: &ProductInfo, tagline: &str) -> DisplayedText {
    let mut features: Vec<String> = product
        .features
        .iter()
        .filter(|f| !f.trim().is_empty())
        .cloned()
        .collect();
    features.truncate(MAX_DISPLAYED_FEATURES);
    DisplayedText {
        headline: product.name.clone(),
        tagline: tagline.to_owned(),
        features,
    }
}

fn ratio_or(product: &ProductInfo, fallback: AspectRatio) -> AspectRatio {
    product.poster_aspect_ratio.unwrap_or(fallback)
}

/// Three hand-authored poster designs covering distinct moods, so the
/// fallback set still gives the user a real choice.
#[must_use]
pub fn default_proposals(product: &ProductInfo) -> Vec<Proposal> {
    vec![
        Proposal {
            proposal_id: "p1".into(),
            style_name: "Futuristic Tech".into(),
            style_description:
                "High-tech lab scene with holographic light trails radiating from the product."
                    .into(),
            product_placement: "Centered, light radiating outward in concentric rings".into(),
            background_description:
                "A futuristic research lab with translucent data streams and lighting schematics \
                 on the back wall"
                    .into(),
            text_placement: "Feature lines across the bottom, headline above the product".into(),
            layout_description: "Radial composition expanding from a centered subject".into(),
            lighting_requirements:
                "Blue-gold holographic glow with layered depth and crossing light beams".into(),
            color_tone: "Gold and cold blue contrast, futuristic mood".into(),
            poster_aspect_ratio: ratio_or(product, AspectRatio::Square),
            integration_notes: IntegrationNotes {
                light_integration: "Product light is the scene's primary source".into(),
                installation_context: "Showcased as a floating hero object".into(),
                visual_harmony: "Glass and metal surfaces echo the product finish".into(),
            },
            displayed_text: default_text(product, "Engineered for tomorrow"),
        },
        Proposal {
            proposal_id: "p2".into(),
            style_name: "Warm Home".into(),
            style_description:
                "Cozy living room at dusk, soft warm light wrapping the edges of the frame.".into(),
            product_placement: "Tracing the frame edges in a gentle curve".into(),
            background_description:
                "A modern living room with a fireplace, bookshelves, and a sunset outside the \
                 window"
                    .into(),
            text_placement: "Centered in the calm open middle of the canvas".into(),
            layout_description: "Ring composition with negative space reserved for copy".into(),
            lighting_requirements:
                "Warm pools of light on walls and furniture, soft diffuse falloff".into(),
            color_tone: "Warm yellow, pale orange, and light brown".into(),
            poster_aspect_ratio: ratio_or(product, AspectRatio::Wide),
            integration_notes: IntegrationNotes {
                light_integration: "Blends with fireplace and sunset ambience".into(),
                installation_context: "Installed along shelving and ceiling coves".into(),
                visual_harmony: "Wood and fabric textures soften the product lines".into(),
            },
            displayed_text: default_text(product, "Comfort in every corner"),
        },
        Proposal {
            proposal_id: "p3".into(),
            style_name: "Modern Business".into(),
            style_description:
                "Clean office environment with even, professional illumination.".into(),
            product_placement: "Upper center, lighting the workspace below".into(),
            background_description:
                "A minimal office with a tidy desk and subtle charts on the wall".into(),
            text_placement: "Lower band split into columns".into(),
            layout_description: "Two-zone layout, product above and scene below, straight lines"
                .into(),
            lighting_requirements: "Even shadow-free illumination over the work area".into(),
            color_tone: "White and light gray with restrained blue accents".into(),
            poster_aspect_ratio: ratio_or(product, AspectRatio::Wide),
            integration_notes: IntegrationNotes {
                light_integration: "Uniform task lighting with no glare".into(),
                installation_context: "Suspended above the desk on slim cables".into(),
                visual_harmony: "Metal trim matches the office hardware".into(),
            },
            displayed_text: default_text(product, "Professional light, reliable work"),
        },
    ]
}

/// Built-in prompt templates keyed by the ids legacy clients send.
///
/// Placeholders `{productName}` and `{features}` are substituted by
/// [`render_template`](crate::templates::render_template).
#[must_use]
pub fn builtin_templates() -> Vec<PromptTemplate> {
    vec![
        PromptTemplate {
            id: "general".into(),
            name: "General product poster".into(),
            template: "Create a professional marketing poster for {productName}. Highlight these \
                       features: {features}. Use a clean modern design with the product clearly \
                       visible and the copy easy to read."
                .into(),
        },
        PromptTemplate {
            id: "strip".into(),
            name: "LED strip poster".into(),
            template: "Design an eye-catching marketing poster for the {productName} LED strip. \
                       Emphasize these features: {features}. Show the strip's light effects, \
                       application scenes, and easy installation with vivid modern visuals."
                .into(),
        },
        PromptTemplate {
            id: "panel".into(),
            name: "LED panel poster".into(),
            template: "Create a professional product poster for the {productName} LED panel. \
                       Highlight these features: {features}. Show the panel's even illumination, \
                       slim profile, and flexible mounting in a clean business style."
                .into(),
        },
        PromptTemplate {
            id: "spotlight".into(),
            name: "LED spotlight poster".into(),
            template: "Design a marketing poster for the {productName} LED spotlight. Focus on: \
                       {features}. Emphasize the focused beam, adjustable angles, and varied \
                       applications with a high-impact play of light and shadow."
                .into(),
        },
    ]
}

/// Look up a built-in template by id.
#[must_use]
pub fn builtin_template(id: &str) -> Option<PromptTemplate> {
    builtin_templates().into_iter().find(|t| t.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> ProductInfo {
        ProductInfo {
            name: "Aurora Strip".into(),
            features: vec![
                "waterproof".into(),
                "dimmable".into(),
                "16M colors".into(),
                "5m reel".into(),
            ],
            target_audience: None,
            scene_description: None,
            poster_aspect_ratio: None,
            source_image_ref: "uploads/a.jpg".into(),
        }
    }

    #[test]
    fn three_defaults_with_distinct_ids_and_styles() {
        let proposals = default_proposals(&product());
        assert_eq!(proposals.len(), 3);
        let ids: Vec<_> = proposals.iter().map(|p| p.proposal_id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2", "p3"]);
        let styles: std::collections::HashSet<_> =
            proposals.iter().map(|p| p.style_name.as_str()).collect();
        assert_eq!(styles.len(), 3);
    }

    #[test]
    fn defaults_carry_product_copy() {
        for p in default_proposals(&product()) {
            assert_eq!(p.displayed_text.headline, "Aurora Strip");
            assert!(!p.displayed_text.tagline.is_empty());
            assert_eq!(p.displayed_text.features.len(), MAX_DISPLAYED_FEATURES);
        }
    }

    #[test]
    fn defaults_honor_requested_ratio() {
        let mut product = product();
        product.poster_aspect_ratio = Some(AspectRatio::Tall);
        for p in default_proposals(&product) {
            assert_eq!(p.poster_aspect_ratio, AspectRatio::Tall);
        }
    }

    #[test]
    fn builtin_template_lookup() {
        assert!(builtin_template("strip").is_some());
        assert!(builtin_template("chandelier").is_none());
        for t in builtin_templates() {
            assert!(t.template.contains("{productName}"));
            assert!(t.template.contains("{features}"));
        }
    }
}
