//! Prompt templates and meta-instructions.
//!
//! Everything here is a pure function over strings. The base prompt is
//! fully deterministic so later stages always have a well-formed text to
//! repair toward when enhancement fails or mangles a literal.

use posterforge_core::{ProductInfo, Proposal};

/// Brand logo text, rendered verbatim in the top left corner.
pub const BRAND_NAME: &str = "RS-LED";
/// Company domain, rendered verbatim in the bottom right corner.
pub const BRAND_DOMAIN: &str = "www.rs-led.com";
/// The QR-code placeholder phrase checked by the literal repair pass.
pub const QR_NOTE: &str = "small company QR code in the lower left corner";

/// The fixed closing block carrying the brand lock-up. Appears verbatim at
/// the end of every base prompt and is re-inserted whole if enhancement
/// drops any of its literals.
#[must_use]
pub fn brand_block() -> String {
    format!(
        "The top left corner carries the brand logo text \"{BRAND_NAME}\", \
         the bottom right corner shows the company domain \"{BRAND_DOMAIN}\", \
         and there is a {QR_NOTE}."
    )
}

/// Render the deterministic base prompt for a selected proposal.
///
/// Every literal value (product name, feature list, headline, tagline,
/// brand lock-up) is wrapped in double quotes; the quoted form is the
/// exact substring the repair pass checks for.
#[must_use]
pub fn base_prompt(proposal: &Proposal, product: &ProductInfo) -> String {
    let text = &proposal.displayed_text;
    let notes = &proposal.integration_notes;
    format!(
        "A commercial marketing poster for \"{name}\".\n\
         \n\
         The product sits at {placement}, kept exactly as photographed as the main \
         subject, occupying 15-30% of the frame area.\n\
         \n\
         Background: {background}.\n\
         \n\
         The feature text is placed at {text_placement} and reads \"{features}\".\n\
         \n\
         The headline reads \"{headline}\". The tagline reads \"{tagline}\".\n\
         \n\
         Overall layout: {layout}.\n\
         \n\
         Lighting requirements: {lighting}.\n\
         \n\
         Color tone: {color_tone}.\n\
         \n\
         Poster aspect ratio: {ratio}.\n\
         \n\
         Overall style: {style_name}. {style_description}\n\
         \n\
         Light integration: {light_integration} Installation context: \
         {installation_context} Visual harmony: {visual_harmony}\n\
         \n\
         {brand}",
        name = product.name,
        placement = non_empty(&proposal.product_placement, "the center of the poster"),
        background = non_empty(&proposal.background_description, "a clean studio setting"),
        text_placement = non_empty(&proposal.text_placement, "the bottom of the poster"),
        features = product.feature_literal(),
        headline = text.headline,
        tagline = text.tagline,
        layout = non_empty(&proposal.layout_description, "balanced composition"),
        lighting = non_empty(&proposal.lighting_requirements, "soft, natural lighting"),
        color_tone = non_empty(&proposal.color_tone, "neutral tones"),
        ratio = proposal.poster_aspect_ratio,
        style_name = non_empty(&proposal.style_name, "Modern"),
        style_description = proposal.style_description,
        light_integration = notes.light_integration,
        installation_context = notes.installation_context,
        visual_harmony = notes.visual_harmony,
        brand = brand_block(),
    )
}

/// Instruction asking the text model for 3-5 schema-constrained proposals.
#[must_use]
pub fn proposal_instruction(product: &ProductInfo) -> String {
    let mut instruction = format!(
        "You are an expert at writing prompts for text-to-image models, \
         specializing in commercial product posters. Generate between 3 and 5 \
         distinct poster design proposals for the product below. The user's \
         uploaded photo will be used unchanged as the poster subject, so do \
         not describe the product foreground; design backgrounds, layout, \
         lighting, and copy around it.\n\
         \n\
         Product name: \"{name}\"\n\
         Product features: \"{features}\"\n\
         Target audience: \"{audience}\"\n",
        name = product.name,
        features = product.feature_literal(),
        audience = product.target_audience.as_deref().unwrap_or("unspecified"),
    );
    if let Some(scene) = &product.scene_description {
        instruction.push_str(&format!(
            "Usage scene: \"{scene}\" (fold this into the background descriptions).\n"
        ));
    }
    instruction.push_str(
        "\nEach proposal must describe how the product's light interacts \
         physically with the scene (reflections, cast light, color \
         temperature), keep proportions and perspective realistic, and \
         harmonize materials and palette between product and background. \
         Vary the designs across styles (modern minimal, high tech, warm \
         home, commercial) and settings. Each proposal's displayed text must \
         include a headline, a tagline, and at most 3 short feature lines. \
         Respond with a JSON array matching the provided schema.",
    );
    instruction
}

/// JSON schema constraining the proposal array: 3-5 items, required
/// non-empty displayed text, the 3-value aspect-ratio enum, at most 3
/// displayed features.
#[must_use]
pub fn proposal_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "array",
        "minItems": 3,
        "maxItems": 5,
        "items": {
            "type": "object",
            "properties": {
                "proposalId": { "type": "string" },
                "styleName": { "type": "string" },
                "styleDescription": { "type": "string" },
                "productPlacement": { "type": "string" },
                "backgroundDescription": { "type": "string" },
                "textPlacement": { "type": "string" },
                "layoutDescription": { "type": "string" },
                "lightingRequirements": { "type": "string" },
                "colorTone": { "type": "string" },
                "posterAspectRatio": { "type": "string", "enum": ["16:9", "9:16", "1:1"] },
                "integrationNotes": {
                    "type": "object",
                    "properties": {
                        "lightIntegration": { "type": "string" },
                        "installationContext": { "type": "string" },
                        "visualHarmony": { "type": "string" }
                    }
                },
                "displayedText": {
                    "type": "object",
                    "properties": {
                        "headline": { "type": "string", "minLength": 1 },
                        "tagline": { "type": "string", "minLength": 1 },
                        "features": {
                            "type": "array",
                            "items": { "type": "string" },
                            "maxItems": 3
                        }
                    },
                    "required": ["headline", "tagline", "features"]
                }
            },
            "required": [
                "styleName", "styleDescription", "productPlacement",
                "backgroundDescription", "textPlacement", "layoutDescription",
                "lightingRequirements", "colorTone", "posterAspectRatio",
                "displayedText"
            ]
        }
    })
}

/// Meta-instruction asking the model to stylistically enhance a base
/// prompt while preserving every quoted literal and the closing block.
#[must_use]
pub fn enhancement_instruction(base_prompt: &str, product: &ProductInfo) -> String {
    format!(
        "Refine the poster-generation prompt below so it produces a higher \
         quality marketing poster: enrich the visual detail (light behavior, \
         color, atmosphere), strengthen the link between the product \
         features and the scene, and keep the element order and structure.\n\
         \n\
         Base prompt:\n{base_prompt}\n\
         \n\
         Product name: \"{name}\"\n\
         Product features: \"{features}\"\n\
         \n\
         Strict requirements, do not modify any of these:\n\
         - the product name in quotes: \"{name}\"\n\
         - the feature text in quotes: \"{features}\"\n\
         - the brand logo text \"{brand}\" in the top left corner\n\
         - the company domain \"{domain}\" in the bottom right corner\n\
         - the {qr}\n\
         - keep the uploaded photo unchanged as the poster subject; do not \
           describe the product foreground\n\
         \n\
         Return only the refined prompt with no explanation.",
        name = product.name,
        features = product.feature_literal(),
        brand = BRAND_NAME,
        domain = BRAND_DOMAIN,
        qr = QR_NOTE,
    )
}

/// Meta-instruction for the legacy template path: optimize a
/// caller-supplied prompt in one non-retried call.
#[must_use]
pub fn optimize_instruction(base_prompt: &str, product: &ProductInfo) -> String {
    format!(
        "Improve the poster-generation prompt below for the product \
         \"{name}\" (features: \"{features}\"). Make the visual description \
         more specific and professional while keeping the product name and \
         feature text verbatim in quotes. Return only the improved prompt.\n\
         \n\
         {base_prompt}",
        name = product.name,
        features = product.feature_literal(),
    )
}

/// Generic default prompt assembled from product info alone, used when a
/// generation request carries no selection, raw prompt, or template. Ends
/// with the brand block so the literal invariants hold on this path too.
#[must_use]
pub fn generic_prompt(product: &ProductInfo) -> String {
    let ratio = product.poster_aspect_ratio.unwrap_or_default();
    format!(
        "A professional commercial marketing poster for \"{name}\".\n\
         \n\
         The uploaded product photo is kept unchanged as the main subject, \
         occupying 15-30% of the frame area, with a clean modern background \
         that suits the product.\n\
         \n\
         The feature text reads \"{features}\" and is placed where it is \
         easy to read.\n\
         \n\
         Poster aspect ratio: {ratio}.\n\
         \n\
         {brand}",
        name = product.name,
        features = product.feature_literal(),
        brand = brand_block(),
    )
}

/// Substitute `{productName}` and `{features}` placeholders in a stored
/// prompt template.
#[must_use]
pub fn render_template(template: &str, product: &ProductInfo) -> String {
    template
        .replace("{productName}", &product.name)
        .replace("{features}", &product.feature_literal())
}

fn non_empty<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() {
        default
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use posterforge_core::{AspectRatio, DisplayedText, IntegrationNotes};

    use super::*;

    fn product() -> ProductInfo {
        ProductInfo {
            name: "Aurora Strip".into(),
            features: vec!["waterproof".into(), "dimmable".into()],
            target_audience: Some("homeowners".into()),
            scene_description: None,
            poster_aspect_ratio: None,
            source_image_ref: "uploads/a.jpg".into(),
        }
    }

    fn proposal() -> Proposal {
        Proposal {
            proposal_id: "p1".into(),
            style_name: "Warm Home".into(),
            style_description: "Cozy evening light.".into(),
            product_placement: "the upper third".into(),
            background_description: "a living room at dusk".into(),
            text_placement: "the lower band".into(),
            layout_description: "rule-of-thirds".into(),
            lighting_requirements: "warm diffuse glow".into(),
            color_tone: "amber and walnut".into(),
            poster_aspect_ratio: AspectRatio::Tall,
            integration_notes: IntegrationNotes {
                light_integration: "Strip light washes the ceiling.".into(),
                installation_context: "Mounted under the shelf.".into(),
                visual_harmony: "Amber glow echoes the wood.".into(),
            },
            displayed_text: DisplayedText {
                headline: "Light Your Evenings".into(),
                tagline: "Comfort at a dimmer's touch".into(),
                features: vec!["waterproof".into(), "dimmable".into()],
            },
        }
    }

    #[test]
    fn base_prompt_is_deterministic() {
        let a = base_prompt(&proposal(), &product());
        let b = base_prompt(&proposal(), &product());
        assert_eq!(a, b);
    }

    #[test]
    fn base_prompt_contains_all_literals() {
        let prompt = base_prompt(&proposal(), &product());
        assert!(prompt.contains("\"Aurora Strip\""));
        assert!(prompt.contains("\"waterproof, dimmable\""));
        assert!(prompt.contains("\"Light Your Evenings\""));
        assert!(prompt.contains("\"Comfort at a dimmer's touch\""));
        assert!(prompt.contains("\"RS-LED\""));
        assert!(prompt.contains("\"www.rs-led.com\""));
        assert!(prompt.contains(QR_NOTE));
        assert!(prompt.contains("15-30%"));
        assert!(prompt.contains("9:16"));
    }

    #[test]
    fn base_prompt_defaults_blank_fields() {
        let mut p = proposal();
        p.product_placement = String::new();
        p.color_tone = "  ".into();
        let prompt = base_prompt(&p, &product());
        assert!(prompt.contains("the center of the poster"));
        assert!(prompt.contains("neutral tones"));
    }

    #[test]
    fn proposal_schema_constrains_count_and_ratio() {
        let schema = proposal_schema();
        assert_eq!(schema["minItems"], 3);
        assert_eq!(schema["maxItems"], 5);
        assert_eq!(
            schema["items"]["properties"]["posterAspectRatio"]["enum"],
            serde_json::json!(["16:9", "9:16", "1:1"])
        );
        assert_eq!(
            schema["items"]["properties"]["displayedText"]["properties"]["features"]["maxItems"],
            3
        );
    }

    #[test]
    fn instruction_embeds_product_fields() {
        let mut p = product();
        p.scene_description = Some("a rooftop bar".into());
        let instruction = proposal_instruction(&p);
        assert!(instruction.contains("\"Aurora Strip\""));
        assert!(instruction.contains("\"waterproof, dimmable\""));
        assert!(instruction.contains("\"homeowners\""));
        assert!(instruction.contains("a rooftop bar"));
    }

    #[test]
    fn generic_prompt_carries_brand_block() {
        let prompt = generic_prompt(&product());
        assert!(prompt.contains("\"RS-LED\""));
        assert!(prompt.contains("\"www.rs-led.com\""));
        assert!(prompt.contains(QR_NOTE));
        assert!(prompt.contains("16:9"));
    }

    #[test]
    fn render_template_substitutes_placeholders() {
        let rendered = render_template(
            "Create a poster for {productName} highlighting {features}.",
            &product(),
        );
        assert_eq!(
            rendered,
            "Create a poster for Aurora Strip highlighting waterproof, dimmable."
        );
    }
}
