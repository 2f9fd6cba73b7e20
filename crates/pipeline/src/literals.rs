//! Literal-integrity repair.
//!
//! After the enhancement call, the final prompt must still contain the
//! exact literal substrings the image model is told to render verbatim:
//! product name, feature list, headline, tagline, and the brand lock-up.
//! This is a textual post-condition check, not a semantic one; presence of
//! the exact substring is sufficient. Missing literals are re-inserted
//! with the deterministic base-prompt phrasing rather than re-invoking the
//! model. Everything here is a pure function over strings.

use posterforge_core::{AspectRatio, ProductInfo, Proposal};
use tracing::warn;

use crate::templates::{brand_block, QR_NOTE};

/// One literal token that must appear verbatim in the final prompt,
/// paired with the deterministic line to insert when it is missing.
#[derive(Debug, Clone)]
pub struct RequiredLiteral {
    /// The exact substring checked for.
    pub literal: String,
    /// The fallback phrasing appended when the literal is absent.
    pub fallback_line: String,
}

impl RequiredLiteral {
    fn new(literal: impl Into<String>, fallback_line: impl Into<String>) -> Self {
        Self {
            literal: literal.into(),
            fallback_line: fallback_line.into(),
        }
    }
}

/// The declarative list of required literals for a proposal selection.
///
/// Quoted tokens use the same double-quote wrapping as the base prompt.
/// The three brand literals share the closing block as their fallback, so
/// one re-insertion repairs all of them.
#[must_use]
pub fn required_literals(product: &ProductInfo, proposal: &Proposal) -> Vec<RequiredLiteral> {
    let text = &proposal.displayed_text;
    let feature_literal = product.feature_literal();
    let brand = brand_block();

    let mut required = vec![
        RequiredLiteral::new(
            format!("\"{}\"", product.name),
            format!("A commercial marketing poster for \"{}\".", product.name),
        ),
        RequiredLiteral::new(
            format!("\"{feature_literal}\""),
            format!("The feature text reads \"{feature_literal}\"."),
        ),
    ];
    if !text.headline.trim().is_empty() {
        required.push(RequiredLiteral::new(
            format!("\"{}\"", text.headline),
            format!("The headline reads \"{}\".", text.headline),
        ));
    }
    if !text.tagline.trim().is_empty() {
        required.push(RequiredLiteral::new(
            format!("\"{}\"", text.tagline),
            format!("The tagline reads \"{}\".", text.tagline),
        ));
    }
    required.push(RequiredLiteral::new(
        format!("\"{}\"", crate::templates::BRAND_NAME),
        brand.clone(),
    ));
    required.push(RequiredLiteral::new(
        format!("\"{}\"", crate::templates::BRAND_DOMAIN),
        brand.clone(),
    ));
    required.push(RequiredLiteral::new(QR_NOTE, brand));
    required
}

/// Re-insert any missing literals, appending their fallback lines in
/// declaration order. Checks run against the accumulating text, so a
/// shared fallback line (the brand block) is appended at most once.
#[must_use]
pub fn repair(candidate: &str, required: &[RequiredLiteral]) -> String {
    let mut repaired = candidate.trim_end().to_owned();
    for item in required {
        if !repaired.contains(&item.literal) {
            warn!(literal = %item.literal, "literal missing from enhanced prompt; re-inserting");
            repaired.push_str("\n\n");
            repaired.push_str(&item.fallback_line);
        }
    }
    repaired
}

/// Append the canvas-composition safety clause unless the prompt already
/// states the subject-area bound or the aspect ratio explicitly.
#[must_use]
pub fn ensure_composition_clause(prompt: String, ratio: AspectRatio) -> String {
    let has_area = prompt.contains("15-30%");
    let has_ratio = prompt.contains(ratio.as_str());
    if has_area && has_ratio {
        return prompt;
    }

    let mut out = prompt.trim_end().to_owned();
    out.push_str("\n\n");
    if !has_area {
        out.push_str("The product occupies 15-30% of the frame area. ");
    }
    if !has_ratio {
        out.push_str(&format!("Poster aspect ratio: {}.", ratio.as_str()));
    }
    out.trim_end().to_owned()
}

#[cfg(test)]
mod tests {
    use posterforge_core::DisplayedText;

    use super::*;
    use crate::templates::base_prompt;

    fn product() -> ProductInfo {
        ProductInfo {
            name: "Aurora Strip".into(),
            features: vec!["waterproof".into(), "dimmable".into()],
            target_audience: None,
            scene_description: None,
            poster_aspect_ratio: None,
            source_image_ref: "uploads/a.jpg".into(),
        }
    }

    fn proposal() -> Proposal {
        Proposal {
            proposal_id: "p1".into(),
            displayed_text: DisplayedText {
                headline: "Light Your Evenings".into(),
                tagline: "Comfort on demand".into(),
                features: vec!["waterproof".into()],
            },
            ..Proposal::default()
        }
    }

    #[test]
    fn intact_candidate_is_unchanged_except_trailing_whitespace() {
        let base = base_prompt(&proposal(), &product());
        let repaired = repair(&base, &required_literals(&product(), &proposal()));
        assert_eq!(repaired, base.trim_end());
    }

    #[test]
    fn missing_name_is_reinserted() {
        let candidate = "A pretty poster with soft light.";
        let repaired = repair(candidate, &required_literals(&product(), &proposal()));
        assert!(repaired.contains("\"Aurora Strip\""));
        assert!(repaired.starts_with(candidate));
    }

    #[test]
    fn all_literals_present_after_repair_of_empty_candidate() {
        let repaired = repair("", &required_literals(&product(), &proposal()));
        assert!(repaired.contains("\"Aurora Strip\""));
        assert!(repaired.contains("\"waterproof, dimmable\""));
        assert!(repaired.contains("\"Light Your Evenings\""));
        assert!(repaired.contains("\"Comfort on demand\""));
        assert!(repaired.contains("\"RS-LED\""));
        assert!(repaired.contains("\"www.rs-led.com\""));
        assert!(repaired.contains(QR_NOTE));
    }

    #[test]
    fn brand_block_appended_once_for_all_three_brand_literals() {
        let repaired = repair(
            "Just a scene description.",
            &required_literals(&product(), &proposal()),
        );
        let occurrences = repaired.matches("top left corner carries the brand logo").count();
        assert_eq!(occurrences, 1);
    }

    #[test]
    fn paraphrased_literal_counts_as_missing() {
        // "Aurora Strips" is not the exact quoted token.
        let candidate = "A poster for \"Aurora Strips\" with great light.";
        let repaired = repair(candidate, &required_literals(&product(), &proposal()));
        assert!(repaired.contains("A commercial marketing poster for \"Aurora Strip\"."));
    }

    #[test]
    fn blank_headline_not_required() {
        let mut p = proposal();
        p.displayed_text.headline = String::new();
        let required = required_literals(&product(), &p);
        assert!(!required.iter().any(|r| r.literal == "\"\""));
    }

    #[test]
    fn composition_clause_appended_when_absent() {
        let out = ensure_composition_clause("A plain prompt.".into(), AspectRatio::Square);
        assert!(out.contains("15-30%"));
        assert!(out.contains("1:1"));
    }

    #[test]
    fn composition_clause_skipped_when_present() {
        let prompt = "Subject occupies 15-30% of the frame. Poster aspect ratio: 16:9.";
        let out = ensure_composition_clause(prompt.to_owned(), AspectRatio::Wide);
        assert_eq!(out, prompt);
    }

    #[test]
    fn only_missing_half_of_clause_is_added() {
        let prompt = "Subject occupies 15-30% of the frame.";
        let out = ensure_composition_clause(prompt.to_owned(), AspectRatio::Tall);
        assert!(out.contains("9:16"));
        assert_eq!(out.matches("15-30%").count(), 1);
    }
}
