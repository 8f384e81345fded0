//! Variant token → CSS weight/style mapping (made by FontLab https://www.fontlab.com/)

use serde::Serialize;

const CSS_WEIGHTS: [&str; 9] = [
    "100", "200", "300", "400", "500", "600", "700", "800", "900",
];
const ITALIC_SUFFIX: &str = "italic";

/// CSS `font-weight` / `font-style` pair derived from a variant token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FontVariantStyle {
    pub font_weight: &'static str,
    pub font_style: &'static str,
}

/// Parse a Google Fonts variant token (`"regular"`, `"italic"`, `"300"`, `"700italic"`).
///
/// Unknown weights fall back to `"400"`; the function never fails.
pub fn parse_font_variant(variant: &str) -> FontVariantStyle {
    match variant {
        "regular" => return style("400", false),
        "italic" => return style("400", true),
        _ => {}
    }

    let (weight_key, italic) = match variant.strip_suffix(ITALIC_SUFFIX) {
        Some(weight) => (weight, true),
        None => (variant, false),
    };

    let weight = CSS_WEIGHTS
        .iter()
        .copied()
        .find(|w| *w == weight_key)
        .unwrap_or("400");

    style(weight, italic)
}

fn style(font_weight: &'static str, italic: bool) -> FontVariantStyle {
    FontVariantStyle {
        font_weight,
        font_style: if italic { "italic" } else { "normal" },
    }
}
