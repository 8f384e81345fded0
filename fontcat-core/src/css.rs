//! `@font-face` stylesheet generation for font previews (made by FontLab https://www.fontlab.com/)

use indexmap::IndexMap;
use serde::Serialize;

use crate::catalog::{CombinedFontRecord, FontRecord};
use crate::fontid::{family_to_id, preview_svg_name, stylesheet_id};
use crate::variant::{parse_font_variant, FontVariantStyle};

/// Anything that can supply a family name plus variant → file URL pairs.
pub trait FontFaceSource {
    fn family(&self) -> &str;
    fn face_variants(&self) -> &[String];
    fn face_files(&self) -> &IndexMap<String, String>;
}

impl FontFaceSource for FontRecord {
    fn family(&self) -> &str {
        &self.family
    }

    fn face_variants(&self) -> &[String] {
        &self.variants
    }

    fn face_files(&self) -> &IndexMap<String, String> {
        &self.files
    }
}

/// Combined records prefer the static catalog's discrete files when present.
impl FontFaceSource for CombinedFontRecord {
    fn family(&self) -> &str {
        &self.font.family
    }

    fn face_variants(&self) -> &[String] {
        match &self.static_font {
            Some(static_font) => &static_font.variants,
            None => &self.font.variants,
        }
    }

    fn face_files(&self) -> &IndexMap<String, String> {
        match &self.static_font {
            Some(static_font) => &static_font.files,
            None => &self.font.files,
        }
    }
}

/// Variants that have a file, in variant order, paired with their URL.
fn declared_faces<'a, F: FontFaceSource>(font: &'a F) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
    let files = font.face_files();
    font.face_variants()
        .iter()
        .filter_map(move |variant| Some((variant.as_str(), files.get(variant)?.as_str())))
}

/// Emit one `@font-face` block per variant that has a file, in variant order.
///
/// Returns an empty string when nothing can be declared.
pub fn generate_font_face_css(font: &impl FontFaceSource) -> String {
    let family = font.family();

    declared_faces(font)
        .map(|(variant, url)| {
            let style = parse_font_variant(variant);
            format!(
                "@font-face {{\n  font-family: \"{family}\";\n  src: url(\"{url}\");\n  font-weight: {};\n  font-style: {};\n  font-display: swap;\n}}",
                style.font_weight, style.font_style
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// One declared face as a preview page shows it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacePreview {
    pub variant: String,
    pub class_name: String,
    #[serde(flatten)]
    pub style: FontVariantStyle,
    pub url: String,
}

/// Everything a client needs to render a family preview: the stylesheet,
/// the DOM id to inject it under, the static SVG name and per-face classes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FontPreview {
    pub family: String,
    pub stylesheet_id: String,
    pub preview_svg: String,
    pub faces: Vec<FacePreview>,
    pub css: String,
}

pub fn font_preview(font: &impl FontFaceSource) -> FontPreview {
    let family = font.family();
    let faces = declared_faces(font)
        .map(|(variant, url)| FacePreview {
            variant: variant.to_string(),
            class_name: variant_class_name(family, variant),
            style: parse_font_variant(variant),
            url: url.to_string(),
        })
        .collect();

    FontPreview {
        family: family.to_string(),
        stylesheet_id: stylesheet_id(family),
        preview_svg: preview_svg_name(family),
        faces,
        css: generate_font_face_css(font),
    }
}

/// Class name for a single face, e.g. `font-open-sans-700-italic`.
pub fn variant_class_name(family: &str, variant: &str) -> String {
    let style = parse_font_variant(variant);
    format!(
        "font-{}-{}-{}",
        family_to_id(family),
        style.font_weight,
        style.font_style
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font(variants: &[&str], files: &[(&str, &str)]) -> FontRecord {
        FontRecord {
            family: "Test Font".to_string(),
            variants: variants.iter().map(|v| v.to_string()).collect(),
            subsets: vec!["latin".to_string()],
            version: "v1".to_string(),
            last_modified: "2025-01-01".to_string(),
            files: files
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            category: "sans-serif".to_string(),
            kind: "webfonts#webfont".to_string(),
            menu: "https://example.com/font-menu.woff2".to_string(),
            axes: None,
        }
    }

    #[test]
    fn renders_exact_block_layout() {
        let css = generate_font_face_css(&font(
            &["700italic"],
            &[("700italic", "https://example.com/b.woff2")],
        ));
        assert_eq!(
            css,
            "@font-face {\n  font-family: \"Test Font\";\n  src: url(\"https://example.com/b.woff2\");\n  font-weight: 700;\n  font-style: italic;\n  font-display: swap;\n}"
        );
    }

    #[test]
    fn blocks_follow_variant_order_and_are_blank_line_separated() {
        let css = generate_font_face_css(&font(
            &["700", "300"],
            &[("300", "https://x/300"), ("700", "https://x/700")],
        ));
        let blocks: Vec<&str> = css.split("\n\n").collect();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].contains("font-weight: 700;"));
        assert!(blocks[1].contains("font-weight: 300;"));
    }

    #[test]
    fn variants_without_files_are_skipped() {
        let css = generate_font_face_css(&font(&["300", "400"], &[("300", "https://x/300")]));
        assert_eq!(css.matches("@font-face").count(), 1);
        assert!(css.contains("font-weight: 300;"));
        assert!(!css.contains("font-weight: 400;"));
    }

    #[test]
    fn nothing_to_declare_is_empty() {
        assert_eq!(generate_font_face_css(&font(&[], &[])), "");
        assert_eq!(generate_font_face_css(&font(&["regular"], &[])), "");
    }

    #[test]
    fn combined_record_uses_static_files() {
        let combined = CombinedFontRecord {
            font: font(&["regular"], &[("regular", "https://x/vf.ttf")]),
            static_font: Some(font(
                &["regular", "italic"],
                &[("regular", "https://x/r.ttf"), ("italic", "https://x/i.ttf")],
            )),
        };

        let css = generate_font_face_css(&combined);
        assert!(css.contains("src: url(\"https://x/r.ttf\");"));
        assert!(css.contains("src: url(\"https://x/i.ttf\");"));
        assert!(css.contains("font-style: italic;"));
        assert!(!css.contains("vf.ttf"));
    }

    #[test]
    fn combined_record_without_static_uses_own_files() {
        let combined = CombinedFontRecord {
            font: font(&["regular"], &[("regular", "https://x/vf.ttf")]),
            static_font: None,
        };
        assert!(generate_font_face_css(&combined).contains("vf.ttf"));
    }

    #[test]
    fn preview_lists_declared_faces_with_classes() {
        let combined = CombinedFontRecord {
            font: font(&["regular"], &[("regular", "https://x/vf.ttf")]),
            static_font: Some(font(
                &["300", "700italic", "900"],
                &[("300", "https://x/300.ttf"), ("700italic", "https://x/700i.ttf")],
            )),
        };

        let preview = font_preview(&combined);
        assert_eq!(preview.family, "Test Font");
        assert_eq!(preview.stylesheet_id, "font-stylesheet-test-font");
        assert_eq!(preview.preview_svg, "testfont.svg");
        assert_eq!(preview.faces.len(), 2);
        assert_eq!(preview.faces[1].class_name, "font-test-font-700-italic");
        assert_eq!(preview.faces[1].url, "https://x/700i.ttf");
        assert_eq!(preview.css, generate_font_face_css(&combined));

        let json = serde_json::to_value(&preview).expect("serialize");
        assert_eq!(json["stylesheetId"], "font-stylesheet-test-font");
        assert_eq!(json["faces"][0]["fontWeight"], "300");
        assert_eq!(json["faces"][0]["fontStyle"], "normal");
        assert_eq!(json["faces"][0]["className"], "font-test-font-300-normal");
    }

    #[test]
    fn class_names() {
        assert_eq!(
            variant_class_name("Open Sans", "700italic"),
            "font-open-sans-700-italic"
        );
        assert_eq!(
            variant_class_name("Open Sans", "regular"),
            "font-open-sans-400-normal"
        );
    }
}
