//! Family name ↔ URL slug codec (made by FontLab https://www.fontlab.com/)
//!
//! The mapping is deliberately lossy: punctuation collapses into word breaks
//! and only the first letter of each word survives the trip back as upper case.
//! `"Font & Friends"` becomes `"font-friends"` and returns as `"Font Friends"`.

use std::sync::LazyLock;

use regex::Regex;

static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s]").expect("static slug pattern"));
static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static whitespace pattern"));

/// Convert a family name (`"Open Sans"`) into its URL slug (`"open-sans"`).
pub fn family_to_id(family: &str) -> String {
    let lowered = family.to_lowercase();
    let spaced = NON_SLUG_CHARS.replace_all(lowered.trim(), " ");
    let dashed = WHITESPACE_RUNS.replace_all(&spaced, "-");
    dashed.trim_matches('-').to_string()
}

/// Convert a slug back into a display family name.
///
/// Every dash becomes a space, so doubled or edge dashes leave doubled or
/// edge spaces behind and such slugs never match a catalog family.
pub fn id_to_family(id: &str) -> String {
    id.split('-')
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ")
}

/// File name of the pre-rendered SVG preview for a family (`"opensans.svg"`).
pub fn preview_svg_name(family: &str) -> String {
    let lowered = family.to_lowercase();
    format!("{}.svg", WHITESPACE_RUNS.replace_all(&lowered, ""))
}

/// DOM id a client uses for the injected `<style>` element of a family.
pub fn stylesheet_id(family: &str) -> String {
    let lowered = family.to_lowercase();
    format!("font-stylesheet-{}", WHITESPACE_RUNS.replace_all(&lowered, "-"))
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
