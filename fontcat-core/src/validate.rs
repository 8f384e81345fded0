//! Cross-check local Google Fonts `METADATA.pb` trees against a catalog (made by FontLab https://www.fontlab.com/)
//!
//! Each family directory (e.g. `fonts/ofl/roboto/`) carries a `METADATA.pb`
//! describing its font files. Validation confirms those files exist locally,
//! that styles are `normal` or `italic`, that a family ships at most two
//! variable font files, and that every weight/style they declare is served by
//! the catalog. [`find_missing_previews`] checks the SVG preview folder.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use indexmap::IndexMap;
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::catalog::FontRecord;
use crate::fontid::preview_svg_name;

pub const METADATA_FILE: &str = "METADATA.pb";
/// Styles a METADATA.pb face may declare.
pub const ALLOWED_STYLES: [&str; 2] = ["normal", "italic"];
/// Most `Family[axes].ttf` files a family directory may hold.
pub const MAX_VARIABLE_FILES: usize = 2;

/// One `fonts { ... }` block of a METADATA.pb file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataFont {
    entries: IndexMap<String, String>,
}

impl MetadataFont {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.get("name")
    }

    pub fn filename(&self) -> Option<&str> {
        self.get("filename")
    }

    /// Declared style, `normal` when absent.
    pub fn style(&self) -> &str {
        self.get("style").unwrap_or("normal")
    }

    /// Catalog variant token for this face (`regular`, `italic`, `700`, `700italic`).
    pub fn variant(&self) -> String {
        let weight = self.get("weight").unwrap_or("400");
        let italic = self.style() != "normal";

        match (weight, italic) {
            ("400", false) => "regular".to_string(),
            ("400", true) => "italic".to_string(),
            (weight, false) => weight.to_string(),
            (weight, true) => format!("{weight}italic"),
        }
    }
}

/// Parse the `fonts { ... }` blocks of a METADATA.pb text. Empty blocks are dropped.
pub fn parse_metadata_pb(text: &str) -> Vec<MetadataFont> {
    let mut fonts = Vec::new();
    let mut current: Option<MetadataFont> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.starts_with("fonts {") {
            if let Some(done) = current.take().filter(|f| !f.entries.is_empty()) {
                fonts.push(done);
            }
            current = Some(MetadataFont::default());
        } else if line.starts_with('}') {
            if let Some(done) = current.take().filter(|f| !f.entries.is_empty()) {
                fonts.push(done);
            }
        } else if let Some(font) = current.as_mut() {
            if let Some((key, value)) = line.split_once(':') {
                font.entries.insert(
                    key.trim().to_string(),
                    value.trim().trim_matches('"').to_string(),
                );
            }
        }
    }

    fonts
}

/// Catalog records keyed by exact family name; later duplicates win.
#[derive(Debug, Clone, Default)]
pub struct FamilyIndex<'a> {
    by_family: HashMap<&'a str, &'a FontRecord>,
}

impl<'a> FamilyIndex<'a> {
    pub fn new(fonts: &'a [FontRecord]) -> Self {
        let by_family = fonts.iter().map(|f| (f.family.as_str(), f)).collect();
        Self { by_family }
    }

    pub fn get(&self, family: &str) -> Option<&'a FontRecord> {
        self.by_family.get(family).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub folder: PathBuf,
    pub family: Option<String>,
    pub message: String,
}

/// Variable font files follow the `Family[axes].ttf` naming convention.
pub fn is_variable_font_file(filename: &str) -> bool {
    filename.contains('[') && filename.contains(']') && filename.to_lowercase().ends_with(".ttf")
}

/// Variable font file names directly inside `dir`, sorted.
pub fn variable_font_files(dir: &Path) -> Vec<String> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .filter(|name| is_variable_font_file(name))
        .collect()
}

/// Validate a single family directory.
pub fn validate_family_dir(dir: &Path, index: &FamilyIndex<'_>) -> Vec<ValidationIssue> {
    let issue = |family: Option<&str>, message: String| ValidationIssue {
        folder: dir.to_path_buf(),
        family: family.map(str::to_string),
        message,
    };

    let mut issues = Vec::new();
    let variable_files = variable_font_files(dir);
    if variable_files.len() > MAX_VARIABLE_FILES {
        issues.push(issue(
            None,
            format!(
                "{} variable font files, at most {MAX_VARIABLE_FILES} allowed: {}",
                variable_files.len(),
                variable_files.join(", ")
            ),
        ));
    }

    let metadata_path = dir.join(METADATA_FILE);
    if !metadata_path.exists() {
        issues.push(issue(None, format!("{METADATA_FILE} not found")));
        return issues;
    }

    let text = match fs::read_to_string(&metadata_path) {
        Ok(text) => text,
        Err(err) => {
            issues.push(issue(None, format!("reading {METADATA_FILE}: {err}")));
            return issues;
        }
    };

    let local_fonts = parse_metadata_pb(&text);
    let Some(first) = local_fonts.first() else {
        issues.push(issue(None, format!("no font entries in {METADATA_FILE}")));
        return issues;
    };
    let Some(family) = first.name() else {
        issues.push(issue(None, format!("family name missing from {METADATA_FILE}")));
        return issues;
    };

    let mut local_variants: IndexMap<&str, String> = IndexMap::new();
    for (position, font) in local_fonts.iter().enumerate() {
        let style = font.style();
        if !ALLOWED_STYLES.contains(&style) {
            issues.push(issue(
                Some(family),
                format!(
                    "invalid style {style} in font {}, only normal or italic allowed",
                    position + 1
                ),
            ));
        }
        let Some(filename) = font.filename() else {
            continue;
        };
        local_variants.insert(filename, font.variant());
        if !dir.join(filename).exists() {
            issues.push(issue(Some(family), format!("local file not found: {filename}")));
        }
    }

    if !issues.is_empty() {
        return issues;
    }

    let Some(record) = index.get(family) else {
        return vec![issue(Some(family), "family not found in catalog".to_string())];
    };

    for (filename, variant) in &local_variants {
        if !record.files.contains_key(variant) {
            issues.push(issue(
                Some(family),
                format!("variant {variant} not found in catalog for {filename}"),
            ));
        }
    }

    issues
}

/// Outcome of validating every family directory under a root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub total_fonts: usize,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn invalid_fonts(&self) -> usize {
        self.issues
            .iter()
            .map(|i| i.folder.as_path())
            .collect::<BTreeSet<_>>()
            .len()
    }

    pub fn valid_fonts(&self) -> usize {
        self.total_fonts - self.invalid_fonts()
    }

    /// Write `folder,font family name,reason(s)` rows, one per failing folder.
    /// Rows are CRLF-terminated to match spreadsheet-style CSV.
    pub fn write_csv(&self, mut w: impl Write) -> Result<()> {
        let mut grouped: BTreeMap<String, (String, BTreeSet<&str>)> = BTreeMap::new();
        for issue in &self.issues {
            let folder = folder_name(&issue.folder);
            let entry = grouped.entry(folder).or_default();
            if let Some(family) = &issue.family {
                entry.0 = family.clone();
            }
            entry.1.insert(issue.message.as_str());
        }

        write!(w, "folder,font family name,reason(s)\r\n")?;
        for (folder, (family, reasons)) in grouped {
            let reasons = reasons.into_iter().collect::<Vec<_>>().join("; ");
            write!(
                w,
                "{},{},{}\r\n",
                csv_field(&folder),
                csv_field(&family),
                csv_field(&reasons)
            )?;
        }
        Ok(())
    }
}

/// A catalog family without a pre-rendered preview image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingPreview {
    pub family: String,
    pub svg: String,
}

/// Families in `fonts` whose [`preview_svg_name`] is absent from `svg_dir`.
pub fn find_missing_previews(
    fonts: &[FontRecord],
    svg_dir: &Path,
) -> Result<Vec<MissingPreview>> {
    if !svg_dir.is_dir() {
        return Err(anyhow!(
            "preview directory does not exist: {}",
            svg_dir.display()
        ));
    }

    let mut present = HashSet::new();
    for entry in WalkDir::new(svg_dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if entry.file_type().is_file() {
            present.insert(entry.file_name().to_string_lossy().into_owned());
        }
    }

    Ok(fonts
        .iter()
        .filter_map(|font| {
            let svg = preview_svg_name(&font.family);
            (!present.contains(&svg)).then(|| MissingPreview {
                family: font.family.clone(),
                svg,
            })
        })
        .collect())
}

/// Validate every immediate subdirectory of `root` in parallel.
pub fn validate_tree(root: &Path, index: &FamilyIndex<'_>) -> Result<ValidationReport> {
    if !root.is_dir() {
        return Err(anyhow!("fonts directory does not exist: {}", root.display()));
    }

    let mut dirs = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        }
    }

    let issues: Vec<ValidationIssue> = dirs
        .par_iter()
        .flat_map_iter(|dir| validate_family_dir(dir, index))
        .collect();

    tracing::debug!(
        families = dirs.len(),
        issues = issues.len(),
        "validated metadata tree"
    );

    Ok(ValidationReport {
        total_fonts: dirs.len(),
        issues,
    })
}

fn folder_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn csv_field(raw: &str) -> String {
    if raw.contains(|c: char| matches!(c, ',' | '"' | '\n' | '\r')) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}
