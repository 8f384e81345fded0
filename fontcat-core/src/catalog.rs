//! Catalog model, loading and family lookup (made by FontLab https://www.fontlab.com/)

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Number;
use thiserror::Error;

use crate::fontid::id_to_family;
use crate::paginate::paginate_fonts;
use crate::search::{search_catalog, InitialFonts, SearchParams, SearchResponse, DEFAULT_LIMIT};

/// One axis of a variable font (`wght` 100..900 and friends).
///
/// Bounds stay as JSON numbers so `300` is served back as `300`, not `300.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontAxis {
    pub tag: String,
    pub start: Number,
    pub end: Number,
}

/// A single family entry from a webfonts catalog document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontRecord {
    pub family: String,
    #[serde(default)]
    pub variants: Vec<String>,
    #[serde(default)]
    pub subsets: Vec<String>,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub last_modified: String,
    #[serde(default)]
    pub files: IndexMap<String, String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub menu: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axes: Option<Vec<FontAxis>>,
}

impl FontRecord {
    /// A record is variable when it declares at least one axis.
    pub fn is_variable(&self) -> bool {
        self.axes.as_ref().is_some_and(|axes| !axes.is_empty())
    }
}

/// A variable-catalog record joined with its static-catalog counterpart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedFontRecord {
    #[serde(flatten)]
    pub font: FontRecord,
    #[serde(rename = "static")]
    pub static_font: Option<FontRecord>,
}

/// Root of a webfonts JSON document (`{"kind": ..., "items": [...]}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebfontsDocument {
    #[serde(default)]
    pub kind: String,
    pub items: Vec<FontRecord>,
}

impl WebfontsDocument {
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        serde_json::from_reader(reader).context("parsing webfonts document")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("opening catalog {}", path.display()))?;
        Self::from_reader(BufReader::new(file))
            .with_context(|| format!("loading catalog {}", path.display()))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("font not found: {id}")]
    NotFound { id: String },
}

/// Find the best match for `family`: exact case-insensitive first, then the
/// first record whose family contains it. Catalog order breaks ties.
pub fn find_family<'a>(items: &'a [FontRecord], family: &str) -> Option<&'a FontRecord> {
    let wanted = family.to_lowercase();
    items
        .iter()
        .find(|font| font.family.to_lowercase() == wanted)
        .or_else(|| {
            items
                .iter()
                .find(|font| font.family.to_lowercase().contains(&wanted))
        })
}

/// The variable and static catalogs, loaded once and never mutated.
#[derive(Debug, Clone, Default)]
pub struct CatalogSet {
    variable: WebfontsDocument,
    statics: WebfontsDocument,
}

impl CatalogSet {
    pub fn new(variable: WebfontsDocument, statics: WebfontsDocument) -> Self {
        Self { variable, statics }
    }

    /// Load both catalog documents. This is the only hard failure in the service.
    pub fn load(variable_path: &Path, static_path: &Path) -> Result<Self> {
        let variable = WebfontsDocument::from_path(variable_path)?;
        let statics = WebfontsDocument::from_path(static_path)?;
        tracing::info!(
            variable = variable.items.len(),
            statics = statics.items.len(),
            "loaded font catalogs"
        );
        Ok(Self::new(variable, statics))
    }

    pub fn variable_fonts(&self) -> &[FontRecord] {
        &self.variable.items
    }

    pub fn static_fonts(&self) -> &[FontRecord] {
        &self.statics.items
    }

    /// Resolve a slug to a combined record, or `NotFound` when the variable
    /// catalog has no matching family.
    pub fn lookup(&self, id: &str) -> Result<CombinedFontRecord, LookupError> {
        let family = id_to_family(id);
        let Some(font) = find_family(&self.variable.items, &family) else {
            tracing::debug!(id, family = %family, "no catalog entry for slug");
            return Err(LookupError::NotFound { id: id.to_string() });
        };
        let static_font = find_family(&self.statics.items, &family).cloned();

        Ok(CombinedFontRecord {
            font: font.clone(),
            static_font,
        })
    }

    pub fn search(&self, params: &SearchParams) -> SearchResponse {
        let response = search_catalog(&self.variable.items, params);
        tracing::debug!(
            query = ?params.query,
            property = ?params.property,
            category = ?params.category,
            total = response.results.total,
            "catalog search"
        );
        response
    }

    /// First page of the unfiltered variable catalog.
    pub fn initial_page(&self) -> InitialFonts {
        let page = paginate_fonts(&self.variable.items, 1, DEFAULT_LIMIT);
        InitialFonts {
            fonts: page.fonts,
            total: page.total,
            fontlist_count: self.variable.items.len(),
        }
    }
}
