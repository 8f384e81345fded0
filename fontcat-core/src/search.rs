//! Search pipeline: filter the variable catalog, then paginate (made by FontLab https://www.fontlab.com/)

use serde::{Deserialize, Serialize};

use crate::catalog::FontRecord;
use crate::filter::FontFilter;
use crate::paginate::{paginate_fonts, FontPage};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 100;

/// Inputs of a catalog search, as supplied by the HTTP layer or the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub query: Option<String>,
    pub property: Option<String>,
    pub category: Option<String>,
    pub page: i64,
    pub limit: i64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            query: None,
            property: None,
            category: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl SearchParams {
    pub fn filter(&self) -> FontFilter {
        FontFilter::from_parts(
            self.query.as_deref(),
            self.property.as_deref(),
            self.category.as_deref(),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    pub property: Option<String>,
    pub category: Option<String>,
}

/// Search result envelope. `fontlist_count` is the unfiltered catalog size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(flatten)]
    pub results: FontPage,
    pub fontlist_count: usize,
    pub query: Option<String>,
    pub filters: SearchFilters,
}

/// First page shown before any search has been made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialFonts {
    pub fonts: Vec<FontRecord>,
    pub total: usize,
    pub fontlist_count: usize,
}

/// Filter `fonts` with `params` and cut out the requested page.
pub fn search_catalog(fonts: &[FontRecord], params: &SearchParams) -> SearchResponse {
    let matches = params.filter().apply(fonts);
    let results = paginate_fonts(&matches, params.page, params.limit);

    SearchResponse {
        results,
        fontlist_count: fonts.len(),
        query: params.query.clone(),
        filters: SearchFilters {
            property: params.property.clone(),
            category: params.category.clone(),
        },
    }
}
