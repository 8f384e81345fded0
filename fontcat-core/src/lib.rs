//! fontcat-core: the card catalogue behind a font browsing service
//!
//! Picture a reading room where every Google Fonts family has an index card:
//! its name, its styles, where its files live, and whether it can stretch
//! along a variable axis. This crate keeps those cards in order and answers
//! the questions a browser asks of them.
//!
//! ## What lives here
//!
//! - [`fontid`]: turns `"Open Sans"` into `"open-sans"` and back again
//!   (a little lossy on the return trip, like any good souvenir)
//! - [`variant`]: reads a token like `"700italic"` as CSS weight and style
//! - [`css`]: writes the `@font-face` rules a preview needs
//! - [`filter`] and [`paginate`]: narrow the catalogue and cut it into pages
//! - [`catalog`] and [`search`]: load the two webfonts documents, join
//!   variable families with their static siblings, run a search
//! - [`validate`]: check a local METADATA.pb tree against the catalogue
//!
//! ## A short visit
//!
//! ```rust
//! use fontcat_core::catalog::{CatalogSet, WebfontsDocument};
//! use fontcat_core::search::SearchParams;
//!
//! let variable = WebfontsDocument::from_reader(
//!     r#"{"kind": "webfonts#webfontList", "items": [
//!         {"family": "Open Sans", "category": "sans-serif",
//!          "variants": ["regular"], "axes": [{"tag": "wght", "start": 300, "end": 800}]}
//!     ]}"#.as_bytes(),
//! )?;
//! let catalog = CatalogSet::new(variable, WebfontsDocument::default());
//!
//! let params = SearchParams {
//!     query: Some("sans".to_string()),
//!     property: Some("variable".to_string()),
//!     ..SearchParams::default()
//! };
//! let response = catalog.search(&params);
//! assert_eq!(response.results.total, 1);
//!
//! let font = catalog.lookup("open-sans")?;
//! assert_eq!(font.font.family, "Open Sans");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ---
//!
//! Crafted with care at FontLab https://www.fontlab.com/

pub mod catalog;
pub mod css;
pub mod filter;
pub mod fontid;
pub mod output;
pub mod paginate;
pub mod search;
pub mod validate;
pub mod variant;
