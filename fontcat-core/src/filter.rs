//! Catalog filtering by free text, variable/static property and category (made by FontLab https://www.fontlab.com/)

use crate::catalog::FontRecord;

/// Variable/static selector. Unrecognised values select everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Property {
    #[default]
    Any,
    Variable,
    Static,
}

impl Property {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "variable" => Property::Variable,
            "static" => Property::Static,
            _ => Property::Any,
        }
    }

    pub fn matches(self, font: &FontRecord) -> bool {
        match self {
            Property::Any => true,
            Property::Variable => font.is_variable(),
            Property::Static => !font.is_variable(),
        }
    }
}

/// Filter pipeline over catalog records. Each stage only applies when set.
#[derive(Debug, Clone, Default)]
pub struct FontFilter {
    term: Option<String>,
    property: Property,
    category: Option<String>,
}

impl FontFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: &str) -> Self {
        self.term = non_empty_lowercase(query);
        self
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.property = property;
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = non_empty_lowercase(category);
        self
    }

    /// Build a filter from raw request values; `None` and `""` skip a stage.
    pub fn from_parts(
        query: Option<&str>,
        property: Option<&str>,
        category: Option<&str>,
    ) -> Self {
        let mut filter = Self::new();
        if let Some(query) = query {
            filter = filter.with_query(query);
        }
        if let Some(property) = property {
            filter = filter.with_property(Property::parse(property));
        }
        if let Some(category) = category {
            filter = filter.with_category(category);
        }
        filter
    }

    /// Check whether a record passes every configured stage.
    pub fn matches(&self, font: &FontRecord) -> bool {
        if let Some(term) = &self.term {
            let hit = font.family.to_lowercase().contains(term)
                || font.category.to_lowercase().contains(term)
                || font
                    .variants
                    .iter()
                    .any(|variant| variant.to_lowercase().contains(term));
            if !hit {
                return false;
            }
        }

        if !self.property.matches(font) {
            return false;
        }

        if let Some(category) = &self.category {
            if font.category.to_lowercase() != *category {
                return false;
            }
        }

        true
    }

    /// Surviving records, in their original order.
    pub fn apply(&self, fonts: &[FontRecord]) -> Vec<FontRecord> {
        fonts
            .iter()
            .filter(|font| self.matches(font))
            .cloned()
            .collect()
    }
}

/// Filter `fonts` by optional query, property and category.
pub fn filter_fonts(
    fonts: &[FontRecord],
    query: Option<&str>,
    property: Option<&str>,
    category: Option<&str>,
) -> Vec<FontRecord> {
    FontFilter::from_parts(query, property, category).apply(fonts)
}

fn non_empty_lowercase(raw: &str) -> Option<String> {
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_lowercase())
    }
}
