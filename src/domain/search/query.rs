//! Search query types and input normalization

use serde::{Deserialize, Serialize};

/// Default page number when the caller passes something unusable
pub const DEFAULT_PAGE: u32 = 1;
/// Default page size when the caller passes something unusable
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Optional narrowing of a search to a single attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldHint {
    DisplayForm,
    /// Covers both transliteration fields
    Phonetic,
    Definition,
    Provenance,
}

impl FieldHint {
    pub fn as_str(&self) -> &str {
        match self {
            Self::DisplayForm => "display_form",
            Self::Phonetic => "phonetic",
            Self::Definition => "definition",
            Self::Provenance => "provenance",
        }
    }
}

/// Normalizes raw search input: trims surrounding whitespace and lower-cases
/// so that matching is case-insensitive. An empty result means "no filter" -
/// every entry is a candidate.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Search request parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Raw query text as the caller typed it
    pub raw: String,
    /// Optional single-field narrowing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_hint: Option<FieldHint>,
    /// 1-indexed page number
    pub page: u32,
    /// Number of items per page
    pub page_size: u32,
}

impl SearchQuery {
    /// Create a new query with default pagination
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            field_hint: None,
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_field_hint(mut self, hint: FieldHint) -> Self {
        self.field_hint = Some(hint);
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Out-of-range pagination values are clamped to defaults, never rejected
    pub fn clamped(mut self) -> Self {
        if self.page < 1 {
            self.page = DEFAULT_PAGE;
        }
        if self.page_size < 1 {
            self.page_size = DEFAULT_PAGE_SIZE;
        }
        self
    }

    /// Normalized query text
    pub fn normalized(&self) -> String {
        normalize(&self.raw)
    }
}
