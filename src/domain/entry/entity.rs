//! Dictionary entry entity and related types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when validating an entry identifier
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntryValidationError {
    #[error("Entry ID cannot be empty")]
    EmptyId,

    #[error("Entry ID cannot contain whitespace: '{0}'")]
    WhitespaceInId(String),
}

/// Entry identifier - stable and immutable for the lifetime of the record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntryId(String);

impl EntryId {
    /// Create a new EntryId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, EntryValidationError> {
        let id = id.into();

        if id.is_empty() {
            return Err(EntryValidationError::EmptyId);
        }
        if id.chars().any(char::is_whitespace) {
            return Err(EntryValidationError::WhitespaceInId(id));
        }

        Ok(Self(id))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EntryId {
    type Error = EntryValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EntryId> for String {
    fn from(id: EntryId) -> Self {
        id.0
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One dictionary entry: a fixed-form phrase with its transliterations,
/// definition, origin text, and a usage example.
///
/// The search core never mutates entries, it only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdiomEntry {
    /// Unique, immutable identifier
    id: EntryId,
    /// The phrase itself
    display_form: String,
    /// Primary transliteration
    #[serde(default)]
    phonetic_primary: String,
    /// Alternate transliteration
    #[serde(default)]
    phonetic_secondary: String,
    /// Meaning of the phrase
    #[serde(default)]
    definition: String,
    /// Origin text the phrase comes from
    #[serde(default)]
    provenance: String,
    /// Usage example
    #[serde(default)]
    example: String,
}

impl IdiomEntry {
    /// Create a new entry with the required fields
    pub fn new(id: EntryId, display_form: impl Into<String>) -> Self {
        Self {
            id,
            display_form: display_form.into(),
            phonetic_primary: String::new(),
            phonetic_secondary: String::new(),
            definition: String::new(),
            provenance: String::new(),
            example: String::new(),
        }
    }

    pub fn with_phonetic_primary(mut self, phonetic: impl Into<String>) -> Self {
        self.phonetic_primary = phonetic.into();
        self
    }

    pub fn with_phonetic_secondary(mut self, phonetic: impl Into<String>) -> Self {
        self.phonetic_secondary = phonetic.into();
        self
    }

    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = definition.into();
        self
    }

    pub fn with_provenance(mut self, provenance: impl Into<String>) -> Self {
        self.provenance = provenance.into();
        self
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = example.into();
        self
    }

    pub fn id(&self) -> &EntryId {
        &self.id
    }

    pub fn display_form(&self) -> &str {
        &self.display_form
    }

    pub fn phonetic_primary(&self) -> &str {
        &self.phonetic_primary
    }

    pub fn phonetic_secondary(&self) -> &str {
        &self.phonetic_secondary
    }

    pub fn definition(&self) -> &str {
        &self.definition
    }

    pub fn provenance(&self) -> &str {
        &self.provenance
    }

    pub fn example(&self) -> &str {
        &self.example
    }
}
