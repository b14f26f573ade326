use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Entry store error: {message}")]
    Store { message: String },

    #[error("Cache error: {message}")]
    Cache { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this error came from the entry store (the only class a caller
    /// of the search surface has to handle)
    pub fn is_store(&self) -> bool {
        matches!(self, Self::Store { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error() {
        let error = DomainError::store("record source unreachable");
        assert_eq!(
            error.to_string(),
            "Entry store error: record source unreachable"
        );
        assert!(error.is_store());
    }

    #[test]
    fn test_cache_error() {
        let error = DomainError::cache("backing store write failed");
        assert_eq!(error.to_string(), "Cache error: backing store write failed");
        assert!(!error.is_store());
    }

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("entry 'x-1' not found");
        assert_eq!(error.to_string(), "Not found: entry 'x-1' not found");
    }
}
