//! Error types for pagination.

use std::convert::Infallible;

use crate::request::ReferenceToken;

/// Errors raised while building a [`KeysetDefinition`](crate::KeysetDefinition).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum DefinitionError {
    /// No column was declared.
    #[error("keyset definition has no columns")]
    Empty,
    /// The same column name was declared twice.
    #[error("column `{0}` appears more than once in the keyset definition")]
    DuplicateColumn(String),
}

/// Errors returned by the pagination orchestrators.
///
/// `E` is the data source's own error type; source failures are passed
/// through untouched in [`PaginationError::Source`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PaginationError<E = Infallible> {
    /// The ordering definition is unusable.
    #[error("invalid keyset definition: {0}")]
    InvalidDefinition(#[from] DefinitionError),

    /// A `before`/`after` token did not resolve to a row.
    #[error("reference `{0}` does not resolve to an existing row")]
    ReferenceNotFound(ReferenceToken),

    /// A required argument or the configuration is unusable.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The data source failed.
    #[error(transparent)]
    Source(E),
}

impl<E> PaginationError<E> {
    /// Returns `true` if the error came from the data source.
    #[inline]
    #[must_use]
    pub const fn is_source_error(&self) -> bool {
        matches!(self, Self::Source(_))
    }

    /// Returns `true` for errors caused by the caller's input
    /// (`InvalidDefinition`, `ReferenceNotFound`, `InvalidArgument`).
    #[inline]
    #[must_use]
    pub const fn is_caller_error(&self) -> bool {
        !self.is_source_error()
    }
}

/// Errors raised while loading [`PaginationOptions`](crate::PaginationOptions).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("failed to parse pagination options: {0}")]
    Toml(#[from] toml::de::Error),
    /// The options parsed but are inconsistent.
    #[error("invalid pagination options: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("connection reset")]
    struct Reset;

    #[test]
    fn test_source_error_is_transparent() {
        let err: PaginationError<Reset> = PaginationError::Source(Reset);
        assert_eq!(err.to_string(), "connection reset");
        assert!(err.is_source_error());
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn test_definition_error_converts() {
        let err: PaginationError<Reset> = DefinitionError::Empty.into();
        assert!(matches!(err, PaginationError::InvalidDefinition(DefinitionError::Empty)));
        assert!(err.is_caller_error());
        assert_eq!(
            err.to_string(),
            "invalid keyset definition: keyset definition has no columns"
        );
    }

    #[test]
    fn test_reference_not_found_message() {
        let err: PaginationError = PaginationError::ReferenceNotFound(ReferenceToken::Int(42));
        assert_eq!(err.to_string(), "reference `42` does not resolve to an existing row");
    }
}
