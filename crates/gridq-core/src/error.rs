use crate::MAX_PAGE_SIZE;
use thiserror::Error as ThisError;

///
/// SchemaError
///
/// Configuration-class failures: the entity's declared metadata cannot
/// support the requested operation. These indicate an authoring bug in the
/// schema, not a bad request, and are never retryable.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum SchemaError {
    #[error(
        "entity '{entity}' has no discoverable key field; mark one with #[entity(key)] or name it '{entity}Id' / 'id'"
    )]
    MissingKey { entity: &'static str },

    #[error("entity '{entity}' declares no mapped columns; there is nothing to insert")]
    NoMappedColumns { entity: &'static str },
}

///
/// ValidationError
///
/// Caller-visible request failures. The request is wrong, not the schema
/// or the store; the caller corrects and retries.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ValidationError {
    #[error("page index {page_index} is out of range; the first page is 1")]
    PageIndexOutOfRange { page_index: u32 },

    #[error("page size {page_size} is out of range; expected 1..={MAX_PAGE_SIZE}")]
    PageSizeOutOfRange { page_size: u32 },
}

///
/// Error
///
/// Umbrella error for every engine operation. Store errors propagate
/// unchanged so callers can translate them at the boundary; malformed
/// filter/sort input never surfaces here (it degrades to "no condition").
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{entity} with key '{key}' was not found")]
    NotFound { entity: &'static str, key: String },

    #[error(transparent)]
    Store(#[from] rusqlite::Error),
}

impl Error {
    /// True when the store rejected a write on a unique constraint.
    ///
    /// The engine never pre-checks uniqueness; a racing duplicate insert is
    /// expected to surface here from the storage layer.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            Self::Store(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
