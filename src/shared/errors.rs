use thiserror::Error;

/// Coarse classification of a [`DomainError`], for mapping to transport
/// status codes at the outermost boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    IntervalOverlap,
    SlotUnavailable,
    NotFound,
    Forbidden,
    InvalidStateTransition,
    Storage,
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation: {0}")]
    Validation(String),

    #[error("Interval overlap: {0}")]
    IntervalOverlap(String),

    #[error("Slot unavailable: {0}")]
    SlotUnavailable(String),

    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::IntervalOverlap(_) => ErrorKind::IntervalOverlap,
            Self::SlotUnavailable(_) => ErrorKind::SlotUnavailable,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::InvalidStateTransition(_) => ErrorKind::InvalidStateTransition,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }

    /// Whether this error is likely transient (e.g. DB connection lost)
    /// and the operation may succeed if retried. Business errors never are.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(
            DomainError::SlotUnavailable("slot 3".into()).kind(),
            ErrorKind::SlotUnavailable
        );
        assert_eq!(
            DomainError::not_found("Payment", "id", 7).kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn only_storage_is_transient() {
        assert!(DomainError::Storage("disk I/O error".into()).is_transient());
        assert!(!DomainError::IntervalOverlap("08:00-09:00".into()).is_transient());
        assert!(!DomainError::Forbidden("not owner".into()).is_transient());
    }

    #[test]
    fn not_found_message() {
        let err = DomainError::not_found("Reservation", "id", 42);
        assert_eq!(err.to_string(), "Not found: Reservation with id=42");
    }
}
