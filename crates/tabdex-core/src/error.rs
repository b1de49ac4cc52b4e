use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured runtime error with a stable internal classification.
/// Not a stable API; intended for internal use and may change without notice.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    /// The variant (if present) must correspond to `origin`.
    pub detail: Option<ErrorDetail>,
}

impl InternalError {
    /// Construct an InternalError with optional origin-specific detail.
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        let message = message.into();

        let detail = match (class, origin) {
            (ErrorClass::NotFound, ErrorOrigin::Index) => {
                Some(ErrorDetail::Index(IndexError::NoResult))
            }
            (ErrorClass::InvariantViolation, ErrorOrigin::Index) => {
                Some(ErrorDetail::Index(IndexError::InvariantViolation {
                    message: message.clone(),
                }))
            }
            _ => None,
        };

        Self {
            class,
            origin,
            message,
            detail,
        }
    }

    /// Construct an index-origin invariant violation.
    pub(crate) fn index_invariant(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvariantViolation,
            ErrorOrigin::Index,
            message.into(),
        )
    }

    /// Construct a builder-origin invariant violation.
    pub(crate) fn builder_invariant(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvariantViolation,
            ErrorOrigin::Builder,
            message.into(),
        )
    }

    /// Construct a builder-origin unsupported error.
    pub(crate) fn builder_unsupported(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::Unsupported,
            ErrorOrigin::Builder,
            message.into(),
        )
    }

    /// Construct an index-origin unsupported error.
    pub(crate) fn index_unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Index, message.into())
    }

    /// Construct a plan-origin unsupported error.
    pub(crate) fn plan_unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Plan, message.into())
    }

    /// Construct the zero-result failure for a unique lookup.
    pub(crate) fn index_no_result() -> Self {
        Self::new(
            ErrorClass::NotFound,
            ErrorOrigin::Index,
            "no result reachable from this node",
        )
    }

    /// Construct the more-than-one-result failure for a unique lookup.
    pub(crate) fn index_ambiguous_result() -> Self {
        Self::index_invariant("unique lookup reached more than one result")
    }

    /// Construct the node-level conflict for a merge into a unique terminal.
    /// The builder rewraps this with the colliding key path.
    pub(crate) fn unique_merge_conflict() -> Self {
        Self::new(
            ErrorClass::Conflict,
            ErrorOrigin::Index,
            "cannot merge into a unique terminal",
        )
    }

    /// Construct a unique-key collision conflict for a full key path.
    pub(crate) fn duplicate_unique_key(path: &str) -> Self {
        Self {
            class: ErrorClass::Conflict,
            origin: ErrorOrigin::Builder,
            message: format!("duplicate row for unique key path: {path}"),
            detail: Some(ErrorDetail::Index(IndexError::DuplicateUniqueKey {
                path: path.to_string(),
            })),
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.class, ErrorClass::NotFound)
    }

    #[must_use]
    pub const fn is_duplicate_unique_key(&self) -> bool {
        matches!(
            self.detail,
            Some(ErrorDetail::Index(IndexError::DuplicateUniqueKey { .. }))
        )
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorDetail
///
/// Structured, origin-specific error detail carried by [`InternalError`].
/// This enum is intentionally extensible.
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    Index(IndexError),
}

///
/// IndexError
///
/// Index-specific structured error detail.
/// Never returned directly; always wrapped in [`ErrorDetail::Index`].
///

#[derive(Debug, ThisError)]
pub enum IndexError {
    #[error("no result reachable")]
    NoResult,

    #[error("duplicate row for unique key path: {path}")]
    DuplicateUniqueKey { path: String },

    #[error("index invariant violation: {message}")]
    InvariantViolation { message: String },
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    NotFound,
    Conflict,
    Unsupported,
    InvariantViolation,
    Internal,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Unsupported => "unsupported",
            Self::InvariantViolation => "invariant_violation",
            Self::Internal => "internal",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Builder,
    Index,
    Plan,
    Query,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Builder => "builder",
            Self::Index => "index",
            Self::Plan => "plan",
            Self::Query => "query",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///
