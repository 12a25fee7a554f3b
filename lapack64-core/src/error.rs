//! Error types for lapack64

use crate::layout::Layout;
use thiserror::Error;

/// Result type alias using lapack64's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Contract violations detected before (or, for the external backend, during)
/// a call. Singular or non-definite inputs are not errors; routines report
/// those through their ordinary return value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Negative, impossible or mutually inconsistent extents, or a stride
    /// below the minor dimension
    #[error("Invalid dimension for '{arg}': {reason}")]
    InvalidDimension {
        /// The offending argument
        arg: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// Backing storage shorter than stride and extent require
    #[error("Insufficient storage for '{arg}': need {required} elements, have {actual}")]
    InsufficientStorage {
        /// The offending argument
        arg: &'static str,
        /// Minimum length
        required: usize,
        /// Actual length
        actual: usize,
    },

    /// Workspace shorter than the routine's declared minimum
    #[error("Insufficient workspace: need {required} elements, have {actual}")]
    InsufficientWorkspace {
        /// Minimum workspace length
        required: usize,
        /// Length supplied
        actual: usize,
    },

    /// Enumerated argument outside the set a routine accepts
    #[error("Invalid option for '{arg}': {value}")]
    InvalidOption {
        /// The offending argument
        arg: &'static str,
        /// Rendering of the rejected value
        value: String,
    },

    /// Pivot, permutation or 1-based index outside its valid range
    #[error("Index {index} out of range for '{arg}' (valid range {lo}..{hi})")]
    IndexOutOfRange {
        /// The offending argument
        arg: &'static str,
        /// The rejected index, in the base it was supplied in
        index: i64,
        /// Inclusive lower bound
        lo: i64,
        /// Exclusive upper bound
        hi: i64,
    },

    /// Descriptors passed to one call disagree on layout
    #[error("Layout mismatch: '{arg}' is {got:?}, expected {expected:?}")]
    LayoutMismatch {
        /// The offending argument
        arg: &'static str,
        /// Layout of the first matrix argument
        expected: Layout,
        /// Layout of the offending argument
        got: Layout,
    },

    /// The external library rejected an argument (negative `info`)
    #[error("Backend error in {routine}: {reason}")]
    Backend {
        /// Routine that failed
        routine: &'static str,
        /// Description from the backend
        reason: String,
    },
}

/// The fail-fast taxonomy an [`Error`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidDimension,
    InsufficientStorage,
    InsufficientWorkspace,
    InvalidOption,
    IndexOutOfRange,
    LayoutMismatch,
    Backend,
}

impl Error {
    /// Taxonomy kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidDimension { .. } => ErrorKind::InvalidDimension,
            Error::InsufficientStorage { .. } => ErrorKind::InsufficientStorage,
            Error::InsufficientWorkspace { .. } => ErrorKind::InsufficientWorkspace,
            Error::InvalidOption { .. } => ErrorKind::InvalidOption,
            Error::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            Error::LayoutMismatch { .. } => ErrorKind::LayoutMismatch,
            Error::Backend { .. } => ErrorKind::Backend,
        }
    }

    /// Shorthand for [`Error::InvalidDimension`].
    pub fn dimension(arg: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidDimension {
            arg,
            reason: reason.into(),
        }
    }

    /// Shorthand for [`Error::InvalidOption`], rendering the value with `Debug`.
    pub fn option(arg: &'static str, value: impl std::fmt::Debug) -> Self {
        Error::InvalidOption {
            arg,
            value: format!("{value:?}"),
        }
    }
}
