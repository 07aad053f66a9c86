//! Editor error model.

use thiserror::Error;

/// Result type used across the editor layer.
pub type EditorResult<T> = Result<T, EditorError>;

/// Why a piece of user input was refused.
///
/// These never reach a store: inputs are checked before the store is touched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("`{0}` is not a number")]
    NotANumber(String),

    #[error("value is below the minimum of {min}")]
    BelowMinimum { min: String },

    #[error("value is above the maximum of {max}")]
    AboveMaximum { max: String },

    #[error("at most {max} decimal places are allowed")]
    TooManyDecimals { max: u32 },

    #[error("{0} is required")]
    Required(&'static str),

    #[error("{field} must have at least {min} characters")]
    TooShort { field: &'static str, min: usize },

    #[error("{0} contains characters that are not allowed")]
    InvalidCharacters(&'static str),

    #[error("file extension `{0}` is not accepted")]
    InvalidExtension(String),

    #[error("sale price must not be lower than the purchase price")]
    PvpBelowPrice,

    #[error("field `{0}` is not editable here")]
    UnknownField(String),
}

/// Editor-level error.
///
/// All of these are recovered locally. Only [`EditorError::EmptySubmission`]
/// carries a message meant for the operator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// A row position no longer exists (stale row, double click after removal).
    #[error("position {position} is out of range (len {len})")]
    OutOfRangeIndex { position: usize, len: usize },

    /// Numeric or text input failed a field rule.
    #[error("input rejected: {0}")]
    ValidationRejected(#[from] ValidationError),

    /// Submission needs at least one line item.
    #[error("{0}")]
    EmptySubmission(String),

    /// A candidate with this id is already in the store.
    #[error("candidate {0} is already in the detail")]
    DuplicateCandidate(String),

    /// The store was handed off and no longer accepts changes.
    #[error("the detail has already been submitted")]
    Submitted,

    /// A snapshot could not be turned into JSON.
    #[error("could not encode the detail: {0}")]
    Encode(String),
}

impl EditorError {
    pub fn out_of_range(position: usize, len: usize) -> Self {
        Self::OutOfRangeIndex { position, len }
    }

    pub fn empty_submission(msg: impl Into<String>) -> Self {
        Self::EmptySubmission(msg.into())
    }

    pub fn duplicate(id: impl ToString) -> Self {
        Self::DuplicateCandidate(id.to_string())
    }

    /// Whether the operator should see this error.
    pub fn is_user_visible(&self) -> bool {
        matches!(self, Self::EmptySubmission(_))
    }
}
