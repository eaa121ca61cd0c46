//! Error types for popcount_kernel

use thiserror::Error;

/// Result type alias for popcount operations
pub type Result<T> = std::result::Result<T, PopcountError>;

/// Caller-input errors raised before any counting starts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PopcountError {
    /// Wrong element type or dimensionality
    #[error("xs must be a 1-D np.ndarray({allowed})")]
    TypeMismatch {
        /// Allowed dtypes, e.g. `np.uint8|np.uint64`
        allowed: String,
    },

    /// Zero-dimensional input where an array was expected
    #[error("xs must be a 1-D uint array (a scalar variable passed?)")]
    ScalarNotArray,

    /// Element not representable as an unsigned integer of at most 64 bits
    #[error("cannot convert element {index} to a uint of at most 64 bits: {reason}")]
    Conversion {
        /// Position of the offending element (flattened)
        index: usize,
        /// What was found there
        reason: String,
    },

    /// No input given at all
    #[error("{function}() missing required argument '{argument}' (pos 1)")]
    MissingArgument {
        /// Name of the called function
        function: &'static str,
        /// Name of the missing argument
        argument: &'static str,
    },
}

impl PopcountError {
    pub(crate) fn conversion(index: usize, reason: impl Into<String>) -> Self {
        PopcountError::Conversion {
            index,
            reason: reason.into(),
        }
    }
}
