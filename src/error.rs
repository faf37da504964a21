//! Error types for lane vector operations.
//!
//! Every error here is a programming error detected at the call that
//! received the bad argument. Nothing is retried or deferred.

use thiserror::Error;

/// Errors raised by vector, mask, shuffle and kernel operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LaneError {
    /// Species, lane-count or slice-length mismatch between cooperating operands
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Array offset, lane index or shuffle index outside the valid range
    #[error("Index {index} out of bounds for length {length}")]
    OutOfBounds { index: i64, length: usize },

    /// Operator not defined for the element kind, or a conversion that cannot fit
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Integer lanewise division with a zero divisor
    #[error("Division by zero in lane {lane}")]
    DivisionByZero { lane: usize },
}

impl LaneError {
    pub(crate) fn out_of_bounds(index: impl TryInto<i64>, length: usize) -> Self {
        LaneError::OutOfBounds {
            index: index.try_into().unwrap_or(i64::MAX),
            length,
        }
    }

    pub(crate) fn length_mismatch(what: &str, have: usize, want: usize) -> Self {
        LaneError::InvalidArgument(format!(
            "Length check failed: {} length {} should have been {}",
            what, have, want
        ))
    }
}

/// Result type for lane operations.
pub type Result<T> = std::result::Result<T, LaneError>;

/// Checks that `[offset, offset + vlen)` lies inside a buffer of `length` elements.
#[inline]
pub(crate) fn check_from_index_size(offset: usize, vlen: usize, length: usize) -> Result<()> {
    match offset.checked_add(vlen) {
        Some(end) if end <= length => Ok(()),
        _ => Err(LaneError::out_of_bounds(offset, length)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_from_index_size() {
        assert!(check_from_index_size(0, 4, 4).is_ok());
        assert!(check_from_index_size(4, 0, 4).is_ok());
        assert_eq!(
            check_from_index_size(1, 4, 4),
            Err(LaneError::OutOfBounds { index: 1, length: 4 })
        );
        assert!(check_from_index_size(usize::MAX, 2, 4).is_err());
    }

    #[test]
    fn test_error_messages() {
        let e = LaneError::length_mismatch("mask", 8, 4);
        assert_eq!(
            e.to_string(),
            "Invalid argument: Length check failed: mask length 8 should have been 4"
        );
        let e = LaneError::out_of_bounds(-1i64, 16);
        assert_eq!(e.to_string(), "Index -1 out of bounds for length 16");
    }
}
