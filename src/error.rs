use std::error::Error;
use std::fmt;

use crate::math::ShapeError;

/// Errors raised while building or transforming skew-normal models.
#[derive(Debug, Clone, PartialEq)]
pub enum CsnError {
    /// Operand shapes are incompatible for `operation`.
    DimensionMismatch {
        operation: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },
    /// Inversion of a singular `size` x `size` matrix was attempted.
    SingularMatrix { size: usize },
    /// A scalar used as a divisor is zero or not finite.
    DivideByZero { name: &'static str },
    /// A scalar or configuration value is outside its valid range.
    InvalidParameter { name: &'static str, reason: String },
    /// A matrix handed to `operation` contains NaN or infinite entries.
    NonFinite { operation: &'static str },
    /// A comparison references an item index outside `0..items`.
    ItemOutOfRange {
        comparison: usize,
        item: usize,
        items: usize,
    },
    /// A comparison names the same item as winner and loser.
    SelfComparison { comparison: usize, item: usize },
}

pub type CsnResult<T> = Result<T, CsnError>;

impl CsnError {
    pub(crate) fn mismatch(
        operation: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    ) -> Self {
        CsnError::DimensionMismatch {
            operation,
            expected,
            found,
        }
    }
}

impl From<ShapeError> for CsnError {
    fn from(err: ShapeError) -> Self {
        CsnError::mismatch("from_shape_vec", (err.rows, err.cols), (err.len, 1))
    }
}

impl fmt::Display for CsnError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CsnError::DimensionMismatch {
                operation,
                expected,
                found,
            } => write!(
                f,
                "dimension mismatch in {}: expected {:?}, found {:?}",
                operation, expected, found
            ),
            CsnError::SingularMatrix { size } => {
                write!(f, "{}x{} matrix is singular and cannot be inverted", size, size)
            }
            CsnError::DivideByZero { name } => {
                write!(f, "division by zero: '{}' must be finite and non-zero", name)
            }
            CsnError::InvalidParameter { name, reason } => {
                write!(f, "invalid parameter '{}': {}", name, reason)
            }
            CsnError::NonFinite { operation } => {
                write!(f, "{} received a matrix with NaN or infinite entries", operation)
            }
            CsnError::ItemOutOfRange {
                comparison,
                item,
                items,
            } => write!(
                f,
                "comparison {} references item {} but only {} items exist",
                comparison, item, items
            ),
            CsnError::SelfComparison { comparison, item } => write!(
                f,
                "comparison {} uses item {} as both winner and loser",
                comparison, item
            ),
        }
    }
}

impl Error for CsnError {}
