//! Error types for vecbase.
//!
//! Only recoverable conditions are values. Size overflow and contract
//! violations (out-of-bounds indices, misordered ranges, reading a header
//! that was never reserved) panic instead.

use std::error::Error;
use std::fmt;

/// The capacity-changing operation that was running when an allocation
/// failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    /// Allocating the block of a new handle.
    Create,
    /// An explicit resize or truncate.
    Resize,
    /// Copying the whole block into a new handle.
    Clone,
    /// Policy-driven growth before an insertion.
    Grow,
    /// Policy-driven shrink after a removal.
    Shrink,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Create => "create",
            Self::Resize => "resize",
            Self::Clone => "clone",
            Self::Grow => "grow",
            Self::Shrink => "shrink",
        };
        f.write_str(name)
    }
}

/// Errors returned by fallible vector operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VectorError {
    /// The allocation backend returned no memory.
    AllocFailed {
        /// Operation that requested the memory.
        operation: Operation,
        /// Size of the requested block in bytes.
        requested: usize,
    },
}

impl VectorError {
    /// The operation during which the error happened.
    pub fn operation(&self) -> Operation {
        match self {
            Self::AllocFailed { operation, .. } => *operation,
        }
    }

    /// Re-label the error with the higher-level operation that caused it.
    ///
    /// A growable vector resizes through the same path as an explicit
    /// resize; this lets it report `Grow` or `Shrink` instead.
    #[must_use]
    pub fn during(self, operation: Operation) -> Self {
        match self {
            Self::AllocFailed { requested, .. } => Self::AllocFailed {
                operation,
                requested,
            },
        }
    }
}

impl fmt::Display for VectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocFailed {
                operation,
                requested,
            } => {
                write!(
                    f,
                    "allocation failed during {operation}: requested {requested} bytes"
                )
            }
        }
    }
}

impl Error for VectorError {}

/// Errors detected while validating a [`GrowthPolicy`](crate::GrowthPolicy).
#[derive(Clone, Debug, PartialEq)]
pub enum PolicyError {
    /// The grow factor is not a finite value greater than one.
    InvalidGrowFactor {
        /// The rejected value.
        value: f64,
    },
    /// A threshold lies outside the open interval `(0, 1)`.
    InvalidThreshold {
        /// Which threshold was rejected (`"grow"` or `"shrink"`).
        which: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// `shrink_threshold * grow_factor > grow_threshold`: a shrink would
    /// land above the grow threshold and the capacity would oscillate.
    Oscillation {
        /// The product `shrink_threshold * grow_factor`.
        product: f64,
        /// The configured grow threshold.
        grow_threshold: f64,
    },
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGrowFactor { value } => {
                write!(f, "grow factor must be finite and greater than 1, got {value}")
            }
            Self::InvalidThreshold { which, value } => {
                write!(f, "{which} threshold must lie in (0, 1), got {value}")
            }
            Self::Oscillation {
                product,
                grow_threshold,
            } => {
                write!(
                    f,
                    "shrink_threshold * grow_factor ({product}) exceeds grow_threshold ({grow_threshold})"
                )
            }
        }
    }
}

impl Error for PolicyError {}
