//! Error types for series construction, distance computation and alignment.

use std::fmt;

/// Which of the two compared series an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The first series (matrix rows).
    First,
    /// The second series (matrix columns).
    Second,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => f.write_str("first"),
            Self::Second => f.write_str("second"),
        }
    }
}

/// Precondition violations on the shape of series, vectors or matrices.
///
/// These are programming errors on the caller's side: the computation is
/// deterministic, so retrying with the same input cannot succeed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    /// Returned when a series with no time steps is provided.
    #[error("time series must be non-empty")]
    EmptySeries,

    /// Returned when feature vectors have no components.
    #[error("feature vectors must have at least one component")]
    ZeroDimension,

    /// Returned when one time step has a different dimensionality than the first.
    #[error("feature vector at step {step} has {got} components, expected {expected}")]
    RaggedSeries {
        /// Time step of the offending vector.
        step: usize,
        /// Dimensionality of the first vector.
        expected: usize,
        /// Dimensionality of the offending vector.
        got: usize,
    },

    /// Returned when two vectors (or two series) of different dimensionality are compared.
    #[error("cannot compare {left}-dimensional vectors with {right}-dimensional vectors")]
    DimensionMismatch {
        /// Dimensionality of the left operand.
        left: usize,
        /// Dimensionality of the right operand.
        right: usize,
    },

    /// Returned when the signed-difference metric receives non-scalar vectors.
    #[error("signed difference needs single-component vectors, got {dim} components")]
    NotScalar {
        /// Dimensionality that was provided.
        dim: usize,
    },

    /// Returned when a raw distance matrix has no rows or no columns.
    #[error("distance matrix must have at least one row and one column")]
    EmptyMatrix,

    /// Returned when a raw distance matrix is not rectangular.
    #[error("distance matrix row {row} has {got} columns, expected {expected}")]
    RaggedMatrix {
        /// Index of the offending row.
        row: usize,
        /// Column count of the first row.
        expected: usize,
        /// Column count of the offending row.
        got: usize,
    },
}

/// Errors from a single vector-to-vector distance evaluation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetricError {
    /// The operands have incompatible shapes.
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// Cosine distance is undefined when either operand has zero magnitude.
    #[error("cosine distance is undefined for a zero-magnitude {0} operand")]
    ZeroMagnitude(Side),

    /// An operand held NaN or infinity, so the distance is not a number.
    #[error("distance is not finite")]
    NonFiniteDistance,
}

/// Errors from DTW series validation, distance matrix construction and comparison.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DtwError {
    /// The inputs have an invalid shape.
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// A zero-magnitude vector was found while computing cosine distances.
    #[error("{side} series has a zero-magnitude vector at step {step}; cosine distance is undefined")]
    DegenerateVector {
        /// Series containing the vector.
        side: Side,
        /// Time step of the vector.
        step: usize,
    },

    /// Returned when a time series contains NaN, infinity, or negative infinity.
    #[error("time series contains non-finite value at step {step}, component {component}")]
    NonFiniteValue {
        /// Time step of the first non-finite value found.
        step: usize,
        /// Component index within that step.
        component: usize,
    },

    /// A cumulative alignment cost overflowed or a distance was not finite.
    #[error("cumulative cost is not finite at cell ({row}, {col})")]
    NonFiniteCost {
        /// Row of the first non-finite cell in fill order.
        row: usize,
        /// Column of that cell.
        col: usize,
    },
}

impl DtwError {
    /// Return true if this error is a shape precondition violation.
    #[must_use]
    pub fn is_shape_error(&self) -> bool {
        matches!(self, Self::Shape(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_cost_message_names_cell() {
        let err = DtwError::NonFiniteCost { row: 2, col: 0 };
        assert_eq!(err.to_string(), "cumulative cost is not finite at cell (2, 0)");
    }

    #[test]
    fn degenerate_vector_message_names_side_and_step() {
        let err = DtwError::DegenerateVector {
            side: Side::Second,
            step: 4,
        };
        assert_eq!(
            err.to_string(),
            "second series has a zero-magnitude vector at step 4; cosine distance is undefined"
        );
    }

    #[test]
    fn shape_error_is_transparent() {
        let err = DtwError::from(ShapeError::RaggedMatrix {
            row: 2,
            expected: 3,
            got: 1,
        });
        assert!(err.is_shape_error());
        assert_eq!(err.to_string(), "distance matrix row 2 has 1 columns, expected 3");
    }
}
