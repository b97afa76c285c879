//! Geometry error types.
//!
//! These signal malformed input geometry. They are precondition violations,
//! not runtime conditions a caller is expected to recover from.

/// Errors from geometry validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    /// First and last points of a polygon ring differ
    #[error("first and last coordinates in a ring must be the same")]
    OpenRing,

    /// Not enough points for the requested shape
    #[error("expected at least {expected} points, found {found}")]
    TooFewPoints { expected: usize, found: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            GeometryError::OpenRing.to_string(),
            "first and last coordinates in a ring must be the same"
        );

        let err = GeometryError::TooFewPoints {
            expected: 3,
            found: 1,
        };
        assert_eq!(err.to_string(), "expected at least 3 points, found 1");
    }
}
