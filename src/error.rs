//! Error types.
//!
//! Only malformed input and rejected configuration cross the optimization
//! boundary as errors. Infeasible or stagnating runs are ordinary results
//! (see [`Outcome`](crate::driver::Outcome)).

use thiserror::Error;

/// Errors raised while building an instance or starting a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimetableError {
    /// A course refers to a lecturer or room that does not exist.
    #[error("course {course_id} references unknown {reference}")]
    InvalidCourseReference {
        /// The offending course.
        course_id: u32,
        /// What failed to resolve, e.g. `"lecturer 7"` or `"room 12"`.
        reference: String,
    },

    /// A record field is missing, duplicated, or out of range.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Run or engine configuration was rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Crate result alias.
pub type Result<T> = std::result::Result<T, TimetableError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = TimetableError::InvalidCourseReference {
            course_id: 3,
            reference: "lecturer 9".into(),
        };
        assert_eq!(err.to_string(), "course 3 references unknown lecturer 9");

        let err = TimetableError::InvalidConfig("particles must be at least 2".into());
        assert_eq!(
            err.to_string(),
            "invalid configuration: particles must be at least 2"
        );
    }
}
