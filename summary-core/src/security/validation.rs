/// Validation of externally supplied identifiers

use thiserror::Error;

/// Longest identifier accepted from callers, in bytes.
pub const MAX_IDENTIFIER_LEN: usize = 128;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("identifier must not be empty")]
    Empty,

    #[error("identifier too long: max {max} bytes, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error("identifier contains control characters")]
    ControlCharacters,

    #[error("identifier contains a path separator")]
    PathSeparator,

    #[error("identifier is a relative path segment: {0}")]
    DotSegment(String),
}

/// `.` and `..` are dropped or resolved when appended to a URL path.
pub fn is_dot_segment(segment: &str) -> bool {
    segment == "." || segment == ".."
}

/// Validate a customer identifier before it is used as a cache key and an
/// upstream URL path segment.
pub fn validate_identifier(id: &str) -> Result<(), ValidationError> {
    if id.is_empty() {
        return Err(ValidationError::Empty);
    }

    if id.len() > MAX_IDENTIFIER_LEN {
        return Err(ValidationError::TooLong {
            max: MAX_IDENTIFIER_LEN,
            actual: id.len(),
        });
    }

    if id.chars().any(char::is_control) {
        return Err(ValidationError::ControlCharacters);
    }

    if id.contains('/') || id.contains('\\') {
        return Err(ValidationError::PathSeparator);
    }

    if is_dot_segment(id) {
        return Err(ValidationError::DotSegment(id.to_string()));
    }

    Ok(())
}
