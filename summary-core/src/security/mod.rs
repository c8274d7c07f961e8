/// Input validation for identifiers that end up in upstream URLs

pub mod validation;

pub use validation::{is_dot_segment, validate_identifier, ValidationError, MAX_IDENTIFIER_LEN};
