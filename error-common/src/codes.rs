//! Field-level validation error kind constants, used to populate
//! [`crate::FieldError::kind`] consistently across `form-validator` and
//! `schema-engine`.

pub mod field {
    pub const REQUIRED: &str = "required";
    pub const TYPE_MISMATCH: &str = "type_mismatch";
    pub const TOO_SHORT: &str = "too_short";
    pub const TOO_LONG: &str = "too_long";
    pub const OUT_OF_RANGE: &str = "out_of_range";
    pub const PATTERN_MISMATCH: &str = "pattern_mismatch";
    pub const UNKNOWN_OPTION: &str = "unknown_option";
    pub const DUPLICATE_OPTION: &str = "duplicate_option";
    pub const TOO_FEW_ITEMS: &str = "too_few_items";
    pub const TOO_MANY_ITEMS: &str = "too_many_items";
    pub const FILE_TOO_LARGE: &str = "file_too_large";
    pub const FILE_TYPE_NOT_ALLOWED: &str = "file_type_not_allowed";
    pub const UNKNOWN_QUESTION: &str = "unknown_question";
}

pub mod shape {
    pub const DUPLICATE_SLUG: &str = "duplicate_slug";
    pub const DUPLICATE_VERSION: &str = "duplicate_version";
    pub const DUPLICATE_IDENTIFIER: &str = "duplicate_identifier";
    pub const INVALID_STATUS_TRANSITION: &str = "invalid_status_transition";
}
