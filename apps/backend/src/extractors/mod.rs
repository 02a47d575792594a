pub mod validated_json;

pub use validated_json::{require_non_blank, Validate, ValidatedJson};
