//! Custom Axum extractors and multipart helpers.

mod upload_field;
mod validated_json;

pub use upload_field::{
    broken_multipart, file_field, parse_datetime, parse_uuid, required, text_field,
};
pub use validated_json::ValidatedJson;
