//! Multipart field helpers shared by the upload-accepting handlers.
//!
//! Forms arrive as `multipart/form-data` with a mix of text fields and
//! at most a couple of file parts. Handlers walk the fields with
//! [`axum::extract::Multipart`] and use these helpers to turn each part
//! into a `String` or an in-memory [`Upload`].

use axum::extract::multipart::{Field, MultipartError};

use crate::domain::Upload;
use crate::errors::{AppError, AppResult};

/// Fallback name for file parts sent without a filename.
const UNNAMED_FILE: &str = "upload.bin";

/// A truncated or malformed multipart stream is the client's fault.
pub fn broken_multipart(err: MultipartError) -> AppError {
    AppError::Validation(format!("Malformed multipart body: {err}"))
}

/// Read a text part.
pub async fn text_field(field: Field<'_>) -> AppResult<String> {
    field.text().await.map_err(broken_multipart)
}

/// Drain a file part into memory.
///
/// Uploads are capped by the router's body limit, so buffering the
/// whole part here is bounded.
pub async fn file_field(field: Field<'_>) -> AppResult<Upload> {
    let file_name = field.file_name().unwrap_or(UNNAMED_FILE).to_string();
    let bytes = field.bytes().await.map_err(broken_multipart)?;

    Ok(Upload {
        file_name,
        bytes: bytes.to_vec(),
    })
}

/// Require a text field that the form must have supplied.
pub fn required(value: Option<String>, name: &str) -> AppResult<String> {
    value.ok_or_else(|| AppError::Validation(format!("Missing field: {name}")))
}

/// Parse a UUID out of a text field.
pub fn parse_uuid(value: &str, name: &str) -> AppResult<uuid::Uuid> {
    value
        .parse()
        .map_err(|_| AppError::Validation(format!("Invalid UUID in field: {name}")))
}

/// Parse an RFC 3339 timestamp out of a text field.
pub fn parse_datetime(value: &str, name: &str) -> AppResult<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|_| AppError::Validation(format!("Invalid timestamp in field: {name}")))
}
