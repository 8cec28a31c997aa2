use crate::api::errors::ApiError;
use crate::core::metrics;
use crate::media;

/// A file part pulled out of a multipart request, not yet stored anywhere.
#[derive(Debug, Clone)]
pub(crate) struct UploadedFile {
    pub(crate) file_name: Option<String>,
    pub(crate) content_type: String,
    pub(crate) bytes: Vec<u8>,
}

/// Checks the declared content type against the timetable whitelist.
pub(crate) fn validate_timetable_upload(file: &UploadedFile) -> Result<(), ApiError> {
    if media::is_accepted_image_type(&file.content_type) {
        return Ok(());
    }

    metrics::record_rejection("content_type");
    tracing::info!(
        content_type = %file.content_type,
        file_name = file.file_name.as_deref().unwrap_or("-"),
        "Rejected timetable upload"
    );
    Err(ApiError::BadRequest(media::INVALID_IMAGE_MESSAGE.to_string()))
}

pub(crate) fn parse_non_negative(field: &'static str, raw: &str) -> Result<i32, ApiError> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|value| *value >= 0)
        .ok_or_else(|| ApiError::BadRequest(format!("{field} must be a non-negative integer")))
}
