use axum::extract::Multipart;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::validation::{parse_non_negative, UploadedFile};
use crate::core::time::parse_calendar_date;
use crate::db::types::ExamType;
use crate::schemas::exam::ExamForm;

pub(super) const ALL_FIELDS_REQUIRED: &str =
    "All fields are required (name, class, examType, totalMarks, startDate)";

/// The multipart body of a create/update request, exactly as submitted.
#[derive(Debug, Default)]
pub(super) struct RawExamForm {
    pub(super) name: Option<String>,
    pub(super) class: Option<String>,
    pub(super) exam_type: Option<String>,
    pub(super) total_marks: Option<String>,
    pub(super) start_date: Option<String>,
    pub(super) file: Option<UploadedFile>,
}

impl RawExamForm {
    pub(super) async fn read(mut multipart: Multipart, max_bytes: u64) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(mut field) = multipart
            .next_field()
            .await
            .map_err(|_| ApiError::BadRequest("Invalid multipart data".to_string()))?
        {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                "file" => {
                    let file_name = field.file_name().map(|s| s.to_string());
                    let content_type = field
                        .content_type()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "application/octet-stream".to_string());

                    let mut bytes = Vec::new();
                    while let Some(chunk) = field
                        .chunk()
                        .await
                        .map_err(|_| ApiError::BadRequest("Failed to read file".to_string()))?
                    {
                        if bytes.len() as u64 + chunk.len() as u64 > max_bytes {
                            return Err(ApiError::BadRequest(format!(
                                "File size exceeds {}MB limit",
                                max_bytes / (1024 * 1024)
                            )));
                        }
                        bytes.extend_from_slice(&chunk);
                    }

                    // Browsers send an empty, unnamed part when no file was picked.
                    let picked = file_name.as_deref().is_some_and(|n| !n.is_empty());
                    if picked || !bytes.is_empty() {
                        form.file = Some(UploadedFile { file_name, content_type, bytes });
                    }
                }
                "name" => form.name = Some(read_text(field).await?),
                "class" => form.class = Some(read_text(field).await?),
                "examType" | "exam_type" => form.exam_type = Some(read_text(field).await?),
                "totalMarks" | "total_marks" => form.total_marks = Some(read_text(field).await?),
                "startDate" | "start_date" => form.start_date = Some(read_text(field).await?),
                _ => {}
            }
        }

        Ok(form)
    }

    /// Pulls out the five text fields. Any blank one is the generic
    /// "all fields are required" error.
    pub(super) fn required_fields(&self) -> Result<RequiredFields, ApiError> {
        let (Some(name), Some(class), Some(exam_type), Some(total_marks), Some(start_date)) = (
            present(&self.name),
            present(&self.class),
            present(&self.exam_type),
            present(&self.total_marks),
            present(&self.start_date),
        ) else {
            return Err(ApiError::BadRequest(ALL_FIELDS_REQUIRED.to_string()));
        };

        Ok(RequiredFields {
            name: name.to_string(),
            class: class.to_string(),
            exam_type: exam_type.to_string(),
            total_marks: total_marks.to_string(),
            start_date: start_date.to_string(),
        })
    }
}

/// The text fields once presence is established, not yet coerced.
#[derive(Debug, Clone)]
pub(super) struct RequiredFields {
    name: String,
    class: String,
    exam_type: String,
    total_marks: String,
    start_date: String,
}

impl RequiredFields {
    /// Coerces numbers, the exam type and the date, then runs field validation.
    pub(super) fn coerce(&self) -> Result<ExamForm, ApiError> {
        let form = ExamForm {
            name: self.name.clone(),
            class: parse_non_negative("class", &self.class)?,
            exam_type: self.exam_type.parse::<ExamType>().map_err(ApiError::BadRequest)?,
            total_marks: parse_non_negative("totalMarks", &self.total_marks)?,
            start_date: parse_calendar_date(&self.start_date).ok_or_else(|| {
                ApiError::BadRequest("startDate must be a valid date (YYYY-MM-DD)".to_string())
            })?,
        };

        form.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
        Ok(form)
    }
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field.text().await.map_err(|_| ApiError::BadRequest("Invalid multipart data".to_string()))
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|value| !value.is_empty())
}
