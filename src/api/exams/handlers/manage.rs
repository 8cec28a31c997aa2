use axum::extract::{Path, State};
use axum::Json;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::validation::validate_timetable_upload;
use crate::core::{metrics, state::AppState};
use crate::repositories::exams::ExamFields;
use crate::schemas::exam::ExamResponse;
use crate::schemas::ApiResponse;

use super::super::extract::ExamMultipart;
use super::super::form::RawExamForm;

pub(in crate::api::exams) async fn update_exam(
    Path(exam_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    ExamMultipart(multipart): ExamMultipart,
) -> Result<Json<ApiResponse<ExamResponse>>, ApiError> {
    let max_bytes = state.settings().storage().max_upload_bytes();
    let raw = RawExamForm::read(multipart, max_bytes).await?;
    let fields = raw.required_fields()?;

    let existing = state
        .exams()
        .find_by_id(&exam_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch exam"))?;

    let Some(existing) = existing else {
        return Err(ApiError::NotFound("Exam not found".to_string()));
    };
    let form = fields.coerce()?;

    let replacement = match raw.file {
        Some(file) => {
            validate_timetable_upload(&file)?;
            let stored = state
                .media()
                .store(&file.content_type, file.bytes)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to store timetable image"))?;
            metrics::record_upload(&file.content_type);
            Some(stored.filename)
        }
        None => None,
    };

    let timetable_link =
        replacement.clone().unwrap_or_else(|| existing.timetable_link.clone());

    let updated = state
        .exams()
        .update(
            &exam_id,
            ExamFields {
                name: form.name,
                class: form.class,
                exam_type: form.exam_type,
                total_marks: form.total_marks,
                start_date: form.start_date,
                timetable_link,
            },
        )
        .await;

    let updated = match updated {
        Ok(Some(exam)) => exam,
        Ok(None) => {
            if let Some(filename) = &replacement {
                super::discard_media(&state, filename).await;
            }
            return Err(ApiError::NotFound("Exam not found".to_string()));
        }
        Err(err) => {
            if let Some(filename) = &replacement {
                super::discard_media(&state, filename).await;
            }
            return Err(ApiError::internal(err, "Failed to update exam"));
        }
    };

    if replacement.is_some() && existing.timetable_link != updated.timetable_link {
        super::discard_media(&state, &existing.timetable_link).await;
    }

    tracing::info!(
        user_id = %user.sub,
        exam_id = %updated.id,
        timetable_replaced = replacement.is_some(),
        "Exam updated"
    );

    Ok(Json(ApiResponse::success(ExamResponse::from(updated), "Exam Updated Successfully!")))
}

/// Deletes without an existence check: an unknown id is still a success,
/// with `data: null`.
pub(in crate::api::exams) async fn delete_exam(
    Path(exam_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Option<ExamResponse>>>, ApiError> {
    let removed = state
        .exams()
        .delete(&exam_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete exam"))?;

    if let Some(exam) = &removed {
        super::discard_media(&state, &exam.timetable_link).await;
    }

    tracing::info!(
        user_id = %user.sub,
        exam_id = %exam_id,
        existed = removed.is_some(),
        "Exam deleted"
    );

    Ok(Json(ApiResponse::success(removed.map(ExamResponse::from), "Exam Deleted Successfully!")))
}
