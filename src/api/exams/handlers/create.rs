use axum::extract::State;
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

pub(in crate::api::exams) async fn create_exam(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    ExamMultipart(multipart): ExamMultipart,
) -> Result<Json<ApiResponse<ExamResponse>>, ApiError> {
    let max_bytes = state.settings().storage().max_upload_bytes();
    let raw = RawExamForm::read(multipart, max_bytes).await?;
    let fields = raw.required_fields()?;

    let Some(file) = raw.file else {
        metrics::record_rejection("missing_file");
        return Err(ApiError::BadRequest("Timetable image file is required".to_string()));
    };
    validate_timetable_upload(&file)?;
    let form = fields.coerce()?;

    let stored = state
        .media()
        .store(&file.content_type, file.bytes)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to store timetable image"))?;
    metrics::record_upload(&file.content_type);

    let created = state
        .exams()
        .create(ExamFields {
            name: form.name,
            class: form.class,
            exam_type: form.exam_type,
            total_marks: form.total_marks,
            start_date: form.start_date,
            timetable_link: stored.filename.clone(),
        })
        .await;

    let exam = match created {
        Ok(exam) => exam,
        Err(err) => {
            super::discard_media(&state, &stored.filename).await;
            return Err(ApiError::internal(err, "Failed to create exam"));
        }
    };

    tracing::info!(
        user_id = %user.sub,
        exam_id = %exam.id,
        class = exam.class,
        exam_type = %exam.exam_type,
        timetable = %exam.timetable_link,
        size = stored.size,
        sha256 = %stored.sha256,
        "Exam created"
    );

    Ok(Json(ApiResponse::success(ExamResponse::from(exam), "Exam Added Successfully!")))
}
