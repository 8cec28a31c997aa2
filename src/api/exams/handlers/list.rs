use axum::{extract::State, Json};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::validation::parse_non_negative;
use crate::core::state::AppState;
use crate::repositories::exams::ExamFilter;
use crate::schemas::exam::ExamResponse;
use crate::schemas::ApiResponse;

use super::super::extract::ExamQuery;
use super::super::queries::ListExamsQuery;

pub(in crate::api::exams) async fn list_exams(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    ExamQuery(params): ExamQuery<ListExamsQuery>,
) -> Result<Json<ApiResponse<Vec<ExamResponse>>>, ApiError> {
    let class = match non_empty(params.class.as_deref()) {
        Some(raw) => Some(parse_non_negative("class", raw)?),
        None => None,
    };
    let filter = ExamFilter {
        class,
        exam_type: non_empty(params.exam_type.as_deref()).map(str::to_string),
    };

    let exams = state
        .exams()
        .list(&filter)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list exams"))?;

    tracing::debug!(
        user_id = %user.sub,
        class = ?filter.class,
        exam_type = ?filter.exam_type,
        count = exams.len(),
        "Listed exams"
    );

    if exams.is_empty() {
        return Err(ApiError::NotFound("No Exams Found".to_string()));
    }

    let data = exams.into_iter().map(ExamResponse::from).collect();
    Ok(Json(ApiResponse::success(data, "All Exams Loaded!")))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
