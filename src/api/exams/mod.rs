mod extract;
mod form;
mod handlers;
mod queries;

use axum::extract::DefaultBodyLimit;
use axum::{routing::get, routing::patch, Router};

use crate::core::state::AppState;

/// Headroom on top of the file limit for the text fields and part headers.
const FORM_OVERHEAD_BYTES: u64 = 64 * 1024;

pub(crate) fn router(max_upload_bytes: u64) -> Router<AppState> {
    let body_limit = usize::try_from(max_upload_bytes + FORM_OVERHEAD_BYTES).unwrap_or(usize::MAX);

    Router::new()
        .route("/", get(handlers::list_exams).post(handlers::create_exam))
        .route("/:exam_id", patch(handlers::update_exam).delete(handlers::delete_exam))
        .layer(DefaultBodyLimit::max(body_limit))
}
