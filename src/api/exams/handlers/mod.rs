mod create;
mod list;
mod manage;

pub(super) use create::create_exam;
pub(super) use list::list_exams;
pub(super) use manage::{delete_exam, update_exam};

use crate::core::state::AppState;

/// Best-effort removal of a stored timetable; failures are only logged.
async fn discard_media(state: &AppState, filename: &str) {
    if let Err(err) = state.media().remove(filename).await {
        tracing::warn!(error = %err, filename, "Failed to remove timetable image");
    }
}
