//! Headless client for the exam screen: an HTTP API client plus the view
//! state that drives listing, the create/edit modal and delete confirmation.

mod api;
mod form;
mod view;

pub use api::{
    ClientError, ExamApi, ExamRecord, ExamSubmission, HttpExamApi, Reply, ScheduleRecord,
    SubjectRecord, FALLBACK_ERROR_MESSAGE,
};
pub use form::{ExamFormState, FormError, SelectedFile};
pub use view::{
    ExamCard, ExamTableRow, ExamView, LoadState, ModalMode, ModalState, ModalView, Notification,
    NotificationKind, Screen, ScreenBody, Timetable, ViewerContext, DELETED_MESSAGE,
    NO_EXAMS_MESSAGE, TIMETABLE_UNAVAILABLE,
};
