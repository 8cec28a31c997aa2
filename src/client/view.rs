//! The exam screen as a state machine.
//!
//! [`ExamView`] owns the fetched list, the create/edit modal, and the delete
//! confirmation. It never renders pixels: [`ExamView::render`] returns a
//! [`Screen`] describing what should be on screen for the current viewer.

use crate::db::types::UserRole;

use super::api::{ClientError, ExamApi, ExamRecord};
use super::form::{ExamFormState, SelectedFile};

pub const NO_EXAMS_MESSAGE: &str = "No Exams found.";
pub const TIMETABLE_UNAVAILABLE: &str = "Timetable not available.";
pub const DELETED_MESSAGE: &str = "Exam has been deleted successfully";
pub const FETCH_FAILED_MESSAGE: &str = "Error fetching exams";

/// Who is looking at the screen. Passed in explicitly rather than read from
/// session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerContext {
    pub role: UserRole,
    pub class: Option<i32>,
    /// Base URL the server serves timetable images from.
    pub media_base_url: String,
}

impl ViewerContext {
    fn is_staff(&self) -> bool {
        !self.role.is_student()
    }

    fn timetable_url(&self, link: &str) -> String {
        format!("{}/{}", self.media_base_url.trim_end_matches('/'), link)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready(Vec<ExamRecord>),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalMode {
    Create,
    Edit(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    Open(ModalMode),
    Submitting(ModalMode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timetable {
    Image(String),
    Unavailable,
}

impl std::fmt::Display for Timetable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Timetable::Image(url) => f.write_str(url),
            Timetable::Unavailable => f.write_str(TIMETABLE_UNAVAILABLE),
        }
    }
}

/// Read-only card shown to students.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamCard {
    pub title: String,
    pub starting_date: String,
    pub details: String,
    pub timetable: Timetable,
}

/// One row of the staff table. `id` backs the edit/delete actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamTableRow {
    pub id: String,
    pub name: String,
    pub class: i32,
    pub exam_type: &'static str,
    pub total_marks: i32,
    pub start_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenBody {
    Loading,
    Empty(&'static str),
    Cards(Vec<ExamCard>),
    Table(Vec<ExamTableRow>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalView {
    pub title: &'static str,
    pub submit_label: &'static str,
    pub submit_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub show_add_button: bool,
    pub body: ScreenBody,
    pub modal: Option<ModalView>,
    pub confirm_delete: bool,
}

pub struct ExamView<A: ExamApi> {
    api: A,
    viewer: ViewerContext,
    load: LoadState,
    modal: ModalState,
    form: ExamFormState,
    pending_delete: Option<String>,
    processing: bool,
    notifications: Vec<Notification>,
}

impl<A: ExamApi> ExamView<A> {
    pub fn new(api: A, viewer: ViewerContext) -> Self {
        Self {
            api,
            viewer,
            load: LoadState::Idle,
            modal: ModalState::Closed,
            form: ExamFormState::default(),
            pending_delete: None,
            processing: false,
            notifications: Vec::new(),
        }
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn modal_state(&self) -> &ModalState {
        &self.modal
    }

    pub fn form(&self) -> &ExamFormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ExamFormState {
        &mut self.form
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    /// Drains queued notifications, oldest first.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Re-fetches the list, scoped to the viewer's class when one is set.
    /// The previous snapshot is replaced wholesale.
    pub async fn refresh(&mut self) {
        self.load = LoadState::Loading;

        self.load = match self.api.list(self.viewer.class).await {
            Ok(exams) => LoadState::Ready(exams),
            Err(err) if err.is_not_found() => LoadState::Ready(Vec::new()),
            Err(err) => {
                tracing::warn!(error = %err, "Failed to load exams");
                let message = err.message_or(FETCH_FAILED_MESSAGE);
                self.notify(NotificationKind::Error, message.clone());
                LoadState::Failed(message)
            }
        };
    }

    pub fn open_create(&mut self) {
        self.form = ExamFormState::default();
        self.modal = ModalState::Open(ModalMode::Create);
    }

    /// Opens the modal pre-filled from the listed exam. Returns false when the
    /// id is not in the current list.
    pub fn open_edit(&mut self, exam_id: &str) -> bool {
        let LoadState::Ready(exams) = &self.load else {
            return false;
        };
        let Some(exam) = exams.iter().find(|exam| exam.id == exam_id) else {
            return false;
        };

        self.form = ExamFormState::from_record(exam);
        self.modal = ModalState::Open(ModalMode::Edit(exam.id.clone()));
        true
    }

    /// Closes the modal and resets the form.
    pub fn close_modal(&mut self) {
        if matches!(self.modal, ModalState::Submitting(_)) {
            return;
        }
        self.modal = ModalState::Closed;
        self.form = ExamFormState::default();
    }

    pub fn select_file(&mut self, file: SelectedFile) {
        if let Err(err) = self.form.select_file(file) {
            self.notify(NotificationKind::Error, err.to_string());
        }
    }

    /// Validates locally, then creates or updates depending on the modal mode.
    /// A no-op while another request is in flight.
    pub async fn submit(&mut self) {
        if self.processing {
            return;
        }
        let ModalState::Open(mode) = &self.modal else {
            return;
        };
        let mode = mode.clone();

        if let Err(err) = self.form.validate() {
            self.notify(NotificationKind::Error, err.to_string());
            return;
        }

        let submission = self.form.to_submission();
        self.modal = ModalState::Submitting(mode.clone());
        self.processing = true;

        let result = match &mode {
            ModalMode::Create => self.api.create(submission).await,
            ModalMode::Edit(id) => self.api.update(id, submission).await,
        };
        self.processing = false;

        match result {
            Ok(reply) => {
                self.notify(NotificationKind::Success, reply.message);
                self.modal = ModalState::Closed;
                self.form = ExamFormState::default();
                self.refresh().await;
            }
            Err(err) => {
                self.report(&err, "Failed to save exam");
                self.modal = ModalState::Open(mode);
            }
        }
    }

    pub fn request_delete(&mut self, exam_id: &str) {
        self.pending_delete = Some(exam_id.to_string());
    }

    pub fn cancel_delete(&mut self) {
        if !self.processing {
            self.pending_delete = None;
        }
    }

    /// Sends the delete the confirmation dialog was opened for. The dialog
    /// stays open when the request fails.
    pub async fn confirm_delete(&mut self) {
        if self.processing {
            return;
        }
        let Some(exam_id) = self.pending_delete.clone() else {
            return;
        };

        self.processing = true;
        let result = self.api.delete(&exam_id).await;
        self.processing = false;

        match result {
            Ok(_) => {
                self.pending_delete = None;
                self.notify(NotificationKind::Success, DELETED_MESSAGE.to_string());
                self.refresh().await;
            }
            Err(err) => self.report(&err, "Failed to delete exam"),
        }
    }

    pub fn render(&self) -> Screen {
        let staff = self.viewer.is_staff();

        let body = match &self.load {
            LoadState::Idle | LoadState::Loading => ScreenBody::Loading,
            LoadState::Failed(_) => ScreenBody::Empty(NO_EXAMS_MESSAGE),
            LoadState::Ready(exams) if exams.is_empty() => ScreenBody::Empty(NO_EXAMS_MESSAGE),
            LoadState::Ready(exams) if staff => {
                ScreenBody::Table(exams.iter().map(table_row).collect())
            }
            LoadState::Ready(exams) => {
                ScreenBody::Cards(exams.iter().map(|exam| self.card(exam)).collect())
            }
        };

        let modal = match &self.modal {
            ModalState::Closed => None,
            ModalState::Open(mode) => Some(modal_view(mode, true)),
            ModalState::Submitting(mode) => Some(modal_view(mode, false)),
        };

        Screen {
            show_add_button: staff && !matches!(body, ScreenBody::Loading),
            body,
            modal,
            confirm_delete: self.pending_delete.is_some(),
        }
    }

    fn card(&self, exam: &ExamRecord) -> ExamCard {
        let timetable = match exam.timetable_link.as_deref() {
            Some(link) if !link.is_empty() => Timetable::Image(self.viewer.timetable_url(link)),
            _ => Timetable::Unavailable,
        };

        ExamCard {
            title: exam.name.clone(),
            starting_date: format!("Starting Date: {}", display_date(&exam.start_date)),
            details: format!(
                "Class {} · {} · Total Marks: {}",
                exam.class,
                exam.exam_type.label(),
                exam.total_marks
            ),
            timetable,
        }
    }

    fn notify(&mut self, kind: NotificationKind, message: String) {
        self.notifications.push(Notification { kind, message });
    }

    fn report(&mut self, err: &ClientError, context: &'static str) {
        tracing::warn!(error = %err, "{context}");
        self.notify(NotificationKind::Error, err.user_message());
    }
}

fn table_row(exam: &ExamRecord) -> ExamTableRow {
    ExamTableRow {
        id: exam.id.clone(),
        name: exam.name.clone(),
        class: exam.class,
        exam_type: exam.exam_type.label(),
        total_marks: exam.total_marks,
        start_date: display_date(&exam.start_date),
    }
}

fn modal_view(mode: &ModalMode, submit_enabled: bool) -> ModalView {
    let (title, submit_label) = match mode {
        ModalMode::Create => ("Add Exam", "Submit"),
        ModalMode::Edit(_) => ("Edit Exam", "Update"),
    };
    ModalView { title, submit_label, submit_enabled }
}

fn display_date(raw: &str) -> String {
    raw.chars().take(10).collect()
}
