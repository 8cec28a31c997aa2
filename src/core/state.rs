use std::sync::Arc;

use crate::core::config::Settings;
use crate::repositories::exams::ExamStore;
use crate::services::storage::MediaStorage;

#[derive(Clone)]
pub(crate) struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    settings: Settings,
    exams: Arc<dyn ExamStore>,
    media: MediaStorage,
}

impl AppState {
    pub(crate) fn new(settings: Settings, exams: Arc<dyn ExamStore>, media: MediaStorage) -> Self {
        Self { inner: Arc::new(InnerState { settings, exams, media }) }
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub(crate) fn exams(&self) -> &dyn ExamStore {
        self.inner.exams.as_ref()
    }

    pub(crate) fn media(&self) -> &MediaStorage {
        &self.inner.media
    }
}
