use thiserror::Error;

use crate::media;

use super::api::{ExamRecord, ExamSubmission};

/// A file picked in the form, not yet uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please fill all the fields")]
    MissingFields,
    #[error("Please upload a timetable image")]
    MissingFile,
    #[error("{}", media::INVALID_IMAGE_MESSAGE)]
    InvalidFileType,
}

/// Local state of the create/edit modal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExamFormState {
    pub name: String,
    pub class: String,
    pub exam_type: String,
    pub total_marks: String,
    pub start_date: String,
    file: Option<SelectedFile>,
    existing_link: Option<String>,
}

impl ExamFormState {
    /// Pre-fills the form from a listed exam. The file selection starts empty.
    pub fn from_record(exam: &ExamRecord) -> Self {
        Self {
            name: exam.name.clone(),
            class: exam.class.to_string(),
            exam_type: exam.exam_type.as_str().to_string(),
            total_marks: exam.total_marks.to_string(),
            start_date: exam.start_date.chars().take(10).collect(),
            file: None,
            existing_link: exam.timetable_link.clone().filter(|link| !link.is_empty()),
        }
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    /// Rejects anything outside the image whitelist. A rejected pick also
    /// drops whatever was selected before.
    pub fn select_file(&mut self, file: SelectedFile) -> Result<(), FormError> {
        if !media::is_accepted_image_type(&file.content_type) {
            self.file = None;
            return Err(FormError::InvalidFileType);
        }
        self.file = Some(file);
        Ok(())
    }

    pub fn clear_file(&mut self) {
        self.file = None;
    }

    /// A file is needed unless the exam being edited already has a timetable.
    pub fn validate(&self) -> Result<(), FormError> {
        let fields = [&self.name, &self.class, &self.exam_type, &self.total_marks, &self.start_date];
        if fields.iter().any(|value| value.trim().is_empty()) {
            return Err(FormError::MissingFields);
        }
        if self.file.is_none() && self.existing_link.is_none() {
            return Err(FormError::MissingFile);
        }
        Ok(())
    }

    pub fn to_submission(&self) -> ExamSubmission {
        ExamSubmission {
            name: self.name.trim().to_string(),
            class: self.class.trim().to_string(),
            exam_type: self.exam_type.trim().to_string(),
            total_marks: self.total_marks.trim().to_string(),
            start_date: self.start_date.trim().to_string(),
            file: self.file.clone(),
        }
    }
}
