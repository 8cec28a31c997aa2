use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use super::{ExamFields, ExamFilter, ExamStore};
use crate::core::time::primitive_now_utc;
use crate::db::models::{Exam, Schedule};

/// Insertion-ordered store used by router tests.
#[derive(Debug, Default)]
pub(crate) struct InMemoryExamStore {
    exams: RwLock<Vec<Exam>>,
}

impl InMemoryExamStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Seeds schedules directly; the HTTP flow never writes them.
    pub(crate) fn attach_schedules(&self, exam_id: &str, schedules: Vec<Schedule>) {
        let mut exams = self.exams.write().expect("exam store lock");
        if let Some(exam) = exams.iter_mut().find(|exam| exam.id == exam_id) {
            exam.schedules = schedules;
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.exams.read().expect("exam store lock").len()
    }

    fn poisoned() -> sqlx::Error {
        sqlx::Error::Protocol("exam store lock poisoned".to_string())
    }
}

#[async_trait]
impl ExamStore for InMemoryExamStore {
    async fn list(&self, filter: &ExamFilter) -> Result<Vec<Exam>, sqlx::Error> {
        let exams = self.exams.read().map_err(|_| Self::poisoned())?;
        Ok(exams.iter().filter(|exam| filter.matches(exam)).cloned().collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Exam>, sqlx::Error> {
        let exams = self.exams.read().map_err(|_| Self::poisoned())?;
        Ok(exams.iter().find(|exam| exam.id == id).cloned())
    }

    async fn create(&self, fields: ExamFields) -> Result<Exam, sqlx::Error> {
        let now = primitive_now_utc();
        let exam = Exam {
            id: Uuid::new_v4().to_string(),
            name: fields.name,
            class: fields.class,
            exam_type: fields.exam_type,
            total_marks: fields.total_marks,
            start_date: fields.start_date,
            timetable_link: fields.timetable_link,
            schedules: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let mut exams = self.exams.write().map_err(|_| Self::poisoned())?;
        exams.push(exam.clone());
        Ok(exam)
    }

    async fn update(&self, id: &str, fields: ExamFields) -> Result<Option<Exam>, sqlx::Error> {
        let mut exams = self.exams.write().map_err(|_| Self::poisoned())?;
        let Some(exam) = exams.iter_mut().find(|exam| exam.id == id) else {
            return Ok(None);
        };

        exam.name = fields.name;
        exam.class = fields.class;
        exam.exam_type = fields.exam_type;
        exam.total_marks = fields.total_marks;
        exam.start_date = fields.start_date;
        exam.timetable_link = fields.timetable_link;
        exam.schedules.clear();
        exam.updated_at = primitive_now_utc();

        Ok(Some(exam.clone()))
    }

    async fn delete(&self, id: &str) -> Result<Option<Exam>, sqlx::Error> {
        let mut exams = self.exams.write().map_err(|_| Self::poisoned())?;
        let position = exams.iter().position(|exam| exam.id == id);
        Ok(position.map(|index| exams.remove(index)))
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        Ok(())
    }
}
