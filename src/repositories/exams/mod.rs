//! Exam persistence.
//!
//! Handlers talk to [`ExamStore`] so the HTTP layer can be exercised without
//! a database. [`PgExamStore`] is what the server runs on.

#[cfg(test)]
mod memory;
mod postgres;

use async_trait::async_trait;
use time::Date;

use crate::db::models::Exam;
use crate::db::types::ExamType;

#[cfg(test)]
pub(crate) use memory::InMemoryExamStore;
pub(crate) use postgres::PgExamStore;

/// Exact-match filters for listing. `exam_type` stays a raw string: an
/// unknown value is not an error, it just matches nothing.
#[derive(Debug, Clone, Default)]
pub(crate) struct ExamFilter {
    pub(crate) class: Option<i32>,
    pub(crate) exam_type: Option<String>,
}

impl ExamFilter {
    pub(crate) fn matches(&self, exam: &Exam) -> bool {
        self.class.map_or(true, |class| exam.class == class)
            && self.exam_type.as_deref().map_or(true, |kind| exam.exam_type.as_str() == kind)
    }
}

/// The writable fields of an exam. Schedules are always written empty.
#[derive(Debug, Clone)]
pub(crate) struct ExamFields {
    pub(crate) name: String,
    pub(crate) class: i32,
    pub(crate) exam_type: ExamType,
    pub(crate) total_marks: i32,
    pub(crate) start_date: Date,
    pub(crate) timetable_link: String,
}

#[async_trait]
pub(crate) trait ExamStore: Send + Sync {
    /// Matching exams in creation order, schedules populated.
    async fn list(&self, filter: &ExamFilter) -> Result<Vec<Exam>, sqlx::Error>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Exam>, sqlx::Error>;

    async fn create(&self, fields: ExamFields) -> Result<Exam, sqlx::Error>;

    /// Replaces every writable field and clears schedules. `None` when the
    /// exam no longer exists.
    async fn update(&self, id: &str, fields: ExamFields) -> Result<Option<Exam>, sqlx::Error>;

    /// Removes the exam and returns what was removed, if anything.
    async fn delete(&self, id: &str) -> Result<Option<Exam>, sqlx::Error>;

    async fn ping(&self) -> Result<(), sqlx::Error>;
}
