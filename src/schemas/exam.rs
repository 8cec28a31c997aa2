use serde::Serialize;
use time::Date;
use validator::Validate;

use crate::core::time::{format_date, format_primitive};
use crate::db::models::{Exam, Schedule, Subject};
use crate::db::types::ExamType;

/// Exam fields after coercion from the multipart form.
#[derive(Debug, Clone, Validate)]
pub(crate) struct ExamForm {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub(crate) name: String,
    #[validate(range(min = 0, message = "class must be a non-negative integer"))]
    pub(crate) class: i32,
    pub(crate) exam_type: ExamType,
    #[validate(range(min = 0, message = "totalMarks must be a non-negative integer"))]
    pub(crate) total_marks: i32,
    pub(crate) start_date: Date,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubjectResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) code: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ScheduleResponse {
    pub(crate) subject: SubjectResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExamResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) class: i32,
    pub(crate) exam_type: ExamType,
    pub(crate) total_marks: i32,
    pub(crate) start_date: String,
    pub(crate) timetable_link: String,
    pub(crate) schedules: Vec<ScheduleResponse>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl From<Subject> for SubjectResponse {
    fn from(subject: Subject) -> Self {
        Self { id: subject.id, name: subject.name, code: subject.code }
    }
}

impl From<Schedule> for ScheduleResponse {
    fn from(schedule: Schedule) -> Self {
        Self { subject: schedule.subject.into() }
    }
}

impl From<Exam> for ExamResponse {
    fn from(exam: Exam) -> Self {
        Self {
            id: exam.id,
            name: exam.name,
            class: exam.class,
            exam_type: exam.exam_type,
            total_marks: exam.total_marks,
            start_date: format_date(exam.start_date),
            timetable_link: exam.timetable_link,
            schedules: exam.schedules.into_iter().map(ScheduleResponse::from).collect(),
            created_at: format_primitive(exam.created_at),
            updated_at: format_primitive(exam.updated_at),
        }
    }
}
