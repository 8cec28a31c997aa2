use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, PrimitiveDateTime};

use crate::db::types::ExamType;

#[derive(Debug, Clone, FromRow)]
pub(crate) struct ExamRow {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) class: i32,
    pub(crate) exam_type: ExamType,
    pub(crate) total_marks: i32,
    pub(crate) start_date: Date,
    pub(crate) timetable_link: String,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub(crate) struct Subject {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct Schedule {
    pub(crate) subject: Subject,
}

/// An exam with its schedules resolved to full subjects.
#[derive(Debug, Clone)]
pub(crate) struct Exam {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) class: i32,
    pub(crate) exam_type: ExamType,
    pub(crate) total_marks: i32,
    pub(crate) start_date: Date,
    pub(crate) timetable_link: String,
    pub(crate) schedules: Vec<Schedule>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

impl Exam {
    pub(crate) fn from_row(row: ExamRow, schedules: Vec<Schedule>) -> Self {
        Self {
            id: row.id,
            name: row.name,
            class: row.class,
            exam_type: row.exam_type,
            total_marks: row.total_marks,
            start_date: row.start_date,
            timetable_link: row.timetable_link,
            schedules,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
