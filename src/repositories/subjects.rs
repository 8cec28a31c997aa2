use std::collections::HashMap;

use sqlx::PgExecutor;

use crate::db::models::{Schedule, Subject};

#[derive(Debug, sqlx::FromRow)]
struct ScheduleRow {
    exam_id: String,
    subject_id: String,
    subject_name: String,
    subject_code: Option<String>,
}

impl ScheduleRow {
    fn into_schedule(self) -> Schedule {
        Schedule {
            subject: Subject { id: self.subject_id, name: self.subject_name, code: self.subject_code },
        }
    }
}

const SCHEDULE_SELECT: &str = "\
    SELECT es.exam_id, s.id AS subject_id, s.name AS subject_name, s.code AS subject_code \
    FROM exam_schedules es \
    JOIN subjects s ON s.id = es.subject_id";

/// Schedules for several exams keyed by exam id, each in position order.
pub(crate) async fn schedules_for_exams(
    executor: impl PgExecutor<'_>,
    exam_ids: &[String],
) -> Result<HashMap<String, Vec<Schedule>>, sqlx::Error> {
    if exam_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = sqlx::query_as::<_, ScheduleRow>(&format!(
        "{SCHEDULE_SELECT} WHERE es.exam_id = ANY($1) ORDER BY es.exam_id, es.position"
    ))
    .bind(exam_ids)
    .fetch_all(executor)
    .await?;

    let mut grouped: HashMap<String, Vec<Schedule>> = HashMap::new();
    for row in rows {
        grouped.entry(row.exam_id.clone()).or_default().push(row.into_schedule());
    }
    Ok(grouped)
}

pub(crate) async fn schedules_for_exam(
    executor: impl PgExecutor<'_>,
    exam_id: &str,
) -> Result<Vec<Schedule>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ScheduleRow>(&format!(
        "{SCHEDULE_SELECT} WHERE es.exam_id = $1 ORDER BY es.position"
    ))
    .bind(exam_id)
    .fetch_all(executor)
    .await?;

    Ok(rows.into_iter().map(ScheduleRow::into_schedule).collect())
}

pub(crate) async fn clear_schedules(
    executor: impl PgExecutor<'_>,
    exam_id: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM exam_schedules WHERE exam_id = $1")
        .bind(exam_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
