use async_trait::async_trait;
use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{ExamFields, ExamFilter, ExamStore};
use crate::core::time::primitive_now_utc;
use crate::db::models::{Exam, ExamRow};
use crate::repositories::subjects;

pub(crate) const COLUMNS: &str = "\
    id, name, class, exam_type, total_marks, start_date, timetable_link, \
    created_at, updated_at";

#[derive(Debug, Clone)]
pub(crate) struct PgExamStore {
    pool: PgPool,
}

impl PgExamStore {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) async fn list_rows(
    executor: impl PgExecutor<'_>,
    filter: &ExamFilter,
) -> Result<Vec<ExamRow>, sqlx::Error> {
    let mut builder =
        QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM exams WHERE 1 = 1"));

    if let Some(class) = filter.class {
        builder.push(" AND class = ");
        builder.push_bind(class);
    }

    if let Some(exam_type) = &filter.exam_type {
        builder.push(" AND exam_type::text = ");
        builder.push_bind(exam_type.clone());
    }

    builder.push(" ORDER BY created_at ASC, id ASC");

    builder.build_query_as::<ExamRow>().fetch_all(executor).await
}

pub(crate) async fn find_row(
    executor: impl PgExecutor<'_>,
    id: &str,
) -> Result<Option<ExamRow>, sqlx::Error> {
    sqlx::query_as::<_, ExamRow>(&format!("SELECT {COLUMNS} FROM exams WHERE id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub(crate) async fn insert(
    executor: impl PgExecutor<'_>,
    id: &str,
    fields: &ExamFields,
) -> Result<ExamRow, sqlx::Error> {
    let now = primitive_now_utc();
    sqlx::query_as::<_, ExamRow>(&format!(
        "INSERT INTO exams (id, name, class, exam_type, total_marks, start_date, \
         timetable_link, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(&fields.name)
    .bind(fields.class)
    .bind(fields.exam_type)
    .bind(fields.total_marks)
    .bind(fields.start_date)
    .bind(&fields.timetable_link)
    .bind(now)
    .bind(now)
    .fetch_one(executor)
    .await
}

pub(crate) async fn update_row(
    executor: impl PgExecutor<'_>,
    id: &str,
    fields: &ExamFields,
) -> Result<Option<ExamRow>, sqlx::Error> {
    sqlx::query_as::<_, ExamRow>(&format!(
        "UPDATE exams SET name = $1, class = $2, exam_type = $3, total_marks = $4, \
         start_date = $5, timetable_link = $6, updated_at = $7 \
         WHERE id = $8 RETURNING {COLUMNS}"
    ))
    .bind(&fields.name)
    .bind(fields.class)
    .bind(fields.exam_type)
    .bind(fields.total_marks)
    .bind(fields.start_date)
    .bind(&fields.timetable_link)
    .bind(primitive_now_utc())
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn delete_row(
    executor: impl PgExecutor<'_>,
    id: &str,
) -> Result<Option<ExamRow>, sqlx::Error> {
    sqlx::query_as::<_, ExamRow>(&format!("DELETE FROM exams WHERE id = $1 RETURNING {COLUMNS}"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

#[async_trait]
impl ExamStore for PgExamStore {
    async fn list(&self, filter: &ExamFilter) -> Result<Vec<Exam>, sqlx::Error> {
        let rows = list_rows(&self.pool, filter).await?;
        let ids: Vec<String> = rows.iter().map(|row| row.id.clone()).collect();
        let mut schedules = subjects::schedules_for_exams(&self.pool, &ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let resolved = schedules.remove(&row.id).unwrap_or_default();
                Exam::from_row(row, resolved)
            })
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Exam>, sqlx::Error> {
        let Some(row) = find_row(&self.pool, id).await? else {
            return Ok(None);
        };
        let schedules = subjects::schedules_for_exam(&self.pool, &row.id).await?;
        Ok(Some(Exam::from_row(row, schedules)))
    }

    async fn create(&self, fields: ExamFields) -> Result<Exam, sqlx::Error> {
        let id = Uuid::new_v4().to_string();
        let row = insert(&self.pool, &id, &fields).await?;
        Ok(Exam::from_row(row, Vec::new()))
    }

    async fn update(&self, id: &str, fields: ExamFields) -> Result<Option<Exam>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        subjects::clear_schedules(&mut *tx, id).await?;
        let row = update_row(&mut *tx, id, &fields).await?;
        tx.commit().await?;

        Ok(row.map(|row| Exam::from_row(row, Vec::new())))
    }

    async fn delete(&self, id: &str) -> Result<Option<Exam>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let schedules = subjects::schedules_for_exam(&mut *tx, id).await?;
        let row = delete_row(&mut *tx, id).await?;
        tx.commit().await?;

        Ok(row.map(|row| Exam::from_row(row, schedules)))
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sqlx::postgres::PgPoolOptions;
    use time::macros::date;

    use super::*;
    use crate::db::types::ExamType;

    async fn connect() -> Option<PgPool> {
        let database_url =
            std::env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty())?;

        let pool =
            PgPoolOptions::new().max_connections(2).connect(&database_url).await.expect("connect");
        crate::db::run_migrations(&pool).await.expect("migrations");
        Some(pool)
    }

    /// A class number no other run is likely to use, so filters only see this test's rows.
    fn scratch_class() -> i32 {
        (rand::random::<u32>() % 1_000_000) as i32 + 1_000
    }

    fn fields(name: &str, class: i32, exam_type: ExamType) -> ExamFields {
        ExamFields {
            name: name.to_string(),
            class,
            exam_type,
            total_marks: 100,
            start_date: date!(2024 - 03 - 01),
            timetable_link: format!("{name}.png"),
        }
    }

    async fn seed_schedule(pool: &PgPool, exam_id: &str, subjects: &[(&str, i32)]) -> Vec<String> {
        let mut ids = Vec::new();
        for (name, position) in subjects {
            let id = Uuid::new_v4().to_string();
            sqlx::query("INSERT INTO subjects (id, name, code) VALUES ($1, $2, NULL)")
                .bind(&id)
                .bind(name)
                .execute(pool)
                .await
                .expect("insert subject");
            sqlx::query(
                "INSERT INTO exam_schedules (exam_id, subject_id, position) VALUES ($1, $2, $3)",
            )
            .bind(exam_id)
            .bind(&id)
            .bind(position)
            .execute(pool)
            .await
            .expect("insert schedule");
            ids.push(id);
        }
        ids
    }

    async fn cleanup(pool: &PgPool, class: i32, subject_ids: &[String]) {
        sqlx::query("DELETE FROM exams WHERE class = $1")
            .bind(class)
            .execute(pool)
            .await
            .expect("cleanup exams");
        sqlx::query("DELETE FROM subjects WHERE id = ANY($1)")
            .bind(subject_ids)
            .execute(pool)
            .await
            .expect("cleanup subjects");
    }

    #[tokio::test]
    async fn list_filters_and_keeps_creation_order() {
        let Some(pool) = connect().await else {
            eprintln!("skipping: DATABASE_URL is not set");
            return;
        };
        let store = PgExamStore::new(pool.clone());
        let class = scratch_class();

        let first = store.create(fields("first", class, ExamType::Mid)).await.expect("create");
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = store.create(fields("second", class, ExamType::End)).await.expect("create");
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let third = store.create(fields("third", class, ExamType::Mid)).await.expect("create");

        let all = store
            .list(&ExamFilter { class: Some(class), exam_type: None })
            .await
            .expect("list");
        let ids: Vec<_> = all.iter().map(|exam| exam.id.as_str()).collect();
        assert_eq!(ids, vec![first.id.as_str(), second.id.as_str(), third.id.as_str()]);

        let mids = store
            .list(&ExamFilter { class: Some(class), exam_type: Some("mid".to_string()) })
            .await
            .expect("list mid");
        let ids: Vec<_> = mids.iter().map(|exam| exam.id.as_str()).collect();
        assert_eq!(ids, vec![first.id.as_str(), third.id.as_str()]);

        let unknown = store
            .list(&ExamFilter { class: Some(class), exam_type: Some("final".to_string()) })
            .await
            .expect("list unknown type");
        assert!(unknown.is_empty());

        cleanup(&pool, class, &[]).await;
    }

    #[tokio::test]
    async fn schedules_are_populated_in_position_order() {
        let Some(pool) = connect().await else {
            eprintln!("skipping: DATABASE_URL is not set");
            return;
        };
        let store = PgExamStore::new(pool.clone());
        let class = scratch_class();

        let exam = store.create(fields("scheduled", class, ExamType::End)).await.expect("create");
        assert!(exam.schedules.is_empty());
        let subject_ids = seed_schedule(&pool, &exam.id, &[("Physics", 2), ("Maths", 1)]).await;

        let listed = store
            .list(&ExamFilter { class: Some(class), exam_type: None })
            .await
            .expect("list");
        let names: Vec<_> =
            listed[0].schedules.iter().map(|schedule| schedule.subject.name.as_str()).collect();
        assert_eq!(names, vec!["Maths", "Physics"]);

        let found = store.find_by_id(&exam.id).await.expect("find").expect("exam");
        assert_eq!(found.schedules, listed[0].schedules);

        let updated = store
            .update(&exam.id, fields("rescheduled", class, ExamType::Mid))
            .await
            .expect("update")
            .expect("exam");
        assert_eq!(updated.name, "rescheduled");
        assert!(updated.schedules.is_empty());
        let found = store.find_by_id(&exam.id).await.expect("find").expect("exam");
        assert!(found.schedules.is_empty());

        cleanup(&pool, class, &subject_ids).await;
    }

    #[tokio::test]
    async fn delete_returns_schedules_and_cascades() {
        let Some(pool) = connect().await else {
            eprintln!("skipping: DATABASE_URL is not set");
            return;
        };
        let store = PgExamStore::new(pool.clone());
        let class = scratch_class();

        let exam = store.create(fields("doomed", class, ExamType::Mid)).await.expect("create");
        let subject_ids = seed_schedule(&pool, &exam.id, &[("History", 1)]).await;

        let removed = store.delete(&exam.id).await.expect("delete").expect("exam");
        assert_eq!(removed.id, exam.id);
        assert_eq!(removed.schedules.len(), 1);
        assert_eq!(removed.schedules[0].subject.name, "History");

        let remaining: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM exam_schedules WHERE exam_id = $1")
                .bind(&exam.id)
                .fetch_one(&pool)
                .await
                .expect("count schedules");
        assert_eq!(remaining, 0);
        assert!(store.find_by_id(&exam.id).await.expect("find").is_none());

        cleanup(&pool, class, &subject_ids).await;
    }

    #[tokio::test]
    async fn missing_exams_are_none() {
        let Some(pool) = connect().await else {
            eprintln!("skipping: DATABASE_URL is not set");
            return;
        };
        let store = PgExamStore::new(pool);
        let missing = Uuid::new_v4().to_string();

        assert!(store.find_by_id(&missing).await.expect("find").is_none());
        let updated = store
            .update(&missing, fields("ghost", scratch_class(), ExamType::Mid))
            .await
            .expect("update");
        assert!(updated.is_none());
        assert!(store.delete(&missing).await.expect("delete").is_none());
    }
}
