use crate::domain::{models::housekeeping::{HousekeepingTask, TaskFilter}, ports::HousekeepingTaskRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashSet;

pub struct PostgresTaskRepo {
    pool: PgPool,
}

impl PostgresTaskRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl HousekeepingTaskRepository for PostgresTaskRepo {
    async fn create_many(&self, tasks: &[HousekeepingTask]) -> Result<Vec<HousekeepingTask>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let mut created = Vec::with_capacity(tasks.len());

        for task in tasks {
            let row = sqlx::query_as::<_, HousekeepingTask>(
                r#"INSERT INTO housekeeping_tasks (id, booking_id, listing_id, title, due_date, task_type, checklist, status, assigned_to, is_primary, created_at, updated_at)
                   VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                   RETURNING *"#
            )
                .bind(&task.id).bind(&task.booking_id).bind(&task.listing_id).bind(&task.title)
                .bind(task.due_date).bind(&task.task_type).bind(&task.checklist).bind(&task.status)
                .bind(&task.assigned_to).bind(task.is_primary).bind(task.created_at).bind(task.updated_at)
                .fetch_one(&mut *tx).await.map_err(AppError::Database)?;
            created.push(row);
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<HousekeepingTask>, AppError> {
        sqlx::query_as::<_, HousekeepingTask>("SELECT * FROM housekeeping_tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self, filter: &TaskFilter) -> Result<Vec<HousekeepingTask>, AppError> {
        let query = r#"
            SELECT * FROM housekeeping_tasks
            WHERE ($1::text IS NULL OR listing_id = $1)
            AND ($2::text IS NULL OR booking_id = $2)
            AND ($3::text IS NULL OR status = $3)
            AND ($4::date IS NULL OR due_date >= $4)
            AND ($5::date IS NULL OR due_date <= $5)
            ORDER BY due_date ASC, is_primary DESC, created_at ASC
        "#;

        sqlx::query_as::<_, HousekeepingTask>(query)
            .bind(&filter.listing_id)
            .bind(&filter.booking_id)
            .bind(&filter.status)
            .bind(filter.due_from)
            .bind(filter.due_to)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, task: &HousekeepingTask) -> Result<HousekeepingTask, AppError> {
        sqlx::query_as::<_, HousekeepingTask>(
            r#"UPDATE housekeeping_tasks SET title=$1, due_date=$2, task_type=$3, checklist=$4, status=$5, assigned_to=$6, updated_at=$7
               WHERE id=$8
               RETURNING *"#
        )
            .bind(&task.title).bind(task.due_date).bind(&task.task_type).bind(&task.checklist)
            .bind(&task.status).bind(&task.assigned_to).bind(task.updated_at)
            .bind(&task.id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound(format!("Task {} not found", task.id)))
    }

    async fn booking_ids_with_tasks(&self, booking_ids: &[String]) -> Result<HashSet<String>, AppError> {
        if booking_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let rows: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT booking_id FROM housekeeping_tasks WHERE booking_id = ANY($1)"
        )
            .bind(booking_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(rows.into_iter().collect())
    }
}
