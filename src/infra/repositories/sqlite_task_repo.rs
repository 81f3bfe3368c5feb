use crate::domain::{models::housekeeping::{HousekeepingTask, TaskFilter}, ports::HousekeepingTaskRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;
use std::collections::HashSet;

pub struct SqliteTaskRepo {
    pool: SqlitePool,
}

impl SqliteTaskRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl HousekeepingTaskRepository for SqliteTaskRepo {
    async fn create_many(&self, tasks: &[HousekeepingTask]) -> Result<Vec<HousekeepingTask>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let mut created = Vec::with_capacity(tasks.len());

        for task in tasks {
            let row = sqlx::query_as::<_, HousekeepingTask>(
                "INSERT INTO housekeeping_tasks (id, booking_id, listing_id, title, due_date, task_type, checklist, status, assigned_to, is_primary, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                 RETURNING *"
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
        sqlx::query_as::<_, HousekeepingTask>("SELECT * FROM housekeeping_tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self, filter: &TaskFilter) -> Result<Vec<HousekeepingTask>, AppError> {
        let query = r#"
            SELECT * FROM housekeeping_tasks
            WHERE (? IS NULL OR listing_id = ?)
            AND (? IS NULL OR booking_id = ?)
            AND (? IS NULL OR status = ?)
            AND (? IS NULL OR due_date >= ?)
            AND (? IS NULL OR due_date <= ?)
            ORDER BY due_date ASC, is_primary DESC, created_at ASC
        "#;

        sqlx::query_as::<_, HousekeepingTask>(query)
            .bind(&filter.listing_id).bind(&filter.listing_id)
            .bind(&filter.booking_id).bind(&filter.booking_id)
            .bind(&filter.status).bind(&filter.status)
            .bind(filter.due_from).bind(filter.due_from)
            .bind(filter.due_to).bind(filter.due_to)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, task: &HousekeepingTask) -> Result<HousekeepingTask, AppError> {
        sqlx::query_as::<_, HousekeepingTask>(
            "UPDATE housekeeping_tasks SET title=?, due_date=?, task_type=?, checklist=?, status=?, assigned_to=?, updated_at=?
             WHERE id=?
             RETURNING *"
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

        // SQLite caps bound parameters at 999
        const CHUNK: usize = 900;
        let mut covered = HashSet::new();

        for chunk in booking_ids.chunks(CHUNK) {
            let placeholders: Vec<&str> = chunk.iter().map(|_| "?").collect();
            let query = format!(
                "SELECT DISTINCT booking_id FROM housekeeping_tasks WHERE booking_id IN ({})",
                placeholders.join(", ")
            );

            let mut q = sqlx::query_scalar::<_, String>(&query);
            for id in chunk {
                q = q.bind(id);
            }
            covered.extend(q.fetch_all(&self.pool).await.map_err(AppError::Database)?);
        }

        Ok(covered)
    }
}
