use crate::domain::{models::checklist::ChecklistTemplate, ports::ChecklistTemplateRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteTemplateRepo {
    pool: SqlitePool,
}

impl SqliteTemplateRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl ChecklistTemplateRepository for SqliteTemplateRepo {
    async fn create(&self, template: &ChecklistTemplate) -> Result<ChecklistTemplate, AppError> {
        sqlx::query_as::<_, ChecklistTemplate>(
            "INSERT INTO checklist_templates (id, name, cleaning_type, items, is_default, created_at) VALUES (?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&template.id)
            .bind(&template.name)
            .bind(&template.cleaning_type)
            .bind(&template.items)
            .bind(template.is_default)
            .bind(template.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ChecklistTemplate>, AppError> {
        sqlx::query_as::<_, ChecklistTemplate>("SELECT * FROM checklist_templates WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_default(&self, cleaning_type: &str) -> Result<Option<ChecklistTemplate>, AppError> {
        sqlx::query_as::<_, ChecklistTemplate>(
            "SELECT * FROM checklist_templates WHERE cleaning_type = ? AND is_default = TRUE ORDER BY created_at DESC LIMIT 1"
        )
            .bind(cleaning_type)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<ChecklistTemplate>, AppError> {
        sqlx::query_as::<_, ChecklistTemplate>("SELECT * FROM checklist_templates ORDER BY cleaning_type ASC, name ASC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
