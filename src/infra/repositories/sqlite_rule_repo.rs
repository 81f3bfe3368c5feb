use crate::domain::{models::checklist::CleaningRule, ports::CleaningRuleRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteRuleRepo {
    pool: SqlitePool,
}

impl SqliteRuleRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl CleaningRuleRepository for SqliteRuleRepo {
    async fn create(&self, rule: &CleaningRule) -> Result<CleaningRule, AppError> {
        sqlx::query_as::<_, CleaningRule>(
            "INSERT INTO cleaning_rules (id, listing_id, name, cleaning_type, trigger_type, interval_days, min_nights, template_id, is_active, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&rule.id).bind(&rule.listing_id).bind(&rule.name).bind(&rule.cleaning_type)
            .bind(&rule.trigger_type).bind(rule.interval_days).bind(rule.min_nights)
            .bind(&rule.template_id).bind(rule.is_active).bind(rule.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<CleaningRule>, AppError> {
        sqlx::query_as::<_, CleaningRule>("SELECT * FROM cleaning_rules ORDER BY created_at ASC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_active_for_listing(&self, listing_id: &str) -> Result<Vec<CleaningRule>, AppError> {
        sqlx::query_as::<_, CleaningRule>(
            r#"SELECT * FROM cleaning_rules
               WHERE is_active = TRUE AND (listing_id = ? OR listing_id IS NULL)
               ORDER BY (listing_id IS NULL) ASC, created_at ASC"#
        )
            .bind(listing_id)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM cleaning_rules WHERE id = ?")
            .bind(id)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Cleaning rule not found".into())); }
        Ok(())
    }
}
