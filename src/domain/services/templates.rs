use crate::domain::ports::ChecklistTemplateRepository;
use crate::domain::services::defaults::get_default_checklist;
use crate::error::AppError;
use tracing::debug;

/// Picks the checklist for a task: the explicit template when given, else the
/// stored default for the cleaning type, else the built-in one.
pub async fn resolve_checklist(
    repo: &dyn ChecklistTemplateRepository,
    template_id: Option<&str>,
    cleaning_type: &str,
) -> Result<Vec<String>, AppError> {
    if let Some(id) = template_id {
        let template = repo.find_by_id(id).await?
            .ok_or(AppError::NotFound(format!("Checklist template {} not found", id)))?;
        return Ok(template.items.0);
    }

    if let Some(template) = repo.find_default(cleaning_type).await? {
        debug!("Using stored default template {} for {}", template.id, cleaning_type);
        return Ok(template.items.0);
    }

    Ok(get_default_checklist(cleaning_type))
}
