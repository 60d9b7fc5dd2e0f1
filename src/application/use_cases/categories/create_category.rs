use serde_json::json;
use uuid::Uuid;

use crate::application::errors::CatalogError;
use crate::application::ports::audit_log_repository::{AuditEvent, AuditLogRepository};
use crate::application::ports::category_repository::CategoryRepository;
use crate::application::services::audit;
use crate::domain::catalog::category::{CATEGORY_NAME_MAX, Category};

#[derive(Debug, Clone)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
    pub parent_category_id: Option<Uuid>,
}

pub struct CreateCategory<'a, R, A>
where
    R: CategoryRepository + ?Sized,
    A: AuditLogRepository + ?Sized,
{
    pub repo: &'a R,
    pub audit: &'a A,
}

impl<'a, R, A> CreateCategory<'a, R, A>
where
    R: CategoryRepository + ?Sized,
    A: AuditLogRepository + ?Sized,
{
    pub async fn execute(
        &self,
        actor: Uuid,
        req: &CreateCategoryRequest,
    ) -> Result<Category, CatalogError> {
        let name = req.name.trim();
        if name.is_empty() || name.chars().count() > CATEGORY_NAME_MAX {
            return Err(CatalogError::Validation(format!(
                "name must be between 1 and {CATEGORY_NAME_MAX} characters"
            )));
        }
        let description = req
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty());
        if let Some(parent) = req.parent_category_id {
            if self.repo.get(parent).await?.is_none() {
                return Err(CatalogError::Validation(
                    "Parent category does not exist".into(),
                ));
            }
        }
        let category = self
            .repo
            .create(name, description, req.parent_category_id)
            .await?;
        audit::record(
            self.audit,
            AuditEvent::new("category.created")
                .by(actor)
                .on("category", category.id)
                .with_metadata(json!({ "name": category.name })),
        )
        .await;
        Ok(category)
    }
}
