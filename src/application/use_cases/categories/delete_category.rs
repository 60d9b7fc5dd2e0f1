use uuid::Uuid;

use crate::application::errors::CatalogError;
use crate::application::ports::DeleteOutcome;
use crate::application::ports::audit_log_repository::{AuditEvent, AuditLogRepository};
use crate::application::ports::category_repository::CategoryRepository;
use crate::application::services::audit;

pub struct DeleteCategory<'a, R, A>
where
    R: CategoryRepository + ?Sized,
    A: AuditLogRepository + ?Sized,
{
    pub repo: &'a R,
    pub audit: &'a A,
}

impl<'a, R, A> DeleteCategory<'a, R, A>
where
    R: CategoryRepository + ?Sized,
    A: AuditLogRepository + ?Sized,
{
    pub async fn execute(&self, actor: Uuid, id: Uuid) -> Result<(), CatalogError> {
        match self.repo.delete(id).await? {
            DeleteOutcome::Deleted => {
                audit::record(
                    self.audit,
                    AuditEvent::new("category.deleted").by(actor).on("category", id),
                )
                .await;
                Ok(())
            }
            DeleteOutcome::NotFound => Err(CatalogError::CategoryNotFound),
            DeleteOutcome::InUse => Err(CatalogError::CategoryInUse),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::FakeShop;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn categories_with_products_stay() {
        let shop = FakeShop::default();
        let books = shop.add_category("Books");
        let empty = shop.add_category("Empty");
        shop.add_product("Programming Guide", "BOOK-PRG-001", dec!(49.99), 75, books);
        let uc = DeleteCategory {
            repo: &shop,
            audit: &shop,
        };
        let actor = Uuid::new_v4();

        assert!(matches!(
            uc.execute(actor, books).await,
            Err(CatalogError::CategoryInUse)
        ));
        uc.execute(actor, empty).await.unwrap();
        assert!(matches!(
            uc.execute(actor, empty).await,
            Err(CatalogError::CategoryNotFound)
        ));
        assert_eq!(shop.audit_events(), vec!["category.deleted"]);
    }
}
