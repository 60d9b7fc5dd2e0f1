use uuid::Uuid;

use crate::application::errors::CatalogError;
use crate::application::ports::DeleteOutcome;
use crate::application::ports::audit_log_repository::{AuditEvent, AuditLogRepository};
use crate::application::ports::product_repository::ProductRepository;
use crate::application::services::audit;

pub struct DeleteProduct<'a, R, A>
where
    R: ProductRepository + ?Sized,
    A: AuditLogRepository + ?Sized,
{
    pub repo: &'a R,
    pub audit: &'a A,
}

impl<'a, R, A> DeleteProduct<'a, R, A>
where
    R: ProductRepository + ?Sized,
    A: AuditLogRepository + ?Sized,
{
    pub async fn execute(&self, actor: Uuid, id: Uuid) -> Result<(), CatalogError> {
        match self.repo.delete(id).await? {
            DeleteOutcome::Deleted => {
                audit::record(
                    self.audit,
                    AuditEvent::new("product.deleted").by(actor).on("product", id),
                )
                .await;
                Ok(())
            }
            DeleteOutcome::NotFound => Err(CatalogError::ProductNotFound),
            DeleteOutcome::InUse => Err(CatalogError::ProductInUse),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::FakeShop;
    use crate::domain::users::user::UserRole;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn ordered_products_cannot_be_deleted() {
        let shop = FakeShop::default();
        let cat = shop.add_category("Electronics");
        let sold = shop.add_product("Wireless Mouse", "ELEC-MOU-001", dec!(29.99), 200, cat);
        let fresh = shop.add_product("Laptop Pro 15", "ELEC-LAP-001", dec!(1299.99), 50, cat);
        let buyer = shop.add_user("customer@example.com", "Password123!", UserRole::Customer);
        shop.place_order(buyer, &[(sold, 1)]).await;

        let uc = DeleteProduct {
            repo: &shop,
            audit: &shop,
        };
        let actor = Uuid::new_v4();
        assert!(matches!(
            uc.execute(actor, sold).await,
            Err(CatalogError::ProductInUse)
        ));
        uc.execute(actor, fresh).await.unwrap();
        assert!(matches!(
            uc.execute(actor, fresh).await,
            Err(CatalogError::ProductNotFound)
        ));
    }
}
