use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;

use crate::application::errors::CatalogError;
use crate::application::ports::audit_log_repository::{AuditEvent, AuditLogRepository};
use crate::application::ports::category_repository::CategoryRepository;
use crate::application::ports::product_repository::ProductRepository;
use crate::application::services::audit;
use crate::domain::catalog::product::{Product, ProductFields};

#[derive(Debug, Clone)]
pub struct UpdateProductRequest {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub category_id: Uuid,
    pub is_active: bool,
}

pub struct UpdateProduct<'a, P, C, A>
where
    P: ProductRepository + ?Sized,
    C: CategoryRepository + ?Sized,
    A: AuditLogRepository + ?Sized,
{
    pub products: &'a P,
    pub categories: &'a C,
    pub audit: &'a A,
}

impl<'a, P, C, A> UpdateProduct<'a, P, C, A>
where
    P: ProductRepository + ?Sized,
    C: CategoryRepository + ?Sized,
    A: AuditLogRepository + ?Sized,
{
    pub async fn execute(
        &self,
        actor: Uuid,
        id: Uuid,
        req: UpdateProductRequest,
    ) -> Result<Product, CatalogError> {
        let is_active = req.is_active;
        let fields = ProductFields {
            name: req.name,
            description: req.description,
            price: req.price,
            stock_quantity: req.stock_quantity,
            category_id: req.category_id,
        }
        .normalized()
        .map_err(CatalogError::Validation)?;
        if self.categories.get(fields.category_id).await?.is_none() {
            return Err(CatalogError::Validation("Category does not exist".into()));
        }
        if !self.products.update(id, &fields, is_active).await? {
            return Err(CatalogError::ProductNotFound);
        }
        let product = self
            .products
            .get(id)
            .await?
            .ok_or(CatalogError::ProductNotFound)?;
        audit::record(
            self.audit,
            AuditEvent::new("product.updated")
                .by(actor)
                .on("product", id)
                .with_metadata(json!({
                    "price": product.price.to_string(),
                    "stockQuantity": product.stock_quantity,
                    "isActive": product.is_active,
                })),
        )
        .await;
        Ok(product)
    }
}
