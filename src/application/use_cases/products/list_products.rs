use crate::application::ports::product_repository::ProductRepository;
use crate::domain::catalog::product::{Page, Product, ProductQuery};

pub struct ListProducts<'a, R: ProductRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ProductRepository + ?Sized> ListProducts<'a, R> {
    pub async fn execute(&self, query: &ProductQuery) -> anyhow::Result<Page<Product>> {
        self.repo.list(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::FakeShop;
    use crate::domain::catalog::product::ProductSort;
    use rust_decimal_macros::dec;

    fn seeded() -> FakeShop {
        let shop = FakeShop::default();
        let electronics = shop.add_category("Electronics");
        let clothing = shop.add_category("Clothing");
        shop.add_product("Laptop Pro 15", "ELEC-LAP-001", dec!(1299.99), 50, electronics);
        shop.add_product("Wireless Mouse", "ELEC-MOU-001", dec!(29.99), 200, electronics);
        shop.add_product("Cotton T-Shirt", "CLO-TSH-001", dec!(19.99), 150, clothing);
        shop
    }

    #[tokio::test]
    async fn filters_and_sorts() {
        let shop = seeded();
        let uc = ListProducts { repo: &shop };

        let mut query = ProductQuery::default();
        query.search = Some("MOUSE".into());
        let page = uc.execute(&query).await.unwrap();
        assert_eq!(page.total_count, 1);
        assert_eq!(page.items[0].sku, "ELEC-MOU-001");

        let mut query = ProductQuery::default();
        query.max_price = Some(dec!(30));
        query.sort = ProductSort::Price;
        query.descending = true;
        let page = uc.execute(&query).await.unwrap();
        let names: Vec<_> = page.items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Wireless Mouse", "Cotton T-Shirt"]);
    }

    #[tokio::test]
    async fn pages_report_totals() {
        let shop = seeded();
        let uc = ListProducts { repo: &shop };
        let mut query = ProductQuery::default();
        query.page = 2;
        query.page_size = 2;
        let page = uc.execute(&query).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total_count, 3);
        assert_eq!(page.total_pages, 2);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty() {
        let shop = seeded();
        let uc = ListProducts { repo: &shop };
        let query = ProductQuery::new(None, None, None, None, Some(i64::MAX), Some(100), None, None);
        let page = uc.execute(&query).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 3);
    }
}
