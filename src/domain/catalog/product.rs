use rust_decimal::Decimal;
use uuid::Uuid;

pub const PRODUCT_NAME_MAX: usize = 200;
pub const SKU_MAX: usize = 50;
pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;
/// Highest page whose offset still fits in an `i64`.
pub const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE;

#[derive(Debug, Clone)]
pub struct ProductImage {
    pub id: Uuid,
    pub url: String,
    pub alt_text: String,
    pub display_order: i32,
}

#[derive(Debug, Clone)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub description: String,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub category_id: Uuid,
    pub category_name: String,
    pub is_active: bool,
    pub images: Vec<ProductImage>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Fields shared by create and update.
#[derive(Debug, Clone)]
pub struct ProductFields {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub category_id: Uuid,
}

impl ProductFields {
    pub fn normalized(self) -> Result<Self, String> {
        let name = self.name.trim().to_string();
        if name.is_empty() || name.chars().count() > PRODUCT_NAME_MAX {
            return Err(format!(
                "name must be between 1 and {PRODUCT_NAME_MAX} characters"
            ));
        }
        if self.price.is_sign_negative() {
            return Err("price must not be negative".into());
        }
        if self.stock_quantity < 0 {
            return Err("stockQuantity must not be negative".into());
        }
        Ok(Self {
            name,
            description: self.description.trim().to_string(),
            price: self.price.round_dp(2),
            stock_quantity: self.stock_quantity,
            category_id: self.category_id,
        })
    }
}

pub fn normalize_sku(sku: &str) -> Result<String, String> {
    let sku = sku.trim().to_ascii_uppercase();
    if sku.is_empty() || sku.len() > SKU_MAX {
        return Err(format!("sku must be between 1 and {SKU_MAX} characters"));
    }
    Ok(sku)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductSort {
    Name,
    Price,
    CreatedAt,
}

impl ProductSort {
    /// Unknown keys fall back to sorting by name.
    pub fn from_key(key: Option<&str>) -> Self {
        match key.map(|k| k.trim().to_ascii_lowercase()).as_deref() {
            Some("price") => ProductSort::Price,
            Some("createdat") | Some("created_at") => ProductSort::CreatedAt,
            _ => ProductSort::Name,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            ProductSort::Name => "p.name",
            ProductSort::Price => "p.price",
            ProductSort::CreatedAt => "p.created_at",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub category_id: Option<Uuid>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub page: i64,
    pub page_size: i64,
    pub sort: ProductSort,
    pub descending: bool,
}

impl ProductQuery {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        search: Option<String>,
        category_id: Option<Uuid>,
        min_price: Option<Decimal>,
        max_price: Option<Decimal>,
        page: Option<i64>,
        page_size: Option<i64>,
        sort_by: Option<&str>,
        descending: Option<bool>,
    ) -> Self {
        Self {
            search: search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            category_id,
            min_price,
            max_price,
            page: page.unwrap_or(1).clamp(1, MAX_PAGE),
            page_size: page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
            sort: ProductSort::from_key(sort_by),
            descending: descending.unwrap_or(false),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self::new(None, None, None, None, None, None, None, None)
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_count: i64, page: i64, page_size: i64) -> Self {
        let total_pages = if page_size > 0 {
            (total_count + page_size - 1) / page_size
        } else {
            0
        };
        Self {
            items,
            total_count,
            page,
            page_size,
            total_pages,
        }
    }
}
