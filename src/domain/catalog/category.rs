use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub parent_category_id: Option<Uuid>,
    pub parent_category_name: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

pub const CATEGORY_NAME_MAX: usize = 100;
