use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Address {
    pub id: Uuid,
    pub user_id: Uuid,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub is_default: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub is_default: bool,
}

impl NewAddress {
    /// Trims every field and checks them against the column limits.
    /// Returns the offending field name on failure.
    pub fn normalized(self) -> Result<Self, String> {
        let street = self.street.trim().to_string();
        let city = self.city.trim().to_string();
        let state = self.state.trim().to_string();
        let zip_code = self.zip_code.trim().to_string();
        let country = self.country.trim().to_string();
        for (field, value, max) in [
            ("street", &street, 200),
            ("city", &city, 100),
            ("state", &state, 100),
            ("zipCode", &zip_code, 20),
            ("country", &country, 100),
        ] {
            if value.is_empty() || value.chars().count() > max {
                return Err(field.to_string());
            }
        }
        Ok(Self {
            street,
            city,
            state,
            zip_code,
            country,
            is_default: self.is_default,
        })
    }
}
