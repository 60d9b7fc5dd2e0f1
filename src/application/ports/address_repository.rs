use async_trait::async_trait;
use uuid::Uuid;

use crate::application::ports::DeleteOutcome;
use crate::domain::addresses::address::{Address, NewAddress};

#[async_trait]
pub trait AddressRepository: Send + Sync {
    /// Default address first, then newest.
    async fn list_for_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Address>>;
    async fn get_for_user(&self, id: Uuid, user_id: Uuid) -> anyhow::Result<Option<Address>>;
    /// The first address of a user always becomes the default one, and a new
    /// default clears the flag on the others.
    async fn create(&self, user_id: Uuid, address: &NewAddress) -> anyhow::Result<Address>;
    async fn delete_for_user(&self, id: Uuid, user_id: Uuid) -> anyhow::Result<DeleteOutcome>;
}
