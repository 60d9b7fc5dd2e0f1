use uuid::Uuid;

use crate::application::ports::address_repository::AddressRepository;
use crate::domain::addresses::address::Address;

pub struct ListAddresses<'a, R: AddressRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: AddressRepository + ?Sized> ListAddresses<'a, R> {
    pub async fn execute(&self, user_id: Uuid) -> anyhow::Result<Vec<Address>> {
        self.repo.list_for_user(user_id).await
    }
}
