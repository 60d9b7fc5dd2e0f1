use uuid::Uuid;

use crate::application::errors::AddressError;
use crate::application::ports::address_repository::AddressRepository;
use crate::domain::addresses::address::{Address, NewAddress};

pub struct CreateAddress<'a, R: AddressRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: AddressRepository + ?Sized> CreateAddress<'a, R> {
    pub async fn execute(&self, user_id: Uuid, input: NewAddress) -> Result<Address, AddressError> {
        let input = input.normalized().map_err(AddressError::Validation)?;
        Ok(self.repo.create(user_id, &input).await?)
    }
}
