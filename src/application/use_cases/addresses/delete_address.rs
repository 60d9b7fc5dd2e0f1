use uuid::Uuid;

use crate::application::errors::AddressError;
use crate::application::ports::DeleteOutcome;
use crate::application::ports::address_repository::AddressRepository;

pub struct DeleteAddress<'a, R: AddressRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: AddressRepository + ?Sized> DeleteAddress<'a, R> {
    pub async fn execute(&self, user_id: Uuid, id: Uuid) -> Result<(), AddressError> {
        match self.repo.delete_for_user(id, user_id).await? {
            DeleteOutcome::Deleted => Ok(()),
            DeleteOutcome::NotFound => Err(AddressError::NotFound),
            DeleteOutcome::InUse => Err(AddressError::InUse),
        }
    }
}
