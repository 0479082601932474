//! User account service implementing the [`UserAccounts`] driving port.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    PatchProfileRequest, RegisterUserRequest, ReplaceProfileRequest, UserAccounts,
    UserRepository, UserRepositoryError,
};
use crate::domain::{
    Error, NewUser, User, UserId, UserProfile, UserProfilePatch, UserValidationError,
};

fn map_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::InUse { user_id } => Error::conflict(format!(
            "user {user_id} still owns games or is party to trade offers"
        ))
        .with_details(json!({ "code": "user_in_use", "userId": user_id })),
    }
}

fn map_validation_error(error: &UserValidationError) -> Error {
    let details = match error.field() {
        Some(field) => json!({ "code": "invalid_field", "field": field }),
        None => json!({ "code": "empty_patch" }),
    };
    Error::invalid_request(error.to_string()).with_details(details)
}

fn user_not_found(id: UserId) -> Error {
    Error::not_found(format!("user {id} not found"))
        .with_details(json!({ "code": "user_not_found", "userId": id.get() }))
}

fn found_or_missing(found: bool, id: UserId) -> Result<(), Error> {
    if found { Ok(()) } else { Err(user_not_found(id)) }
}

/// User service backed by a [`UserRepository`].
#[derive(Clone)]
pub struct UserAccountService<R> {
    users: Arc<R>,
}

impl<R> UserAccountService<R> {
    /// Create a service over the user repository.
    pub fn new(users: Arc<R>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<R> UserAccounts for UserAccountService<R>
where
    R: UserRepository,
{
    async fn register(&self, request: RegisterUserRequest) -> Result<User, Error> {
        let new_user = NewUser::try_from(request).map_err(|err| map_validation_error(&err))?;

        let user = self
            .users
            .insert(&new_user)
            .await
            .map_err(map_repository_error)?;
        info!(user_id = %user.id(), "user registered");
        Ok(user)
    }

    async fn get_user(&self, id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| user_not_found(id))
    }

    async fn replace_profile(
        &self,
        id: UserId,
        request: ReplaceProfileRequest,
    ) -> Result<(), Error> {
        let profile = UserProfile::try_from(request).map_err(|err| map_validation_error(&err))?;

        let found = self
            .users
            .update_profile(id, &profile)
            .await
            .map_err(map_repository_error)?;
        found_or_missing(found, id)
    }

    async fn patch_profile(&self, id: UserId, request: PatchProfileRequest) -> Result<(), Error> {
        let patch =
            UserProfilePatch::try_from(request).map_err(|err| map_validation_error(&err))?;

        let found = self
            .users
            .patch_profile(id, &patch)
            .await
            .map_err(map_repository_error)?;
        found_or_missing(found, id)
    }

    async fn delete_user(&self, id: UserId) -> Result<(), Error> {
        let found = self
            .users
            .delete(id)
            .await
            .map_err(map_repository_error)?;
        found_or_missing(found, id)?;
        info!(user_id = %id, "user deleted");
        Ok(())
    }
}
