//! Port for user persistence.

use async_trait::async_trait;

use crate::domain::{NewUser, User, UserId, UserProfile, UserProfilePatch};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "user repository query failed: {message}",
        /// The user still owns games or is party to offers.
        InUse { user_id: i64 } =>
            "user {user_id} is still referenced by games or trade offers",
    }
}

/// Port for storing and editing registered users.
///
/// Mutating methods return `Ok(false)` when the user does not exist.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user and return it with its assigned identifier.
    async fn insert(&self, user: &NewUser) -> Result<User, UserRepositoryError>;

    /// Find a user by id.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Replace the editable profile fields.
    async fn update_profile(
        &self,
        id: UserId,
        profile: &UserProfile,
    ) -> Result<bool, UserRepositoryError>;

    /// Apply a partial profile update.
    async fn patch_profile(
        &self,
        id: UserId,
        patch: &UserProfilePatch,
    ) -> Result<bool, UserRepositoryError>;

    /// Delete a user that nothing references.
    async fn delete(&self, id: UserId) -> Result<bool, UserRepositoryError>;
}
