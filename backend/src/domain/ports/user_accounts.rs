//! Driving port for user registration and profile maintenance.

use async_trait::async_trait;

use crate::domain::{
    EmailAddress, Error, NewUser, Password, PasswordHash, StreetAddress, User, UserId,
    UserProfile, UserProfilePatch, UserValidationError, Username,
};

/// Registration input as submitted by a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterUserRequest {
    /// Display name.
    pub username: String,
    /// Plaintext password; hashed before it reaches a store.
    pub password: String,
    /// Contact email.
    pub email: String,
    /// Shipping address.
    pub street_address: String,
}

/// Full replacement of the editable profile fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceProfileRequest {
    /// New display name.
    pub username: String,
    /// New shipping address.
    pub street_address: String,
}

/// Partial profile update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchProfileRequest {
    /// New display name.
    pub username: Option<String>,
    /// New shipping address.
    pub street_address: Option<String>,
}

impl TryFrom<RegisterUserRequest> for NewUser {
    type Error = UserValidationError;

    /// Validates every field and hashes the password.
    fn try_from(value: RegisterUserRequest) -> Result<Self, Self::Error> {
        let password = Password::new(value.password)?;
        Ok(Self {
            username: Username::new(value.username)?,
            email: EmailAddress::new(value.email)?,
            street_address: StreetAddress::new(value.street_address)?,
            password_hash: PasswordHash::derive(&password),
        })
    }
}

impl TryFrom<ReplaceProfileRequest> for UserProfile {
    type Error = UserValidationError;

    fn try_from(value: ReplaceProfileRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            username: Username::new(value.username)?,
            street_address: StreetAddress::new(value.street_address)?,
        })
    }
}

impl TryFrom<PatchProfileRequest> for UserProfilePatch {
    type Error = UserValidationError;

    fn try_from(value: PatchProfileRequest) -> Result<Self, Self::Error> {
        Self::new(
            value.username.map(Username::new).transpose()?,
            value.street_address.map(StreetAddress::new).transpose()?,
        )
    }
}

/// Domain use-case port for user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccounts: Send + Sync {
    /// Register a user.
    async fn register(&self, request: RegisterUserRequest) -> Result<User, Error>;

    /// Fetch a user.
    async fn get_user(&self, id: UserId) -> Result<User, Error>;

    /// Replace a user's profile.
    async fn replace_profile(&self, id: UserId, request: ReplaceProfileRequest)
    -> Result<(), Error>;

    /// Partially update a user's profile.
    async fn patch_profile(&self, id: UserId, request: PatchProfileRequest) -> Result<(), Error>;

    /// Delete a user that owns no games and is party to no offers.
    async fn delete_user(&self, id: UserId) -> Result<(), Error>;
}
