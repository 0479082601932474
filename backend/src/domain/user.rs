//! Registered users and their credentials.
//!
//! Plaintext passwords only exist inside [`Password`], which wipes its buffer
//! on drop. Stores persist the salted digest produced by
//! [`PasswordHash::derive`] and never hand it back to clients.

use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::UserId;
use super::text::{TextFieldError, bounded};

/// Maximum username length in characters.
pub const USERNAME_MAX: usize = 64;
/// Maximum email length in characters.
pub const EMAIL_MAX: usize = 254;
/// Maximum street address length in characters.
pub const STREET_ADDRESS_MAX: usize = 256;

const SALT_LEN: usize = 16;
const HASH_SCHEME: &str = "sha256";

/// Validation errors for user records.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// A text field failed its bounds.
    #[error(transparent)]
    Field(#[from] TextFieldError),
    /// A partial update supplied no fields.
    #[error("at least one of username or streetAddress must be supplied")]
    EmptyPatch,
}

impl UserValidationError {
    /// Wire name of the offending field, when one field is at fault.
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Field(err) => Some(err.field()),
            Self::EmptyPatch => None,
        }
    }
}

/// Display name chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    /// Validate a username.
    pub fn new(value: impl Into<String>) -> Result<Self, UserValidationError> {
        Ok(Self(bounded("username", value, USERNAME_MAX)?))
    }

    /// Borrow the username text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Contact email address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate an email address. Only the presence of `@` is checked.
    pub fn new(value: impl Into<String>) -> Result<Self, UserValidationError> {
        let value = bounded("email", value, EMAIL_MAX)?;
        if !value.contains('@') {
            return Err(TextFieldError::Malformed {
                field: "email",
                reason: "must contain '@'",
            }
            .into());
        }
        Ok(Self(value))
    }

    /// Borrow the address text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Postal address used to ship traded games.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreetAddress(String);

impl StreetAddress {
    /// Validate a street address.
    pub fn new(value: impl Into<String>) -> Result<Self, UserValidationError> {
        Ok(Self(bounded("streetAddress", value, STREET_ADDRESS_MAX)?))
    }

    /// Borrow the address text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Plaintext password held only long enough to derive its digest.
pub struct Password(Zeroizing<String>);

impl Password {
    /// Wrap a plaintext password, rejecting blank values.
    pub fn new(value: String) -> Result<Self, UserValidationError> {
        let value = Zeroizing::new(value);
        if value.trim().is_empty() {
            return Err(TextFieldError::Blank { field: "password" }.into());
        }
        Ok(Self(value))
    }

    fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Salted SHA-256 digest of a password in `sha256$<salt>$<digest>` form.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Derive a digest with a fresh random salt.
    #[must_use]
    pub fn derive(password: &Password) -> Self {
        let mut salt = [0_u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        Self::with_salt(password, &salt)
    }

    fn with_salt(password: &Password, salt: &[u8]) -> Self {
        let digest = Sha256::new()
            .chain_update(salt)
            .chain_update(password.expose().as_bytes())
            .finalize();
        Self(format!(
            "{HASH_SCHEME}${}${}",
            hex::encode(salt),
            hex::encode(digest)
        ))
    }

    /// Encoded digest for storage.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check a candidate password against this digest.
    #[cfg(test)]
    #[must_use]
    pub(crate) fn verify(&self, candidate: &Password) -> bool {
        let mut parts = self.0.splitn(3, '$');
        let (Some(HASH_SCHEME), Some(salt), Some(_)) = (parts.next(), parts.next(), parts.next())
        else {
            return false;
        };
        match hex::decode(salt) {
            Ok(salt) => Self::with_salt(candidate, &salt) == *self,
            Err(_) => false,
        }
    }
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Registered user as exposed to clients. Credentials are never included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    username: Username,
    email: EmailAddress,
    street_address: StreetAddress,
}

impl User {
    /// Assemble a user from validated parts.
    #[must_use]
    pub fn new(
        id: UserId,
        username: Username,
        email: EmailAddress,
        street_address: StreetAddress,
    ) -> Self {
        Self {
            id,
            username,
            email,
            street_address,
        }
    }

    /// Stable identifier.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Contact email.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Shipping address.
    #[must_use]
    pub fn street_address(&self) -> &StreetAddress {
        &self.street_address
    }

    /// Apply a full profile replacement.
    #[must_use]
    pub fn with_profile(mut self, profile: &UserProfile) -> Self {
        self.username = profile.username.clone();
        self.street_address = profile.street_address.clone();
        self
    }

    /// Apply a partial profile update.
    #[must_use]
    pub fn with_patch(mut self, patch: &UserProfilePatch) -> Self {
        if let Some(username) = patch.username() {
            self.username = username.clone();
        }
        if let Some(address) = patch.street_address() {
            self.street_address = address.clone();
        }
        self
    }
}

/// Registration payload ready for insertion.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name.
    pub username: Username,
    /// Contact email.
    pub email: EmailAddress,
    /// Shipping address.
    pub street_address: StreetAddress,
    /// Salted password digest.
    pub password_hash: PasswordHash,
}

/// Full replacement of the editable profile fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    /// New display name.
    pub username: Username,
    /// New shipping address.
    pub street_address: StreetAddress,
}

/// Partial update of the editable profile fields; at least one is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfilePatch {
    username: Option<Username>,
    street_address: Option<StreetAddress>,
}

impl UserProfilePatch {
    /// Build a patch, rejecting one that changes nothing.
    pub fn new(
        username: Option<Username>,
        street_address: Option<StreetAddress>,
    ) -> Result<Self, UserValidationError> {
        if username.is_none() && street_address.is_none() {
            return Err(UserValidationError::EmptyPatch);
        }
        Ok(Self {
            username,
            street_address,
        })
    }

    /// Replacement username, if any.
    #[must_use]
    pub fn username(&self) -> Option<&Username> {
        self.username.as_ref()
    }

    /// Replacement street address, if any.
    #[must_use]
    pub fn street_address(&self) -> Option<&StreetAddress> {
        self.street_address.as_ref()
    }
}
