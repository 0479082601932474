//! Positive integer identifiers for users, games and trade offers.
//!
//! Identifiers are assigned by the store and are always strictly positive.
//! Raw integers from requests become typed identifiers only through
//! [`UserId::new`] and friends, which reject zero and negative values.

use serde::{Deserialize, Serialize};

/// Validation failure raised when a raw integer is not a usable identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{kind} must be a positive integer, got {value}")]
pub struct IdValidationError {
    kind: &'static str,
    value: i64,
}

impl IdValidationError {
    /// Human-readable identifier kind, for example `"game id"`.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Rejected raw value.
    #[must_use]
    pub fn value(&self) -> i64 {
        self.value
    }
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(try_from = "i64", into = "i64")]
        pub struct $name(i64);

        impl $name {
            /// Validate and wrap a raw identifier.
            pub fn new(value: i64) -> Result<Self, IdValidationError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(IdValidationError { kind: $kind, value })
                }
            }

            /// Raw integer value.
            #[must_use]
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl TryFrom<i64> for $name {
            type Error = IdValidationError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id! {
    /// Identifier of a registered user.
    UserId, "user id"
}

define_id! {
    /// Identifier of a game in the catalogue.
    GameId, "game id"
}

define_id! {
    /// Identifier of a trade offer.
    OfferId, "offer id"
}
