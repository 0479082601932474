//! Domain primitives, the trade engine and the services behind the ports.
//!
//! Purpose: keep business rules free of HTTP and SQL concerns. Entities
//! validate their invariants on construction; services orchestrate the
//! repositories declared in [`ports`] and report failures as [`Error`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - UserId / GameId / OfferId: positive integer identifiers.
//! - User, Game: catalogue records.
//! - trade: offer admission, status transitions and settlement.
//! - TradeOfferService, UserAccountService, GameCatalogueService: driving
//!   port implementations.

pub mod error;
pub mod game;
mod game_service;
pub mod ids;
pub mod ports;
mod text;
pub mod trace_id;
pub mod trade;
mod trade_offer_service;
pub mod user;
mod user_service;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::game::{
    Game, GameDetails, GameDetailsDraft, GameDetailsPatch, GameOwnership, GameValidationError,
    NewGame,
};
pub use self::game_service::GameCatalogueService;
pub use self::ids::{GameId, IdValidationError, OfferId, UserId};
pub use self::text::TextFieldError;
pub use self::trace_id::TraceId;
pub use self::trade_offer_service::TradeOfferService;
pub use self::user::{
    EmailAddress, NewUser, Password, PasswordHash, StreetAddress, User, UserProfile,
    UserProfilePatch, UserValidationError, Username,
};
pub use self::user_service::UserAccountService;

/// HTTP header name used to propagate trace identifiers.
pub const TRACE_ID_HEADER: &str = "trace-id";
