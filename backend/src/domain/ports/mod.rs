//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) describe what the domain needs from storage
//! and expose typed errors. Driving ports (`TradeOfferCommand`,
//! `TradeOfferQuery`, `UserAccounts`, `GameCatalogue`) are what inbound
//! adapters call and return the transport-agnostic [`crate::domain::Error`].

mod macros;
pub(crate) use macros::define_port_error;

mod game_catalogue;
mod game_repository;
mod trade_offer_command;
mod trade_offer_query;
mod trade_offer_repository;
mod user_accounts;
mod user_repository;

#[cfg(test)]
pub use game_catalogue::MockGameCatalogue;
pub use game_catalogue::{GameCatalogue, PatchGameRequest};
#[cfg(test)]
pub use game_repository::MockGameRepository;
pub use game_repository::{GameRepository, GameRepositoryError};
#[cfg(test)]
pub use trade_offer_command::MockTradeOfferCommand;
pub use trade_offer_command::{OfferResolution, RespondToOfferRequest, TradeOfferCommand};
#[cfg(test)]
pub use trade_offer_query::MockTradeOfferQuery;
pub use trade_offer_query::TradeOfferQuery;
#[cfg(test)]
pub use trade_offer_repository::MockTradeOfferRepository;
pub use trade_offer_repository::{TradeOfferRepository, TradeOfferRepositoryError};
#[cfg(test)]
pub use user_accounts::MockUserAccounts;
pub use user_accounts::{
    PatchProfileRequest, RegisterUserRequest, ReplaceProfileRequest, UserAccounts,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
