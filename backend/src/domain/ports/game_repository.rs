//! Port for the game catalogue and the ownership lookups trading relies on.
//!
//! Ownership is only ever changed by trade settlement inside
//! [`super::TradeOfferRepository::accept`]; this port exposes no setter.

use async_trait::async_trait;

use crate::domain::{Game, GameDetails, GameDetailsPatch, GameId, NewGame, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by game repository adapters.
    pub enum GameRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "game repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "game repository query failed: {message}",
        /// The owner named on a new game does not exist.
        OwnerNotFound { owner_id: i64 } =>
            "owner user {owner_id} not found",
        /// The game is referenced by trade offers.
        InUse { game_id: i64 } =>
            "game {game_id} is still referenced by trade offers",
    }
}

/// Port for storing games and reading their current owners.
///
/// Mutating methods return `Ok(false)` when the game does not exist.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameRepository: Send + Sync {
    /// Persist a new game and return it with its assigned identifier.
    async fn insert(&self, game: &NewGame) -> Result<Game, GameRepositoryError>;

    /// Find a game by id.
    async fn find_by_id(&self, id: GameId) -> Result<Option<Game>, GameRepositoryError>;

    /// Games owned by anyone other than `owner`, ordered by id.
    async fn list_not_owned_by(&self, owner: UserId) -> Result<Vec<Game>, GameRepositoryError>;

    /// Replace the descriptive attributes.
    async fn update_details(
        &self,
        id: GameId,
        details: &GameDetails,
    ) -> Result<bool, GameRepositoryError>;

    /// Apply a partial update to the descriptive attributes.
    async fn patch_details(
        &self,
        id: GameId,
        patch: &GameDetailsPatch,
    ) -> Result<bool, GameRepositoryError>;

    /// Delete a game that no offer references.
    async fn delete(&self, id: GameId) -> Result<bool, GameRepositoryError>;
}
