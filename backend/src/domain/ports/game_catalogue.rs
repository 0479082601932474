//! Driving port for listing and maintaining games.

use async_trait::async_trait;

use crate::domain::{
    Error, Game, GameDetailsDraft, GameDetailsPatch, GameId, GameValidationError, UserId,
};

/// Partial update of a game; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchGameRequest {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New condition.
    pub condition: Option<String>,
}

impl TryFrom<PatchGameRequest> for GameDetailsPatch {
    type Error = GameValidationError;

    fn try_from(value: PatchGameRequest) -> Result<Self, Self::Error> {
        Self::new(value.title, value.description, value.condition)
    }
}

/// Domain use-case port for the game catalogue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameCatalogue: Send + Sync {
    /// List a new game owned by `owner`.
    async fn list_game(&self, owner: UserId, details: GameDetailsDraft) -> Result<Game, Error>;

    /// Fetch a game.
    async fn get_game(&self, id: GameId) -> Result<Game, Error>;

    /// Games available to `viewer`, that is, owned by someone else.
    async fn browse(&self, viewer: UserId) -> Result<Vec<Game>, Error>;

    /// Replace a game's descriptive attributes.
    async fn replace_details(&self, id: GameId, details: GameDetailsDraft) -> Result<(), Error>;

    /// Partially update a game's descriptive attributes.
    async fn patch_details(&self, id: GameId, request: PatchGameRequest) -> Result<(), Error>;

    /// Remove a game that no offer references.
    async fn delete_game(&self, id: GameId) -> Result<(), Error>;
}
