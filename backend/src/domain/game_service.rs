//! Game catalogue service implementing the [`GameCatalogue`] driving port.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{GameCatalogue, GameRepository, GameRepositoryError, PatchGameRequest};
use crate::domain::{
    Error, Game, GameDetails, GameDetailsDraft, GameDetailsPatch, GameId, GameValidationError,
    NewGame, UserId,
};

fn map_repository_error(error: GameRepositoryError) -> Error {
    match error {
        GameRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("game repository unavailable: {message}"))
        }
        GameRepositoryError::Query { message } => {
            Error::internal(format!("game repository error: {message}"))
        }
        GameRepositoryError::OwnerNotFound { owner_id } => {
            Error::not_found(format!("user {owner_id} not found"))
                .with_details(json!({ "code": "user_not_found", "userId": owner_id }))
        }
        GameRepositoryError::InUse { game_id } => {
            Error::conflict(format!("game {game_id} is referenced by trade offers"))
                .with_details(json!({ "code": "game_in_use", "gameId": game_id }))
        }
    }
}

fn map_validation_error(error: &GameValidationError) -> Error {
    let details = match error.field() {
        Some(field) => json!({ "code": "invalid_field", "field": field }),
        None => json!({ "code": "empty_patch" }),
    };
    Error::invalid_request(error.to_string()).with_details(details)
}

fn game_not_found(id: GameId) -> Error {
    Error::not_found(format!("game {id} not found"))
        .with_details(json!({ "code": "game_not_found", "gameId": id.get() }))
}

fn found_or_missing(found: bool, id: GameId) -> Result<(), Error> {
    if found { Ok(()) } else { Err(game_not_found(id)) }
}

/// Game catalogue service backed by a [`GameRepository`].
#[derive(Clone)]
pub struct GameCatalogueService<R> {
    games: Arc<R>,
}

impl<R> GameCatalogueService<R> {
    /// Create a service over the game repository.
    pub fn new(games: Arc<R>) -> Self {
        Self { games }
    }
}

#[async_trait]
impl<R> GameCatalogue for GameCatalogueService<R>
where
    R: GameRepository,
{
    async fn list_game(&self, owner: UserId, details: GameDetailsDraft) -> Result<Game, Error> {
        let details = GameDetails::new(details).map_err(|err| map_validation_error(&err))?;
        let game = self
            .games
            .insert(&NewGame { owner, details })
            .await
            .map_err(map_repository_error)?;
        info!(game_id = %game.id(), owner = %owner, "game listed");
        Ok(game)
    }

    async fn get_game(&self, id: GameId) -> Result<Game, Error> {
        self.games
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| game_not_found(id))
    }

    async fn browse(&self, viewer: UserId) -> Result<Vec<Game>, Error> {
        self.games
            .list_not_owned_by(viewer)
            .await
            .map_err(map_repository_error)
    }

    async fn replace_details(&self, id: GameId, details: GameDetailsDraft) -> Result<(), Error> {
        let details = GameDetails::new(details).map_err(|err| map_validation_error(&err))?;
        let found = self
            .games
            .update_details(id, &details)
            .await
            .map_err(map_repository_error)?;
        found_or_missing(found, id)
    }

    async fn patch_details(&self, id: GameId, request: PatchGameRequest) -> Result<(), Error> {
        let patch =
            GameDetailsPatch::try_from(request).map_err(|err| map_validation_error(&err))?;
        let found = self
            .games
            .patch_details(id, &patch)
            .await
            .map_err(map_repository_error)?;
        found_or_missing(found, id)
    }

    async fn delete_game(&self, id: GameId) -> Result<(), Error> {
        let found = self.games.delete(id).await.map_err(map_repository_error)?;
        found_or_missing(found, id)?;
        info!(game_id = %id, "game removed");
        Ok(())
    }
}
