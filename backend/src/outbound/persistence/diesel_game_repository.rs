//! PostgreSQL-backed [`GameRepository`].

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{GameRepository, GameRepositoryError};
use crate::domain::{
    Game, GameDetails, GameDetailsDraft, GameDetailsPatch, GameId, NewGame, UserId,
};

use super::diesel_error_mapping::{is_foreign_key_violation, map_basic_diesel_error, map_pool_error};
use super::models::{GameDetailsChangeset, GameRow, NewGameRow};
use super::pool::{DbPool, PoolError};
use super::schema::games;

/// Diesel-backed implementation of the game repository port.
#[derive(Clone)]
pub struct DieselGameRepository {
    pool: DbPool,
}

impl DieselGameRepository {
    /// Create a repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn apply_changeset(
        &self,
        id: GameId,
        changes: GameDetailsChangeset<'_>,
    ) -> Result<bool, GameRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = diesel::update(games::table.find(id.get()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(updated > 0)
    }
}

fn pool_error(error: PoolError) -> GameRepositoryError {
    map_pool_error(error, GameRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> GameRepositoryError {
    map_basic_diesel_error(
        error,
        GameRepositoryError::query,
        GameRepositoryError::connection,
    )
}

pub(super) fn row_to_game(row: GameRow) -> Result<Game, GameRepositoryError> {
    let GameRow {
        id,
        owner_user_id,
        title,
        publisher,
        description,
        year,
        condition,
    } = row;
    let corrupt = |detail: String| GameRepositoryError::query(format!("corrupt game row {id}: {detail}"));

    let game_id = GameId::new(id).map_err(|err| corrupt(err.to_string()))?;
    let owner = UserId::new(owner_user_id).map_err(|err| corrupt(err.to_string()))?;
    let details = GameDetails::new(GameDetailsDraft {
        title,
        publisher,
        description,
        year,
        condition,
    })
    .map_err(|err| corrupt(err.to_string()))?;
    Ok(Game::new(game_id, owner, details))
}

#[async_trait]
impl GameRepository for DieselGameRepository {
    async fn insert(&self, game: &NewGame) -> Result<Game, GameRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let details = &game.details;
        let row = NewGameRow {
            owner_user_id: game.owner.get(),
            title: details.title(),
            publisher: details.publisher(),
            description: details.description(),
            year: details.year(),
            condition: details.condition(),
        };

        let inserted = diesel::insert_into(games::table)
            .values(&row)
            .returning(GameRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    GameRepositoryError::owner_not_found(game.owner.get())
                } else {
                    diesel_error(err)
                }
            })?;
        row_to_game(inserted)
    }

    async fn find_by_id(&self, id: GameId) -> Result<Option<Game>, GameRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = games::table
            .find(id.get())
            .select(GameRow::as_select())
            .first::<GameRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_game).transpose()
    }

    async fn list_not_owned_by(&self, owner: UserId) -> Result<Vec<Game>, GameRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows = games::table
            .filter(games::owner_user_id.ne(owner.get()))
            .order(games::id.asc())
            .select(GameRow::as_select())
            .load::<GameRow>(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(row_to_game).collect()
    }

    async fn update_details(
        &self,
        id: GameId,
        details: &GameDetails,
    ) -> Result<bool, GameRepositoryError> {
        self.apply_changeset(
            id,
            GameDetailsChangeset {
                title: Some(details.title()),
                publisher: Some(details.publisher()),
                description: Some(details.description()),
                year: Some(details.year()),
                condition: Some(details.condition()),
                updated_at: Some(Utc::now()),
            },
        )
        .await
    }

    async fn patch_details(
        &self,
        id: GameId,
        patch: &GameDetailsPatch,
    ) -> Result<bool, GameRepositoryError> {
        self.apply_changeset(
            id,
            GameDetailsChangeset {
                title: patch.title(),
                description: patch.description(),
                condition: patch.condition(),
                updated_at: Some(Utc::now()),
                ..GameDetailsChangeset::default()
            },
        )
        .await
    }

    async fn delete(&self, id: GameId) -> Result<bool, GameRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(games::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    GameRepositoryError::in_use(id.get())
                } else {
                    diesel_error(err)
                }
            })?;
        Ok(deleted > 0)
    }
}
