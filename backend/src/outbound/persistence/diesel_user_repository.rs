//! PostgreSQL-backed [`UserRepository`].

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{
    EmailAddress, NewUser, StreetAddress, User, UserId, UserProfile, UserProfilePatch, Username,
};

use super::diesel_error_mapping::{is_foreign_key_violation, map_basic_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserProfileChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> UserRepositoryError {
    map_pool_error(error, UserRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    map_basic_diesel_error(
        error,
        UserRepositoryError::query,
        UserRepositoryError::connection,
    )
}

fn row_to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    let corrupt = |err: &dyn std::fmt::Display| {
        UserRepositoryError::query(format!("corrupt user row {}: {err}", row.id))
    };
    let id = UserId::new(row.id).map_err(|err| corrupt(&err))?;
    let username = Username::new(row.username.as_str()).map_err(|err| corrupt(&err))?;
    let email = EmailAddress::new(row.email.as_str()).map_err(|err| corrupt(&err))?;
    let address = StreetAddress::new(row.street_address.as_str()).map_err(|err| corrupt(&err))?;
    Ok(User::new(id, username, email, address))
}

impl DieselUserRepository {
    async fn apply_changeset(
        &self,
        id: UserId,
        changes: UserProfileChangeset<'_>,
    ) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = diesel::update(users::table.find(id.get()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(updated > 0)
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewUserRow {
            username: user.username.as_str(),
            email: user.email.as_str(),
            password_hash: user.password_hash.as_str(),
            street_address: user.street_address.as_str(),
        };

        let inserted = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        row_to_user(inserted)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn update_profile(
        &self,
        id: UserId,
        profile: &UserProfile,
    ) -> Result<bool, UserRepositoryError> {
        self.apply_changeset(
            id,
            UserProfileChangeset {
                username: Some(profile.username.as_str()),
                street_address: Some(profile.street_address.as_str()),
                updated_at: Utc::now(),
            },
        )
        .await
    }

    async fn patch_profile(
        &self,
        id: UserId,
        patch: &UserProfilePatch,
    ) -> Result<bool, UserRepositoryError> {
        self.apply_changeset(
            id,
            UserProfileChangeset {
                username: patch.username().map(Username::as_str),
                street_address: patch.street_address().map(StreetAddress::as_str),
                updated_at: Utc::now(),
            },
        )
        .await
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(users::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    UserRepositoryError::in_use(id.get())
                } else {
                    diesel_error(err)
                }
            })?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn corrupt_rows_are_query_errors() {
        let row = UserRow {
            id: 0,
            username: "ada".to_owned(),
            email: "ada@example.com".to_owned(),
            street_address: "1 Analytical Way".to_owned(),
        };
        let err = row_to_user(row).expect_err("zero id");
        assert!(matches!(err, UserRepositoryError::Query { .. }));
    }

    #[rstest]
    fn pool_checkout_failure_is_connection_error() {
        let err = pool_error(PoolError::checkout("timed out"));
        assert_eq!(err, UserRepositoryError::connection("timed out"));
    }
}
