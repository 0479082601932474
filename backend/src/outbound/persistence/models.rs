//! Internal Diesel row structs for database operations.
//!
//! These types never leave the persistence layer; repositories convert them
//! into validated domain entities.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{games, trade_offers, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub street_address: String,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub street_address: &'a str,
}

/// Changeset for profile edits; `None` columns are left untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserProfileChangeset<'a> {
    pub username: Option<&'a str>,
    pub street_address: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the games table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = games)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GameRow {
    pub id: i64,
    pub owner_user_id: i64,
    pub title: String,
    pub publisher: String,
    pub description: String,
    pub year: i32,
    pub condition: String,
}

/// Insertable struct for listing new games.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = games)]
pub(crate) struct NewGameRow<'a> {
    pub owner_user_id: i64,
    pub title: &'a str,
    pub publisher: &'a str,
    pub description: &'a str,
    pub year: i32,
    pub condition: &'a str,
}

/// Changeset for descriptive edits; `None` columns are left untouched.
///
/// Ownership is deliberately absent: only settlement moves games.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = games)]
pub(crate) struct GameDetailsChangeset<'a> {
    pub title: Option<&'a str>,
    pub publisher: Option<&'a str>,
    pub description: Option<&'a str>,
    pub year: Option<i32>,
    pub condition: Option<&'a str>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Row struct for reading from the trade_offers table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = trade_offers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TradeOfferRow {
    pub id: i64,
    pub requester_id: i64,
    pub owner_user_id: i64,
    pub game_requested_id: i64,
    pub game_offered_id: i64,
    pub current_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for admitted offers; status defaults to `pending`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = trade_offers)]
pub(crate) struct NewTradeOfferRow {
    pub requester_id: i64,
    pub owner_user_id: i64,
    pub game_requested_id: i64,
    pub game_offered_id: i64,
}
