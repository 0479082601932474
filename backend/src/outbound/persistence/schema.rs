//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly.

diesel::table! {
    /// Registered users. `password_hash` is never read back by the API.
    users (id) {
        /// Primary key, assigned by a sequence.
        id -> Int8,
        /// Display name (max 64 characters).
        username -> Varchar,
        /// Contact email (max 254 characters).
        email -> Varchar,
        /// Salted password digest.
        password_hash -> Text,
        /// Shipping address (max 256 characters).
        street_address -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Games in the catalogue with their current owner.
    games (id) {
        /// Primary key, assigned by a sequence.
        id -> Int8,
        /// Current owner; changed only by trade settlement.
        owner_user_id -> Int8,
        /// Title (max 256 characters).
        title -> Varchar,
        /// Publisher (max 256 characters).
        publisher -> Varchar,
        /// Free-form description.
        description -> Text,
        /// Release year, always positive.
        year -> Int4,
        /// Physical condition (max 64 characters).
        condition -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Proposals to swap one game for another.
    trade_offers (id) {
        /// Primary key, assigned by a sequence.
        id -> Int8,
        /// User proposing the trade.
        requester_id -> Int8,
        /// Owner of the requested game when the offer was made.
        owner_user_id -> Int8,
        /// Game the requester wants.
        game_requested_id -> Int8,
        /// Game the requester gives up.
        game_offered_id -> Int8,
        /// One of `pending`, `accepted`, `rejected`, `cancelled`.
        current_status -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Timestamp of the last status change.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(games -> users (owner_user_id));

diesel::allow_tables_to_appear_in_same_query!(users, games, trade_offers);
