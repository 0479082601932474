//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the repository ports backed by PostgreSQL via
//! `diesel-async` with `bb8` connection pooling.
//!
//! - **Thin adapters**: repositories translate between Diesel rows and domain
//!   types. Trade rules come from the domain; the acceptance transaction
//!   only supplies locking and atomicity around [`settle`].
//! - **Internal models**: row structs (`models.rs`) and the schema
//!   (`schema.rs`) never leave this module.
//! - **Typed errors**: database failures map onto the port error enums.
//!
//! # Example
//!
//! ```ignore
//! use gameswap::outbound::persistence::{DbPool, DieselTradeOfferRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/gameswap")).await?;
//! let offers = DieselTradeOfferRepository::new(pool);
//! ```
//!
//! [`settle`]: crate::domain::trade::settle

mod diesel_error_mapping;
mod diesel_game_repository;
mod diesel_trade_offer_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_game_repository::DieselGameRepository;
pub use diesel_trade_offer_repository::DieselTradeOfferRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
