//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: in-process repositories sharing one mutex-guarded store
//!
//! Adapters are thin translators between domain types and storage
//! representations. Trade rules stay in the domain.

pub mod memory;
pub mod persistence;
