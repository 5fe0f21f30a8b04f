//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL repositories using Diesel ORM
//! - **memory**: mutex-guarded repositories for runs without a database
//! - **security**: Argon2id password hashing
//! - **images**: filesystem listing image storage
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod images;
pub mod memory;
pub mod persistence;
pub mod security;
