//! Database connectivity for the platform.
//!
//! One backend: PostgreSQL via SeaORM. The [`postgres`] module provides
//! configuration, connection management with pool options, migration
//! running, and a readiness health check.

pub mod postgres;

pub use postgres::{DatabaseConnection, PostgresConfig};
