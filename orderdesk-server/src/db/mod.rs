//! Storage layer - unit-of-work providers
//!
//! # Design Principles
//!
//! - One unit of work per request, never shared between requests
//! - Dropping an uncommitted unit of work rolls it back
//! - Lists are ordered by id (creation order)
//! - The user reference on orders is enforced by storage as well as by the
//!   service-level existence check

pub mod memory;
pub mod postgres;
pub mod schema;
pub mod session;

pub use memory::MemorySessionProvider;
pub use postgres::{PgSessionProvider, PoolSettings, DEFAULT_ACQUIRE_TIMEOUT, DEFAULT_MAX_CONNECTIONS};
pub use session::{DbError, SessionProvider, UnitOfWork};
