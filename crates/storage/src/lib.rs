//! Storage abstractions for depth frame services.
//!
//! Provides:
//! - The [`RowStore`] trait the frame pipeline reads through
//! - [`SqliteRowStore`], the persistent store written by ingestion
//! - [`MemoryRowStore`], an in-process store for tests and tooling

pub mod memory;
pub mod metadata;
pub mod row_store;
pub mod sqlite;

pub use memory::MemoryRowStore;
pub use metadata::{build_metadata, keys};
pub use row_store::RowStore;
pub use sqlite::SqliteRowStore;
