//! # jsondb
//!
//! A minimal record store that persists one collection of identifiable
//! records to a single flat JSON file.
//!
//! ## Core Concepts
//!
//! - **Records**: JSON objects carrying a unique `id` (integer or string)
//! - **Collection**: the ordered array of all records, pretty-printed as the
//!   entire content of the backing file
//! - **Read-modify-write**: every operation re-reads the file, transforms the
//!   collection in memory, and rewrites the whole file, so the file is the
//!   single source of truth across calls
//!
//! ## Example
//!
//! ```ignore
//! use jsondb::Store;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Book {
//!     id: u32,
//!     title: String,
//! }
//!
//! let store: Store<Book> = Store::open("books.json")?;
//!
//! store.add(Book { id: 1, title: "Dune".into() })?;
//!
//! let all = store.get_all()?;
//! ```

mod backing;
mod collection;
pub mod error;
pub mod store;
pub mod types;

// Re-exports
pub use error::{Result, StoreError};
pub use store::Store;
pub use types::{Patch, Query, RawRecord, RecordId};
