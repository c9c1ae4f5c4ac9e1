//! Durable local storage for reelmark.
//!
//! Uses `rusqlite` (bundled `SQLite`) to keep small JSON documents, such as
//! the watch list, in a single key/value table.

mod connection;
/// Key/value operations.
pub mod kv;
mod migrations;

pub use connection::open_db;
pub use kv::{load_value, save_value};
