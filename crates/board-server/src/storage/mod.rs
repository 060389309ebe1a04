//! Storage layer
//!
//! Uses SQLite (embedded) for durable posts.
//! Uses DashMap (in-memory) for throwaway boards and tests.

pub mod db;
pub mod memory;

pub use db::Database;
pub use memory::MemoryStore;
