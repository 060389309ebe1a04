//! Business logic services

pub mod post_store;
pub mod sequence;

pub use post_store::PostStore;
pub use sequence::SequenceAllocator;
