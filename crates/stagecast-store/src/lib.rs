//! Stagecast Content Store
//!
//! This crate provides the content store abstraction and an in-memory
//! implementation. The store is the only writer of a record's `status`:
//! every change goes through [`ContentStore::transition`], which applies the
//! transition table atomically per record id.
//!
//! # Transition table
//!
//! | current  | action                   | next                              |
//! |----------|--------------------------|-----------------------------------|
//! | staged   | approve                  | approved (sets `approved_at`)     |
//! | staged   | reject                   | rejected                          |
//! | approved | record_publish_outcome   | posted if any success, else approved |
//! | posted   | record_publish_outcome   | posted                            |
//!
//! Every other pair fails with `InvalidTransition` and leaves the record unchanged.

pub mod memory;
pub mod traits;
pub(crate) mod transition;

// Re-export commonly used types
pub use memory::InMemoryContentStore;
pub use traits::ContentStore;
