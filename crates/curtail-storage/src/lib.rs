//! In-memory implementation of the durable mapping store.
//!
//! The production store sits behind the [`curtail_core::MappingStore`]
//! trait; this crate provides the concurrent in-process implementation used
//! by tests and single-node deployments.

pub mod memory;

pub use memory::InMemoryStore;
