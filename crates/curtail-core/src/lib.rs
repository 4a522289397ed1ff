//! Core types and traits for the Curtail URL shortener.
//!
//! This crate provides the base-62 codec, the validated short code type,
//! the stored URL record, and the storage/cache traits shared by the
//! allocation and resolution services.

pub mod base62;
pub mod cache;
pub mod error;
pub mod record;
pub mod repository;
pub mod shortcode;

pub use cache::UrlCache;
pub use error::{CacheError, CodecError, StorageError};
pub use record::UrlRecord;
pub use repository::MappingStore;
pub use shortcode::ShortCode;
