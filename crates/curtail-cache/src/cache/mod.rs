//! Cache implementations for the resolution path.

pub mod moka;

pub use self::moka::MokaUrlCache;
