//! Storage adapters.

pub mod filesystem;

pub use filesystem::LocalImageStore;
