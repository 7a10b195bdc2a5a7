//! # portal-core
//!
//! Core crate for Lecture Portal. Contains configuration schemas, typed
//! identifiers, query helper types, the storage provider trait, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other portal crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
