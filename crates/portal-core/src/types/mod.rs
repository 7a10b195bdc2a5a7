//! Core type definitions used across the portal workspace.

pub mod id;
pub mod range;

pub use id::*;
pub use range::PrefixRange;
