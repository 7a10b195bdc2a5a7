//! # portal-entity
//!
//! Domain entity models for Lecture Portal. Every struct in this crate
//! represents a stored record or a domain value object. Stored records
//! additionally derive `sqlx::FromRow` and serialize with camelCase keys,
//! which is the shape the HTTP API and the terminal client exchange.

pub mod notification;
pub mod progress;
pub mod user;
pub mod video;
