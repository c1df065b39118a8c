//! # taskhub-entity
//!
//! Domain entity models for TaskHub. Every struct in this crate represents
//! a database table row or a domain value object. Persisted entities derive
//! `sqlx::FromRow`; their enums map onto PostgreSQL enum types.

pub mod job;
pub mod log;
pub mod task;
pub mod user;
