//! Request handlers, grouped by resource.

pub mod health;
pub mod job;
pub mod task;
pub mod user;
