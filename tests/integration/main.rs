//! End-to-end tests driving the HTTP API against in-memory stores with a
//! live worker.

mod helpers;
mod maintenance;
mod tasks;
mod users;
