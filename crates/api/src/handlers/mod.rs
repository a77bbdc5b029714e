//! HTTP handlers, one module per resource.

pub mod auth;
pub mod monthly;
pub mod notifications;
pub mod points;
pub mod submissions;
pub mod tasks;
pub mod users;
