//! Domain types and pure business logic shared by the server and client crates.
//!
//! - [`distribution`] -- monthly profit-to-point conversion (the settings
//!   calculator behind the admin monthly screen).
//! - [`error`] -- the [`error::CoreError`] enum every layer maps into its own
//!   error type.
//! - [`roles`] / [`status`] -- well-known string constants stored in the
//!   database and carried in JWT claims.

pub mod distribution;
pub mod error;
pub mod roles;
pub mod status;
pub mod types;
