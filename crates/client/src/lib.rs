//! Headless client for the staff task & points API.
//!
//! Everything a frontend needs except rendering: an authenticated HTTP
//! client with the cross-cutting 401 contract, an explicit session context,
//! the monthly distribution view state machine, and a cancellable poller for
//! notification badges.
//!
//! - [`session`] -- bearer token + user profile, created at login and
//!   destroyed at logout or the first 401.
//! - [`http`] -- [`http::ApiClient`], a reqwest wrapper attaching the bearer
//!   header and mapping error responses.
//! - [`monthly`] -- the admin monthly screen's load/compute/save logic.
//! - [`poll`] -- interval polling with an explicit disposer.

pub mod error;
pub mod http;
pub mod monthly;
pub mod poll;
pub mod session;
pub mod types;

pub use error::ClientError;
pub use http::ApiClient;
pub use monthly::{LoadState, MonthlyView};
pub use session::{Session, SessionStore};
