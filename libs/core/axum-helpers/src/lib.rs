//! Cross-cutting HTTP plumbing shared by the API and the domain crates.
//!
//! - [`errors`]: the `{"detail": ...}` error body every failure renders as
//! - [`extractors`]: `ValidatedJson` for validated request bodies
//! - [`auth`]: JWT issue/verify and the resolved `CurrentUser`
//! - [`health`]: liveness endpoint
//! - [`server`]: router composition and graceful-shutdown serve

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod health;
pub mod server;
pub mod shutdown;

pub use auth::{Claims, CurrentUser, JwtAuth};
pub use errors::{detail_response, ErrorDetail};
pub use extractors::ValidatedJson;
