//! Service layer
//!
//! Services hold the domain logic and talk to storage exclusively through
//! the repository traits, so they stay backend-agnostic and easy to test
//! against in-memory mocks.

pub mod account;
pub mod asset;
pub mod auth;
pub mod incident;

pub use account::AccountService;
pub use asset::AssetService;
pub use auth::{AuthService, RegisterAccount};
pub use incident::IncidentService;
