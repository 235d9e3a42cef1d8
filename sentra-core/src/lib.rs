//! Core functionality for the Sentra incident-tracking backend
//!
//! This crate holds the domain model (accounts, incidents, assets), the
//! error taxonomy, the repository traits that storage backends implement,
//! and the services that carry the domain logic — most importantly the
//! authentication and account-protection state machine in
//! [`services::AuthService`].
//!
//! It is a dependency of the storage backends and of the `sentra` facade and
//! is not intended to be used directly by application code.

pub mod account;
pub mod asset;
pub mod error;
pub mod id;
pub mod incident;
pub mod repositories;
pub mod services;
pub mod token;
pub mod validation;

pub use account::{Account, AccountId, AccountStatus, LockoutPolicy, LockoutState, Role};
pub use asset::{Asset, AssetId, AssetStatus, AssetType};
pub use error::Error;
pub use incident::{Incident, IncidentCategory, IncidentId, IncidentStatus, Severity};
pub use repositories::RepositoryProvider;
pub use token::{AccessToken, TokenClaims, TokenConfig};
