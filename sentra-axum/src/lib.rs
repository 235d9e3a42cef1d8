//! Ready-to-use Axum routes and middleware for the Sentra backend
//!
//! [`create_router`] builds the full HTTP surface:
//!
//! - `POST /auth/register` — create an account, returns `{user, token}` (201)
//! - `POST /auth/login` — authenticate, returns `{user, token}`; 401 on bad
//!   credentials, 423 while the account is locked
//! - `GET /auth/me` — the bearer-authenticated account
//! - `POST /auth/logout` — acknowledges; tokens are stateless
//! - `PUT /auth/change-password` — rotate the credential
//! - `/incidents`, `/assets` — bearer-protected CRUD; DELETE requires the
//!   `admin` role
//!
//! Every response carries a `success` flag; errors render as
//! `{success: false, message}`.

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod types;

pub use error::ApiError;
pub use extractors::{BearerToken, CurrentAccount, OptionalAccount};
pub use middleware::{AppState, auth_middleware};
pub use routes::create_router;
pub use types::{ApiResponse, AuthData};
