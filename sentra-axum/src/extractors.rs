use axum::{
    Extension, RequestPartsExt,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use sentra::{AccessToken, Account};

use crate::error::ApiError;

/// The authenticated account, resolved by the auth middleware. Rejects with
/// 401 when the request carried no valid bearer token.
pub struct CurrentAccount(pub Account);

impl<S> FromRequestParts<S> for CurrentAccount
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Extension(account): Extension<Account> = parts
            .extract()
            .await
            .map_err(|_| ApiError::Unauthorized)?;

        Ok(CurrentAccount(account))
    }
}

/// The authenticated account, if any.
pub struct OptionalAccount(pub Option<Account>);

impl<S> FromRequestParts<S> for OptionalAccount
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let account = parts.extensions.get::<Account>().cloned();

        Ok(OptionalAccount(account))
    }
}

/// The raw bearer token from the `Authorization` header, if any.
pub struct BearerToken(pub Option<AccessToken>);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get("Authorization")
            .and_then(|header| header.to_str().ok())
            .and_then(|header| header.strip_prefix("Bearer "))
            .map(AccessToken::new);

        Ok(BearerToken(token))
    }
}
