use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use sentra::{AccessToken, Account, RepositoryProvider, Sentra};

pub struct AppState<R: RepositoryProvider> {
    pub sentra: Arc<Sentra<R>>,
}

impl<R: RepositoryProvider> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            sentra: self.sentra.clone(),
        }
    }
}

/// Resolve the bearer token (when present and valid) to an account and stash
/// it in request extensions. Protected handlers pull it back out through the
/// `CurrentAccount` extractor; this middleware itself rejects nothing.
pub async fn auth_middleware<R>(
    State(state): State<AppState<R>>,
    mut request: Request,
    next: Next,
) -> Response
where
    R: RepositoryProvider,
{
    request.extensions_mut().insert(None::<Account>);

    if let Some(token) = extract_bearer_token(&request) {
        match state.sentra.authenticate(&AccessToken::new(&token)).await {
            Ok(account) => {
                request.extensions_mut().insert(account.clone());
                request.extensions_mut().insert(Some(account));
            }
            Err(e) => {
                tracing::debug!(error = %e, "Bearer token rejected");
            }
        }
    }

    next.run(request).await
}

fn extract_bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(|token| token.to_string())
}
