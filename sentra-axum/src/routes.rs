use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use sentra::error::AuthError;
use sentra::incident::{IncidentUpdate, NewIncident};
use sentra::asset::{AssetUpdate, NewAsset};
use sentra::repositories::{AssetFilter, IncidentFilter, Page};
use sentra::{AssetId, IncidentId, RegisterAccount, RepositoryProvider, Role, Sentra};

use crate::{
    error::{ApiError, Result},
    extractors::CurrentAccount,
    middleware::{AppState, auth_middleware},
    types::*,
};

pub fn create_router<R>(sentra: Arc<Sentra<R>>) -> Router
where
    R: RepositoryProvider + 'static,
{
    let state = AppState { sentra };

    Router::new()
        .route("/health", get(health_handler))
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/me", get(me_handler))
        .route("/auth/logout", post(logout_handler))
        .route("/auth/change-password", put(change_password_handler))
        .route(
            "/incidents",
            get(list_incidents_handler).post(create_incident_handler),
        )
        .route(
            "/incidents/{id}",
            get(get_incident_handler)
                .put(update_incident_handler)
                .delete(delete_incident_handler),
        )
        .route(
            "/assets",
            get(list_assets_handler).post(create_asset_handler),
        )
        .route(
            "/assets/{id}",
            get(get_asset_handler)
                .put(update_asset_handler)
                .delete(delete_asset_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::<R>,
        ))
        .with_state(state)
}

async fn health_handler<R>(State(state): State<AppState<R>>) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    state
        .sentra
        .health_check()
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(ApiResponse::ok(HealthData {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })))
}

async fn register_handler<R>(
    State(state): State<AppState<R>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let (user, token) = state
        .sentra
        .register(RegisterAccount {
            username: payload.username,
            email: payload.email,
            password: payload.password,
            first_name: payload.first_name,
            last_name: payload.last_name,
            role: payload.role,
            department_id: payload.department_id,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(
            "User registered successfully",
            AuthData {
                user,
                token: token.into_inner(),
            },
        )),
    ))
}

async fn login_handler<R>(
    State(state): State<AppState<R>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let (user, token) = state
        .sentra
        .login(&payload.username, &payload.password)
        .await?;

    Ok(Json(ApiResponse::ok_with_message(
        "Login successful",
        AuthData {
            user,
            token: token.into_inner(),
        },
    )))
}

async fn me_handler(CurrentAccount(account): CurrentAccount) -> Result<impl IntoResponse> {
    Ok(Json(ApiResponse::ok(UserData { user: account })))
}

async fn logout_handler<R>(
    State(state): State<AppState<R>>,
    CurrentAccount(_account): CurrentAccount,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    // Stateless tokens: nothing to revoke, the client discards its copy.
    state.sentra.logout().await?;

    Ok(Json(ApiResponse::message("Logout successful")))
}

async fn change_password_handler<R>(
    State(state): State<AppState<R>>,
    CurrentAccount(account): CurrentAccount,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    match state
        .sentra
        .change_password(&account.id, &payload.current_password, &payload.new_password)
        .await
    {
        Ok(()) => Ok(Json(ApiResponse::message("Password changed successfully"))),
        // On this authenticated path a credential mismatch is a bad request,
        // not a login failure.
        Err(sentra::Error::Auth(AuthError::InvalidCredentials)) => Err(ApiError::BadRequest(
            "Current password is incorrect".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

async fn create_incident_handler<R>(
    State(state): State<AppState<R>>,
    CurrentAccount(account): CurrentAccount,
    Json(payload): Json<CreateIncidentRequest>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let mut builder = NewIncident::builder()
        .title(payload.title)
        .description(payload.description)
        .severity(payload.severity)
        .category(payload.category)
        .reporter_id(account.id.clone())
        .assignee_id(payload.assignee_id);
    if let Some(status) = payload.status {
        builder = builder.status(status);
    }
    let new_incident = builder.build()?;

    let incident = state.sentra.incidents().report(&account.id, new_incident).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(incident))))
}

async fn list_incidents_handler<R>(
    State(state): State<AppState<R>>,
    CurrentAccount(_account): CurrentAccount,
    Query(query): Query<ListIncidentsQuery>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let filter = IncidentFilter {
        status: query.status,
        severity: query.severity,
    };
    let page = Page {
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(20),
    };

    let incidents = state.sentra.incidents().list(&filter, &page).await?;

    Ok(Json(ApiResponse::ok(incidents)))
}

async fn get_incident_handler<R>(
    State(state): State<AppState<R>>,
    CurrentAccount(_account): CurrentAccount,
    Path(id): Path<String>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let incident = state
        .sentra
        .incidents()
        .get(&IncidentId::new(&id))
        .await?
        .ok_or_else(|| ApiError::NotFound("Incident not found".to_string()))?;

    Ok(Json(ApiResponse::ok(incident)))
}

async fn update_incident_handler<R>(
    State(state): State<AppState<R>>,
    CurrentAccount(_account): CurrentAccount,
    Path(id): Path<String>,
    Json(update): Json<IncidentUpdate>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let incident = state
        .sentra
        .incidents()
        .update(&IncidentId::new(&id), update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Incident not found".to_string()))?;

    Ok(Json(ApiResponse::ok(incident)))
}

async fn delete_incident_handler<R>(
    State(state): State<AppState<R>>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<String>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    if account.role != Role::Admin {
        return Err(ApiError::Forbidden);
    }

    state.sentra.incidents().delete(&IncidentId::new(&id)).await?;

    Ok(Json(ApiResponse::message("Incident deleted successfully")))
}

async fn create_asset_handler<R>(
    State(state): State<AppState<R>>,
    CurrentAccount(account): CurrentAccount,
    Json(payload): Json<CreateAssetRequest>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let mut builder = NewAsset::builder()
        .name(payload.name)
        .asset_type(payload.asset_type)
        .ip_address(payload.ip_address)
        .location(payload.location)
        .owner_id(account.id.clone())
        .criticality(payload.criticality)
        .operating_system(payload.operating_system);
    if let Some(status) = payload.status {
        builder = builder.status(status);
    }
    let new_asset = builder.build()?;

    let asset = state.sentra.assets().register_asset(new_asset).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(asset))))
}

async fn list_assets_handler<R>(
    State(state): State<AppState<R>>,
    CurrentAccount(_account): CurrentAccount,
    Query(query): Query<ListAssetsQuery>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let filter = AssetFilter {
        status: query.status,
        asset_type: query.asset_type,
    };
    let page = Page {
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(20),
    };

    let assets = state.sentra.assets().list(&filter, &page).await?;

    Ok(Json(ApiResponse::ok(assets)))
}

async fn get_asset_handler<R>(
    State(state): State<AppState<R>>,
    CurrentAccount(_account): CurrentAccount,
    Path(id): Path<String>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let asset = state
        .sentra
        .assets()
        .get(&AssetId::new(&id))
        .await?
        .ok_or_else(|| ApiError::NotFound("Asset not found".to_string()))?;

    Ok(Json(ApiResponse::ok(asset)))
}

async fn update_asset_handler<R>(
    State(state): State<AppState<R>>,
    CurrentAccount(_account): CurrentAccount,
    Path(id): Path<String>,
    Json(update): Json<AssetUpdate>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let asset = state
        .sentra
        .assets()
        .update(&AssetId::new(&id), update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Asset not found".to_string()))?;

    Ok(Json(ApiResponse::ok(asset)))
}

async fn delete_asset_handler<R>(
    State(state): State<AppState<R>>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<String>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    if account.role != Role::Admin {
        return Err(ApiError::Forbidden);
    }

    state.sentra.assets().delete(&AssetId::new(&id)).await?;

    Ok(Json(ApiResponse::message("Asset deleted successfully")))
}
