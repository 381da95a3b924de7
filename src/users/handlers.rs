use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    routing::post,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};

use crate::{
    errors::ApiError,
    state::AppState,
    users::{
        dto::{CreatedUserResponse, LookupQuery, RegisterRequest, UserResponse},
        password::hash_password_blocking,
        repo_types::{NewUser, StoreError},
        services::{parse_user_id, validate_registration},
    },
};

pub fn users_routes() -> Router<AppState> {
    Router::new().route("/users", post(register).get(get_user))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedUserResponse>), ApiError> {
    let Json(payload) = payload.map_err(|e| {
        warn!(error = %e, "malformed registration payload");
        ApiError::InvalidInput("Invalid JSON")
    })?;

    if let Err(e) = validate_registration(&payload) {
        warn!(reason = %e, "registration rejected");
        return Err(e);
    }

    match state.users.email_exists(&payload.email).await {
        Ok(false) => {}
        Ok(true) => {
            warn!(email = %payload.email, "email already registered");
            return Err(ApiError::Conflict);
        }
        Err(e) => {
            error!(error = %e, "email_exists failed");
            return Err(ApiError::INTERNAL);
        }
    }

    let hash = hash_password_blocking(payload.password.clone()).await.map_err(|e| {
        error!(error = %e, "hash_password failed");
        ApiError::INTERNAL
    })?;

    let new_user = NewUser {
        email: &payload.email,
        password_hash: &hash,
        name: payload.name.trim(),
        age: payload.age,
        created_at: OffsetDateTime::now_utc(),
    };

    let user = match state.users.create(new_user).await {
        Ok(u) => u,
        Err(StoreError::DuplicateEmail) => {
            // Lost a race with a concurrent registration; the unique index caught it.
            warn!(email = %payload.email, "email registered concurrently");
            return Err(ApiError::Conflict);
        }
        Err(e) => {
            error!(error = %e, "create user failed");
            return Err(ApiError::StorageFailure("Failed to create user"));
        }
    };

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(CreatedUserResponse {
            user: user.into(),
            message: "User created successfully",
        }),
    ))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    query: Result<Query<LookupQuery>, QueryRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let Query(query) = query.map_err(|e| {
        warn!(error = %e, "malformed lookup query");
        ApiError::InvalidInput("Invalid user ID")
    })?;
    let id = parse_user_id(query.id())?;

    match state.users.find_by_id(id).await {
        Ok(Some(user)) => Ok(Json(user.into())),
        Ok(None) => Err(ApiError::NotFound),
        Err(e) => {
            error!(error = %e, user_id = id, "find_by_id failed");
            Err(ApiError::INTERNAL)
        }
    }
}
