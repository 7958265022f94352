//! User endpoints, backed by the instrumented user repository.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::services::users::{ERR_USER_INVALID, ERR_USER_NOT_FOUND};
use crate::services::User;
use crate::state::AppState;
use crate::utils::http_helpers::HTTPError;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/:id", get(get_user))
}

#[derive(Deserialize)]
struct CreateUser {
    name: String,
    email: String,
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<User>, HTTPError> {
    state.users.find(id).await.map(Json).map_err(|e| {
        state.monitoring.app.log_metrics(&[e.code.clone()]);
        let status = match e.code.as_str() {
            ERR_USER_NOT_FOUND => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        HTTPError::from_app_error(status, &e)
    })
}

async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUser>,
) -> Result<(StatusCode, Json<User>), HTTPError> {
    match state.users.insert(&body.name, &body.email).await {
        Ok(user) => Ok((StatusCode::CREATED, Json(user))),
        Err(e) => {
            state.monitoring.app.log_metrics(&[e.code.clone()]);
            let status = match e.code.as_str() {
                ERR_USER_INVALID => StatusCode::UNPROCESSABLE_ENTITY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            Err(HTTPError::from_app_error(status, &e))
        }
    }
}
