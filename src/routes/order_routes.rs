//! Order endpoint: validates the user, then publishes an order event.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Deserialize;

use crate::services::users::ERR_USER_NOT_FOUND;
use crate::services::Order;
use crate::state::AppState;
use crate::utils::http_helpers::HTTPError;

pub fn routes() -> Router<AppState> {
    Router::new().route("/orders", post(create_order))
}

#[derive(Deserialize)]
struct CreateOrder {
    user_id: u64,
    amount_cents: u64,
}

async fn create_order(
    State(state): State<AppState>,
    Json(body): Json<CreateOrder>,
) -> Result<(StatusCode, Json<Order>), HTTPError> {
    if let Err(e) = state.users.find(body.user_id).await {
        state.monitoring.app.log_metrics(&[e.code.clone()]);
        let status = match e.code.as_str() {
            ERR_USER_NOT_FOUND => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        return Err(HTTPError::from_app_error(status, &e));
    }

    match state.orders.publish(body.user_id, body.amount_cents).await {
        Ok(order) => Ok((StatusCode::ACCEPTED, Json(order))),
        Err(e) => {
            state.monitoring.app.log_metrics(&[e.code.clone()]);
            Err(HTTPError::from_app_error(StatusCode::SERVICE_UNAVAILABLE, &e))
        }
    }
}
