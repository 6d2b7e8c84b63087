use axum::{extract::State, Json};
use service::store::Document;

use crate::errors::ApiError;
use crate::state::AppState;

#[utoipa::path(get, path = "/users", tag = "users", responses((status = 200, description = "All users")))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<Document>>, ApiError> {
    Ok(Json(state.users.list_all().await?))
}
