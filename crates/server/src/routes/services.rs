use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::WithRejection;
use common::types::Message;
use serde::Deserialize;
use serde_json::Value;
use service::domain::{InsertResult, Mutation};
use service::store::Document;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::extract::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

#[utoipa::path(get, path = "/services", tag = "services", responses((status = 200, description = "All services")))]
pub async fn list_services(State(state): State<AppState>) -> Result<Json<Vec<Document>>, ApiError> {
    Ok(Json(state.catalog.list_all().await?))
}

#[utoipa::path(get, path = "/services/{id}", tag = "services", params(("id" = Uuid, Path, description = "Service id")), responses((status = 200, description = "The service"), (status = 404, description = "Not found")))]
pub async fn get_service(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<Json<Document>, ApiError> {
    Ok(Json(state.catalog.get_by_id(id).await?))
}

#[utoipa::path(get, path = "/my-services", tag = "services", params(("email" = String, Query, description = "Caller's own email")), responses((status = 200, description = "Caller's services"), (status = 401, description = "Unauthenticated"), (status = 403, description = "Email is not the caller's")))]
pub async fn my_services(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    WithRejection(Query(q), _): WithRejection<Query<EmailQuery>, ApiError>,
) -> Result<Json<Vec<Document>>, ApiError> {
    Ok(Json(state.catalog.list_by_provider(&identity, q.email.as_deref()).await?))
}

#[utoipa::path(post, path = "/services", tag = "services", request_body = Object, responses((status = 201, description = "Created", body = crate::openapi::InsertResultDoc), (status = 401, description = "Unauthenticated")))]
pub async fn create_service(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    WithRejection(Json(payload), _): WithRejection<Json<Value>, ApiError>,
) -> Result<(StatusCode, Json<InsertResult>), ApiError> {
    let created = state.catalog.create(&identity, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(put, path = "/services/{id}", tag = "services", params(("id" = Uuid, Path, description = "Service id")), request_body = Object, responses((status = 200, description = "Updated"), (status = 304, description = "Nothing changed"), (status = 403, description = "Not the owner"), (status = 404, description = "Not found")))]
pub async fn update_service(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<Value>, ApiError>,
) -> Result<Response, ApiError> {
    match state.catalog.update(&identity, id, payload).await? {
        Mutation::Applied => Ok(Json(Message::new("Service updated successfully")).into_response()),
        Mutation::Unchanged => Ok(StatusCode::NOT_MODIFIED.into_response()),
    }
}

#[utoipa::path(delete, path = "/services/{id}", tag = "services", params(("id" = Uuid, Path, description = "Service id")), responses((status = 200, description = "Deleted"), (status = 403, description = "Not the owner"), (status = 404, description = "Not found")))]
pub async fn delete_service(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<Json<Message>, ApiError> {
    state.catalog.delete(&identity, id).await?;
    Ok(Json(Message::new("Service deleted successfully")))
}
