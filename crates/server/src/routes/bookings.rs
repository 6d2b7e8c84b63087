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
use crate::routes::services::EmailQuery;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusUpdateInput {
    #[serde(rename = "serviceStatus", default)]
    pub service_status: Option<String>,
}

#[utoipa::path(post, path = "/bookings", tag = "bookings", request_body = Object, responses((status = 201, description = "Booking created", body = crate::openapi::InsertResultDoc), (status = 400, description = "Missing provider"), (status = 401, description = "Unauthenticated")))]
pub async fn create_booking(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    WithRejection(Json(payload), _): WithRejection<Json<Value>, ApiError>,
) -> Result<(StatusCode, Json<InsertResult>), ApiError> {
    let created = state.bookings.create(&identity, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/bookings/user", tag = "bookings", params(("email" = String, Query, description = "Caller's own email")), responses((status = 200, description = "Bookings made by the caller"), (status = 403, description = "Email is not the caller's")))]
pub async fn user_bookings(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    WithRejection(Query(q), _): WithRejection<Query<EmailQuery>, ApiError>,
) -> Result<Json<Vec<Document>>, ApiError> {
    Ok(Json(state.bookings.list_by_user(&identity, q.email.as_deref()).await?))
}

#[utoipa::path(get, path = "/provider-booked-services", tag = "bookings", params(("email" = String, Query, description = "Caller's own email")), responses((status = 200, description = "Bookings of the caller's services"), (status = 403, description = "Email is not the caller's")))]
pub async fn provider_bookings(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    WithRejection(Query(q), _): WithRejection<Query<EmailQuery>, ApiError>,
) -> Result<Json<Vec<Document>>, ApiError> {
    Ok(Json(state.bookings.list_by_provider(&identity, q.email.as_deref()).await?))
}

#[utoipa::path(patch, path = "/provider-booked-services/{id}", tag = "bookings", params(("id" = Uuid, Path, description = "Booking id")), request_body = crate::openapi::StatusUpdateRequest, responses((status = 200, description = "Status updated"), (status = 304, description = "Status unchanged"), (status = 400, description = "Status missing"), (status = 403, description = "Not the provider"), (status = 404, description = "Not found")))]
pub async fn update_booking_status(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Json(input), _): WithRejection<Json<StatusUpdateInput>, ApiError>,
) -> Result<Response, ApiError> {
    match state.bookings.update_status(&identity, id, input.service_status.as_deref()).await? {
        Mutation::Applied => Ok(Json(Message::new("Booking status updated successfully")).into_response()),
        Mutation::Unchanged => Ok(StatusCode::NOT_MODIFIED.into_response()),
    }
}
