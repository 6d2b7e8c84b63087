pub mod auth;
pub mod bookings;
pub mod services;
pub mod users;

use axum::{
    routing::{get, patch, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::state::AppState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn root() -> &'static str {
    "Server is running"
}

/// Build the full application router with request tracing and CORS applied.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/jwt", post(auth::issue_token))
        .route("/logout", post(auth::logout))
        .route("/users", get(users::list_users));

    // Handlers extracting `CurrentUser` reject unauthenticated callers themselves
    let resources = Router::new()
        .route("/services", get(services::list_services).post(services::create_service))
        .route(
            "/services/:id",
            get(services::get_service)
                .put(services::update_service)
                .delete(services::delete_service),
        )
        .route("/my-services", get(services::my_services))
        .route("/bookings", post(bookings::create_booking))
        .route("/bookings/user", get(bookings::user_bookings))
        .route("/provider-booked-services", get(bookings::provider_bookings))
        .route("/provider-booked-services/:id", patch(bookings::update_booking_status));

    public
        .merge(resources)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
