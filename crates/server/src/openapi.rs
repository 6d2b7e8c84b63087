use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest {
    pub service_status: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertResultDoc {
    pub acknowledged: bool,
    pub inserted_id: Uuid,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::issue_token,
        crate::routes::auth::logout,
        crate::routes::users::list_users,
        crate::routes::services::list_services,
        crate::routes::services::get_service,
        crate::routes::services::my_services,
        crate::routes::services::create_service,
        crate::routes::services::update_service,
        crate::routes::services::delete_service,
        crate::routes::bookings::create_booking,
        crate::routes::bookings::user_bookings,
        crate::routes::bookings::provider_bookings,
        crate::routes::bookings::update_booking_status,
    ),
    components(
        schemas(
            HealthResponse,
            LoginRequest,
            StatusUpdateRequest,
            InsertResultDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth", description = "Token cookie issue and clear"),
        (name = "users"),
        (name = "services", description = "Service listings"),
        (name = "bookings", description = "Bookings and provider status updates"),
    )
)]
pub struct ApiDoc;
