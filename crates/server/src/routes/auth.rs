use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use tracing::debug;
use service::auth::domain::LoginInput;
use service::errors::ServiceError;

use crate::errors::ApiError;
use crate::extract::TOKEN_COOKIE;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthOutput {
    pub success: bool,
}

/// Issue an identity token for the posted email and set it as a cookie.
#[utoipa::path(post, path = "/jwt", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Cookie set"), (status = 400, description = "Missing email")))]
pub async fn issue_token(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(input), _): WithRejection<Json<LoginInput>, ApiError>,
) -> Result<(CookieJar, Json<AuthOutput>), ApiError> {
    let issued = state.tokens.issue(&input).map_err(ServiceError::from)?;
    debug!(expires_in_secs = issued.expires_in_secs, "token cookie set");
    let cookie = Cookie::build((TOKEN_COOKIE, issued.token))
        .path("/")
        .http_only(true)
        .secure(state.cookies.secure)
        .same_site(state.cookies.same_site)
        .build();
    Ok((jar.add(cookie), Json(AuthOutput { success: true })))
}

#[utoipa::path(post, path = "/logout", tag = "auth", responses((status = 200, description = "Cookie cleared")))]
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<AuthOutput>) {
    // Always emit the expiring cookie, even when the request carried none
    let mut cookie = Cookie::build((TOKEN_COOKIE, ""))
        .path("/")
        .http_only(true)
        .secure(state.cookies.secure)
        .same_site(state.cookies.same_site)
        .build();
    cookie.make_removal();
    (jar.add(cookie), Json(AuthOutput { success: true }))
}
