//! Authentication API Endpoints
//! Mission: Wire login, logout, and guarded pages to the auth core

use crate::auth::{
    guard::{require_login, CurrentUser},
    models::{AuthOutcome, LoginRequest, UserInfoResponse, UserResponse},
    session::SessionManager,
    strategy::AuthStrategy,
};
use crate::config::Config;
use crate::middleware::request_logging;
use crate::pages;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::{from_fn, from_fn_with_state},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Extension, Form, Json, RequestExt, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
    pub strategy: Arc<dyn AuthStrategy>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        sessions: Arc<SessionManager>,
        strategy: Arc<dyn AuthStrategy>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            sessions,
            strategy,
            config,
        }
    }
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/", get(pages::home_page))
        .route("/private", get(pages::private_page))
        .route("/user", get(user_info))
        .route_layer(from_fn_with_state(state.clone(), require_login));

    Router::new()
        .merge(protected)
        .route("/login", get(pages::login_page).post(login))
        .route("/logout", get(logout))
        .route("/health", get(health))
        .layer(from_fn(request_logging))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Login endpoint - POST /login
///
/// Accepts JSON or form-encoded credentials. A rejection redirects back to
/// the login page with a structured error code; only infrastructure faults
/// become a 500.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    req: Request,
) -> Result<Response, AuthApiError> {
    let credentials = extract_credentials(req).await?;
    info!("🔑 Login attempt: {}", credentials.username);

    let outcome = state
        .strategy
        .authenticate(&credentials.username, &credentials.password)
        .await
        .map_err(|e| {
            warn!("Authentication infrastructure fault: {}", e);
            AuthApiError::InternalError
        })?;

    match outcome {
        AuthOutcome::Failure(reason) => {
            warn!(
                "❌ Failed login attempt: {} ({:?})",
                credentials.username, reason
            );
            let target = format!("/login?error={}", reason.as_code());
            Ok(Redirect::to(&target).into_response())
        }
        AuthOutcome::Success(user) => {
            let record = state.sessions.establish(&user).map_err(|e| {
                warn!("Session establishment failed: {}", e);
                AuthApiError::InternalError
            })?;

            info!("✅ Login successful: {}", user.username);

            let cookie = Cookie::build((state.config.cookie_name.clone(), record.token))
                .http_only(true)
                .secure(state.config.cookie_secure)
                .path("/")
                .max_age(time::Duration::seconds(state.sessions.ttl_secs()))
                .build();

            Ok((jar.add(cookie), Redirect::to("/")).into_response())
        }
    }
}

/// Pull credentials from a JSON or form-encoded body.
async fn extract_credentials(req: Request) -> Result<LoginRequest, AuthApiError> {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if content_type.starts_with("application/json") {
        let Json(body) = req
            .extract::<Json<LoginRequest>, _>()
            .await
            .map_err(|_| AuthApiError::MalformedBody)?;
        Ok(body)
    } else {
        let Form(body) = req
            .extract::<Form<LoginRequest>, _>()
            .await
            .map_err(|_| AuthApiError::MalformedBody)?;
        Ok(body)
    }
}

/// Current user info - GET /user (guarded)
pub async fn user_info(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Json<UserInfoResponse> {
    Json(UserInfoResponse {
        user: UserResponse::from_user(&user),
    })
}

/// Logout endpoint - GET /logout
///
/// Destroys the session (idempotent: a missing or stale cookie still gets
/// the confirmation page) and clears the cookie.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, AuthApiError> {
    let token = jar
        .get(&state.config.cookie_name)
        .map(|cookie| cookie.value().to_string());

    let jar = match token {
        Some(token) => {
            state.sessions.destroy(&token).map_err(|e| {
                warn!("Session teardown failed: {}", e);
                AuthApiError::InternalError
            })?;
            info!("👋 Session destroyed");

            let removal = Cookie::build((state.config.cookie_name.clone(), ""))
                .path("/")
                .build();
            jar.remove(removal)
        }
        None => jar,
    };

    Ok((jar, Html(pages::LOGOUT_HTML)).into_response())
}

/// Liveness probe - GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Auth API errors
#[derive(Debug)]
pub enum AuthApiError {
    MalformedBody,
    InternalError,
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthApiError::MalformedBody => (StatusCode::BAD_REQUEST, "Malformed request body"),
            // Deliberately non-descriptive; details stay in the server log.
            AuthApiError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_api_error_responses() {
        let malformed = AuthApiError::MalformedBody.into_response();
        assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);

        let internal = AuthApiError::InternalError.into_response();
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
