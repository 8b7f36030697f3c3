//! Route Guard
//! Mission: Gate protected routes behind a resolved session identity

use crate::auth::api::AppState;
use crate::auth::models::User;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

/// Where anonymous requests get sent.
pub const LOGIN_REDIRECT: &str = "/login";

/// Guard verdict for a single request.
#[derive(Debug, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny { redirect: &'static str },
}

/// Pure access predicate: allow iff the request carries a resolved identity.
pub fn guard(identity: Option<&User>) -> Access {
    match identity {
        Some(_) => Access::Allow,
        None => Access::Deny {
            redirect: LOGIN_REDIRECT,
        },
    }
}

/// Resolved identity attached to the request by [`require_login`].
#[derive(Clone)]
pub struct CurrentUser(pub User);

/// Middleware protecting a route subtree.
///
/// Resolves the session cookie into a user, applies [`guard`], and inserts
/// [`CurrentUser`] into request extensions on success. An absent or expired
/// session redirects to the login page; only a store fault is a 500.
pub async fn require_login(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let identity = match jar.get(&state.config.cookie_name) {
        Some(cookie) => match state.sessions.resolve(cookie.value()) {
            Ok(identity) => identity,
            Err(e) => {
                warn!("Session resolution failed: {}", e);
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        },
        None => None,
    };

    match guard(identity.as_ref()) {
        Access::Allow => {
            let Some(user) = identity else {
                return Redirect::to(LOGIN_REDIRECT).into_response();
            };
            req.extensions_mut().insert(CurrentUser(user));
            next.run(req).await
        }
        Access::Deny { redirect } => Redirect::to(redirect).into_response(),
    }
}
