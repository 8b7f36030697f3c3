//! Static pages served by the route layer.
//!
//! The pages themselves are demo chrome, embedded at compile time so the
//! binary has no runtime file dependencies.

use axum::response::Html;

pub const LOGIN_HTML: &str = include_str!("../static/login.html");
pub const INDEX_HTML: &str = include_str!("../static/index.html");
pub const PRIVATE_HTML: &str = include_str!("../static/private.html");
pub const LOGOUT_HTML: &str = include_str!("../static/logout.html");

/// GET /login
pub async fn login_page() -> Html<&'static str> {
    Html(LOGIN_HTML)
}

/// GET / (guarded)
pub async fn home_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /private (guarded)
pub async fn private_page() -> Html<&'static str> {
    Html(PRIVATE_HTML)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_page_posts_back_to_login() {
        assert!(LOGIN_HTML.contains(r#"action="/login""#));
        assert!(LOGIN_HTML.contains(r#"name="username""#));
        assert!(LOGIN_HTML.contains(r#"name="password""#));
    }
}
