pub mod connect;
pub mod vlans;
pub mod vnics;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use tera::Context;
use uuid::Uuid;

use crate::sessions::{WebSession, SESSION_COOKIE};
use crate::AppState;

/// Page-level error: rendered as a plain status + message.
pub struct PageError {
    status: StatusCode,
    message: String,
}

impl PageError {
    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

impl From<tera::Error> for PageError {
    fn from(err: tera::Error) -> Self {
        Self::internal(format!("template rendering failed: {}", err))
    }
}

/// Render a template into an HTML response.
pub fn render(state: &AppState, template: &str, context: &Context) -> Result<Html<String>, PageError> {
    Ok(Html(state.templates.render(template, context)?))
}

/// Look up the caller's web session from the cookie jar. `None` means the
/// caller must be redirected to the connect page.
pub async fn session_from_jar(state: &Arc<AppState>, jar: &CookieJar) -> Option<WebSession> {
    let token = jar
        .get(SESSION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok())?;
    state.sessions.get(token).await
}

/// Shared redirect for unauthenticated page requests.
pub fn to_connect_page() -> Redirect {
    Redirect::to("/")
}

/// Healthcheck endpoint — returns 200 OK with status
pub async fn healthcheck() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "service": "ucsvlan",
    }))
}
