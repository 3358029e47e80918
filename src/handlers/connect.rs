use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use tera::Context;

use crate::sessions::SESSION_COOKIE;
use crate::ucs::UcsSession;
use crate::AppState;

use super::{render, PageError};

#[derive(Debug, Deserialize)]
pub struct ConnectForm {
    pub ip_address: String,
    pub username: String,
    pub password: String,
}

/// GET /: the connect form.
pub async fn page(State(state): State<Arc<AppState>>) -> Result<Response, PageError> {
    let mut context = Context::new();
    context.insert("error", "");
    Ok(render(&state, "index.html", &context)?.into_response())
}

/// POST /: probe a login with the submitted credentials; on success store
/// them under a fresh session token and move on to the VLAN page.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<ConnectForm>,
) -> Result<Response, PageError> {
    match UcsSession::login(&state.config, &form.ip_address, &form.username, &form.password).await
    {
        Ok(session) => {
            // Probe only; each page logs in on its own afterwards.
            if let Err(e) = session.logout().await {
                tracing::warn!("logout after login probe failed: {}", e);
            }
            let token = state
                .sessions
                .create(form.ip_address, form.username, form.password)
                .await;
            let mut cookie = Cookie::new(SESSION_COOKIE, token.to_string());
            cookie.set_path("/");
            cookie.set_http_only(true);
            Ok((jar.add(cookie), Redirect::to("/vlans")).into_response())
        }
        Err(e) => {
            tracing::warn!(host = %form.ip_address, "UCS login failed: {}", e);
            let mut context = Context::new();
            context.insert("error", &e.to_string());
            Ok(render(&state, "index.html", &context)?.into_response())
        }
    }
}
