use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Form;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tera::Context;

use crate::sessions::WebSession;
use crate::ucs::UcsSession;
use crate::AppState;

use super::{render, session_from_jar, to_connect_page, PageError};

#[derive(Debug, Deserialize)]
pub struct CreateVlanForm {
    #[serde(rename = "vlan-name")]
    pub vlan_name: String,
    #[serde(rename = "vlan-id")]
    pub vlan_id: String,
}

/// GET /vlans: list the domain's VLANs.
pub async fn page(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response, PageError> {
    let Some(web) = session_from_jar(&state, &jar).await else {
        return Ok(to_connect_page().into_response());
    };
    let page = match fetch_vlans(&state, &web).await {
        Ok(vlans) => VlansPage {
            vlans,
            new_vlan_name: String::new(),
            error: String::new(),
        },
        Err(e) => VlansPage::error(e),
    };
    Ok(page.render(&state, &web)?.into_response())
}

/// POST /vlans: create a VLAN, then re-list.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<CreateVlanForm>,
) -> Result<Response, PageError> {
    let Some(web) = session_from_jar(&state, &jar).await else {
        return Ok(to_connect_page().into_response());
    };

    let created = create_vlan(&state, &web, &form.vlan_name, &form.vlan_id).await;
    let page = match created {
        Ok(()) => match fetch_vlans(&state, &web).await {
            Ok(vlans) => VlansPage {
                vlans,
                new_vlan_name: form.vlan_name,
                error: String::new(),
            },
            Err(e) => VlansPage::error(e),
        },
        Err(e) => {
            tracing::warn!(vlan = %form.vlan_name, "VLAN creation failed: {}", e);
            let vlans = fetch_vlans(&state, &web).await.unwrap_or_default();
            VlansPage {
                vlans,
                new_vlan_name: String::new(),
                error: e.to_string(),
            }
        }
    };
    Ok(page.render(&state, &web)?.into_response())
}

struct VlansPage {
    vlans: BTreeMap<String, String>,
    new_vlan_name: String,
    error: String,
}

impl VlansPage {
    fn error(err: crate::error::UcsError) -> Self {
        Self {
            vlans: BTreeMap::new(),
            new_vlan_name: String::new(),
            error: err.to_string(),
        }
    }

    fn render(
        &self,
        state: &AppState,
        web: &WebSession,
    ) -> Result<axum::response::Html<String>, PageError> {
        let mut context = Context::new();
        context.insert("vlans", &self.vlans);
        context.insert("ip", &web.host);
        context.insert("new_vlan_name", &self.new_vlan_name);
        context.insert("error", &self.error);
        render(state, "vlans.html", &context)
    }
}

async fn fetch_vlans(
    state: &AppState,
    web: &WebSession,
) -> Result<BTreeMap<String, String>, crate::error::UcsError> {
    let session = UcsSession::login(&state.config, &web.host, &web.username, &web.password).await?;
    let vlans = session.list_vlans().await?;
    session.logout().await?;
    Ok(vlans)
}

async fn create_vlan(
    state: &AppState,
    web: &WebSession,
    name: &str,
    id: &str,
) -> Result<(), crate::error::UcsError> {
    let session = UcsSession::login(&state.config, &web.host, &web.username, &web.password).await?;
    let result = session.create_vlan(name, id).await;
    session.logout().await?;
    result
}
