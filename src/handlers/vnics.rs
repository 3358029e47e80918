use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Form;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tera::Context;

use crate::error::UcsError;
use crate::sessions::WebSession;
use crate::ucs::{BindOutcome, UcsSession};
use crate::AppState;

use super::{render, session_from_jar, to_connect_page, PageError};

#[derive(Debug, Deserialize)]
pub struct BindForm {
    #[serde(rename = "vnic-name")]
    pub vnic_name: String,
    #[serde(rename = "vlan-name")]
    pub vlan_name: String,
}

/// GET /vnics: list vNIC templates and VLANs.
pub async fn page(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response, PageError> {
    let Some(web) = session_from_jar(&state, &jar).await else {
        return Ok(to_connect_page().into_response());
    };
    let page = match fetch_inventory(&state, &web).await {
        Ok((vnics, vlans)) => VnicsPage {
            vnics,
            vlans,
            ..VnicsPage::default()
        },
        Err(e) => VnicsPage {
            error: e.to_string(),
            ..VnicsPage::default()
        },
    };
    Ok(page.render(&state, &web)?.into_response())
}

/// POST /vnics: bind a VLAN to a vNIC template, then re-list.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<BindForm>,
) -> Result<Response, PageError> {
    let Some(web) = session_from_jar(&state, &jar).await else {
        return Ok(to_connect_page().into_response());
    };

    let mut page = match bind(&state, &web, &form.vnic_name, &form.vlan_name).await {
        Ok(BindOutcome::Bound { .. }) => VnicsPage {
            success: true,
            vnic_name: form.vnic_name,
            vlan_name: form.vlan_name,
            ..VnicsPage::default()
        },
        Ok(BindOutcome::TemplateNotFound) => VnicsPage {
            error: UcsError::ObjectNotFound(format!("vNIC template \"{}\"", form.vnic_name))
                .to_string(),
            ..VnicsPage::default()
        },
        Err(e) => {
            tracing::warn!(template = %form.vnic_name, "VLAN bind failed: {}", e);
            VnicsPage {
                error: e.to_string(),
                ..VnicsPage::default()
            }
        }
    };
    if let Ok((vnics, vlans)) = fetch_inventory(&state, &web).await {
        page.vnics = vnics;
        page.vlans = vlans;
    }
    Ok(page.render(&state, &web)?.into_response())
}

#[derive(Default)]
struct VnicsPage {
    vnics: Vec<String>,
    vlans: BTreeMap<String, String>,
    success: bool,
    vnic_name: String,
    vlan_name: String,
    error: String,
}

impl VnicsPage {
    fn render(
        &self,
        state: &AppState,
        web: &WebSession,
    ) -> Result<axum::response::Html<String>, PageError> {
        let mut context = Context::new();
        context.insert("vnics", &self.vnics);
        context.insert("vlans", &self.vlans);
        context.insert("ip", &web.host);
        context.insert("success", &self.success);
        context.insert("vnic_name", &self.vnic_name);
        context.insert("vlan_name", &self.vlan_name);
        context.insert("error", &self.error);
        render(state, "vnics.html", &context)
    }
}

async fn fetch_inventory(
    state: &AppState,
    web: &WebSession,
) -> Result<(Vec<String>, BTreeMap<String, String>), UcsError> {
    let session = UcsSession::login(&state.config, &web.host, &web.username, &web.password).await?;
    let vnics = session.list_vnic_templates().await?;
    let vlans = session.list_vlans().await?;
    session.logout().await?;
    Ok((vnics, vlans))
}

async fn bind(
    state: &AppState,
    web: &WebSession,
    vnic_name: &str,
    vlan_name: &str,
) -> Result<BindOutcome, UcsError> {
    let session = UcsSession::login(&state.config, &web.host, &web.username, &web.password).await?;
    let orgs = session.list_organizations().await?;
    let outcome = session.bind_vlan_to_vnic(vnic_name, vlan_name, &orgs).await;
    session.logout().await?;
    outcome
}
