//! In-process stand-in for a UCS Manager domain, speaking just enough of
//! the UCS XML API for the client and web tests: login/logout, class
//! resolution for the three object kinds, and configConfMos writes. Every
//! write is recorded so tests can assert on exactly what was committed.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::RwLock;

use ucsvlan::config::Config;
use ucsvlan::ucs::xml::{self, AttrMap};

pub const GOOD_PASSWORD: &str = "hunter2";

#[derive(Debug, Clone)]
pub struct RecordedWrite {
    pub class_id: String,
    pub dn: String,
    pub attrs: AttrMap,
}

#[derive(Default)]
pub struct MockDomain {
    pub vlans: Vec<(String, String)>,
    pub vnic_templates: Vec<AttrMap>,
    pub orgs: Vec<String>,
    pub writes: Vec<RecordedWrite>,
}

pub struct MockUcs {
    pub domain: RwLock<MockDomain>,
}

impl MockUcs {
    fn new() -> Self {
        Self {
            domain: RwLock::new(MockDomain {
                orgs: vec!["org-root".to_string()],
                ..MockDomain::default()
            }),
        }
    }

    pub async fn add_vlan(&self, name: &str, id: &str) {
        self.domain
            .write()
            .await
            .vlans
            .push((name.to_string(), id.to_string()));
    }

    pub async fn add_org(&self, dn: &str) {
        self.domain.write().await.orgs.push(dn.to_string());
    }

    /// Seed a vNIC template under the given org DN with a representative
    /// attribute set.
    pub async fn add_vnic_template(&self, org_dn: &str, name: &str) {
        let dn = format!("{}/lan-conn-templ-{}", org_dn, name);
        let attrs: AttrMap = [
            ("name", name),
            ("dn", dn.as_str()),
            ("identPoolName", "mac-pool-a"),
            ("qosPolicyName", "gold"),
            ("descr", "seeded template"),
            ("policyOwner", "local"),
            ("nwCtrlPolicyName", "default"),
            ("templType", "updating-template"),
            ("statsPolicyName", "default"),
            ("mtu", "9000"),
            ("pinToGroupName", ""),
            ("switchId", "A"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        self.domain.write().await.vnic_templates.push(attrs);
    }

    pub async fn recorded_writes(&self) -> Vec<RecordedWrite> {
        self.domain.read().await.writes.clone()
    }
}

/// Start a mock UCS endpoint on an ephemeral port. Returns the mock state
/// and the host URL to hand to the client.
pub async fn start_mock() -> (Arc<MockUcs>, String) {
    let mock = Arc::new(MockUcs::new());
    let app = Router::new()
        .route("/nuova", post(handle))
        .with_state(mock.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (mock, format!("http://127.0.0.1:{}", addr.port()))
}

/// Client configuration pointed at nothing in particular; hosts come from
/// `start_mock`.
pub fn test_config() -> Config {
    Config {
        listen_addr: "127.0.0.1:0".to_string(),
        ucs_host: String::new(),
        ucs_username: String::new(),
        ucs_password: String::new(),
        accept_invalid_certs: false,
        request_timeout_secs: 5,
        session_ttl_secs: 60,
    }
}

async fn handle(State(mock): State<Arc<MockUcs>>, body: String) -> String {
    let request = match xml::parse_response(&body) {
        Ok(req) => req,
        Err(_) => return error_response("unknown", "100", "malformed request"),
    };

    match request.tag.as_str() {
        "aaaLogin" => {
            let password = request.attrs.get("inPassword").cloned().unwrap_or_default();
            if password == GOOD_PASSWORD {
                r#"<aaaLogin response="yes" outCookie="mock-cookie" outRefreshPeriod="600" />"#
                    .to_string()
            } else {
                error_response("aaaLogin", "551", "Authentication failed")
            }
        }
        "aaaLogout" => r#"<aaaLogout response="yes" outStatus="success" />"#.to_string(),
        "configResolveClass" => resolve_class(&mock, &request).await,
        "configConfMos" => conf_mos(&mock, &request).await,
        other => error_response(other, "100", "unsupported method"),
    }
}

async fn resolve_class(mock: &MockUcs, request: &xml::UcsResponse) -> String {
    if !cookie_ok(request) {
        return error_response("configResolveClass", "552", "Session not found");
    }
    let class_id = request.attrs.get("classId").cloned().unwrap_or_default();
    let rn_filter = request
        .objects
        .iter()
        .find(|(tag, _)| tag == "eq")
        .and_then(|(_, attrs)| attrs.get("value").cloned());

    let domain = mock.domain.read().await;
    let mut out = String::new();
    match class_id.as_str() {
        "fabricVlan" => {
            for (name, id) in &domain.vlans {
                out.push_str(&mo_xml(
                    "fabricVlan",
                    &[
                        ("dn", &format!("fabric/lan/net-{}", name)),
                        ("name", name),
                        ("id", id),
                    ],
                ));
            }
        }
        "vnicLanConnTempl" => {
            for attrs in &domain.vnic_templates {
                if let Some(rn) = &rn_filter {
                    let dn = attrs.get("dn").cloned().unwrap_or_default();
                    if !dn.ends_with(rn.as_str()) {
                        continue;
                    }
                }
                let pairs: Vec<(&str, &str)> =
                    attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
                out.push_str(&mo_xml("vnicLanConnTempl", &pairs));
            }
        }
        "orgOrg" => {
            for dn in &domain.orgs {
                out.push_str(&mo_xml("orgOrg", &[("dn", dn)]));
            }
        }
        _ => {}
    }

    format!(
        r#"<configResolveClass response="yes" classId="{}"><outConfigs>{}</outConfigs></configResolveClass>"#,
        class_id, out
    )
}

async fn conf_mos(mock: &MockUcs, request: &xml::UcsResponse) -> String {
    if !cookie_ok(request) {
        return error_response("configConfMos", "552", "Session not found");
    }
    let mut domain = mock.domain.write().await;
    for (tag, attrs) in &request.objects {
        if tag == "pair" || tag == "inConfigs" {
            continue;
        }
        let dn = attrs.get("dn").cloned().unwrap_or_default();
        if tag == "fabricVlan" {
            let name = attrs.get("name").cloned().unwrap_or_default();
            let id = attrs.get("id").cloned().unwrap_or_default();
            if name.is_empty() || id.is_empty() {
                return error_response("configConfMos", "170", "missing naming property");
            }
            domain.vlans.push((name, id));
        }
        domain.writes.push(RecordedWrite {
            class_id: tag.clone(),
            dn,
            attrs: attrs.clone(),
        });
    }
    r#"<configConfMos response="yes"><outConfigs></outConfigs></configConfMos>"#.to_string()
}

fn cookie_ok(request: &xml::UcsResponse) -> bool {
    request
        .attrs
        .get("cookie")
        .map(|c| !c.is_empty())
        .unwrap_or(false)
}

fn mo_xml(class_id: &str, attrs: &[(&str, &str)]) -> String {
    let mut out = format!("<{}", class_id);
    for (key, value) in attrs {
        out.push_str(&format!(r#" {}="{}""#, key, quick_xml::escape::escape(value)));
    }
    out.push_str(" />");
    out
}

fn error_response(tag: &str, code: &str, descr: &str) -> String {
    format!(
        r#"<{} response="yes" errorCode="{}" errorDescr="{}" />"#,
        tag, code, descr
    )
}
