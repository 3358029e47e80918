//! UCS Manager client: an authenticated session plus the handful of
//! inventory and configuration operations this tool needs.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::Client;

use crate::config::Config;
use crate::error::UcsError;

use super::types::*;
use super::xml::{self, AttrMap, ConfigPair};

/// An authenticated session against a UCS Manager domain.
///
/// Holds the HTTP client, endpoint URL, and the session cookie issued by
/// `aaaLogin`. Call [`UcsSession::logout`] when done; the remote side
/// otherwise keeps the session alive until it times out.
#[derive(Debug)]
pub struct UcsSession {
    http: Client,
    endpoint: String,
    cookie: String,
}

/// Result of a bind attempt. A missing template is an expected outcome,
/// not an error: no write is performed and the caller reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindOutcome {
    Bound { organization: String },
    TemplateNotFound,
}

impl UcsSession {
    /// Log in to a UCS Manager domain and return an authenticated session.
    pub async fn login(
        config: &Config,
        host: &str,
        username: &str,
        password: &str,
    ) -> Result<Self, UcsError> {
        let mut builder = Client::builder().timeout(Duration::from_secs(config.request_timeout_secs));
        if config.accept_invalid_certs {
            tracing::warn!("TLS certificate verification disabled (UCS_ACCEPT_INVALID_CERTS)");
            builder = builder.danger_accept_invalid_certs(true);
        }
        let http = builder
            .build()
            .map_err(|e| UcsError::ConnectionFailed(format!("failed to build HTTP client: {}", e)))?;

        let endpoint = endpoint_for(host);
        let response = post(&http, &endpoint, xml::login_request(username, password)).await?;
        xml::check_error(&response)?;

        let cookie = response
            .attrs
            .get("outCookie")
            .filter(|c| !c.is_empty())
            .cloned()
            .ok_or_else(|| UcsError::Protocol("login response missing outCookie".to_string()))?;

        tracing::debug!(host, username, "logged in to UCS Manager");
        Ok(Self {
            http,
            endpoint,
            cookie,
        })
    }

    /// End the session. Consumes the session; the cookie is invalid after
    /// this returns.
    pub async fn logout(self) -> Result<(), UcsError> {
        let response = post(&self.http, &self.endpoint, xml::logout_request(&self.cookie)).await?;
        xml::check_error(&response)?;
        tracing::debug!("logged out of UCS Manager");
        Ok(())
    }

    // --- Inventory ---

    /// All VLAN definitions as a name -> id mapping. Duplicate names keep
    /// the last record returned, matching UCS listing behavior. An empty
    /// domain yields an empty map, not an error.
    pub async fn list_vlans(&self) -> Result<BTreeMap<String, String>, UcsError> {
        let objects = self.resolve_class(CLASS_FABRIC_VLAN, None).await?;
        let mut vlans = BTreeMap::new();
        for vlan in objects.iter().filter_map(FabricVlan::from_attrs) {
            vlans.insert(vlan.name, vlan.id);
        }
        Ok(vlans)
    }

    /// Names of all vNIC LAN connectivity templates.
    pub async fn list_vnic_templates(&self) -> Result<Vec<String>, UcsError> {
        let objects = self.resolve_class(CLASS_VNIC_LAN_CONN_TEMPL, None).await?;
        Ok(objects
            .iter()
            .filter_map(|attrs| attrs.get("name").cloned())
            .collect())
    }

    /// Distinguished names of all organizations, excluding the root org.
    pub async fn list_organizations(&self) -> Result<Vec<String>, UcsError> {
        let objects = self.resolve_class(CLASS_ORG, None).await?;
        Ok(objects
            .iter()
            .filter_map(Organization::from_attrs)
            .map(|org| org.dn)
            .filter(|dn| dn != ORG_ROOT_DN)
            .collect())
    }

    /// Look up a single vNIC template by name. `None` when absent.
    pub async fn get_vnic_template(&self, name: &str) -> Result<Option<VnicTemplate>, UcsError> {
        let rn = format!("{}{}", VNIC_TEMPL_RN_PREFIX, name);
        let objects = self
            .resolve_class(CLASS_VNIC_LAN_CONN_TEMPL, Some(&rn))
            .await?;
        Ok(objects.iter().filter_map(VnicTemplate::from_attrs).next())
    }

    // --- Configuration ---

    /// Create a VLAN under the fabric LAN root. No client-side duplicate
    /// check: the management plane's own validation is the only guard, and
    /// a rejection surfaces as `RemoteValidationRejected`.
    pub async fn create_vlan(&self, name: &str, id: &str) -> Result<(), UcsError> {
        let dn = format!("{}/net-{}", FABRIC_LAN_DN, name);
        let pair = ConfigPair::new(dn, CLASS_FABRIC_VLAN)
            .attr("name", name)
            .attr("id", id)
            .attr("defaultNet", "no")
            .attr("pubNwName", "")
            .attr("policyOwner", "local")
            .attr("compressionType", "included")
            .attr("sharing", "none")
            .attr("mcastPolicyName", "");
        self.commit(&[pair]).await?;
        tracing::info!(vlan = name, id, "created VLAN");
        Ok(())
    }

    /// Attach a VLAN to a vNIC template.
    ///
    /// Re-creates the named template from its full attribute set under its
    /// owning organization, with a child Ethernet interface named after
    /// the VLAN. Both objects ride in one request, so the management plane
    /// applies them atomically. A missing template performs no write.
    pub async fn bind_vlan_to_vnic(
        &self,
        vnic_template_name: &str,
        vlan_name: &str,
        known_orgs: &[String],
    ) -> Result<BindOutcome, UcsError> {
        let Some(template) = self.get_vnic_template(vnic_template_name).await? else {
            tracing::warn!(
                template = vnic_template_name,
                "vNIC template not found, skipping bind"
            );
            return Ok(BindOutcome::TemplateNotFound);
        };

        let organization = resolve_organization(known_orgs, &template.dn).to_string();
        let template_dn = format!(
            "{}/{}{}",
            organization, VNIC_TEMPL_RN_PREFIX, template.name
        );
        let if_dn = format!("{}/if-{}", template_dn, vlan_name);

        let template_pair = ConfigPair::new(template_dn, CLASS_VNIC_LAN_CONN_TEMPL)
            .attr("identPoolName", template.ident_pool_name.as_str())
            .attr("qosPolicyName", template.qos_policy_name.as_str())
            .attr("descr", template.descr.as_str())
            .attr("policyOwner", template.policy_owner.as_str())
            .attr("nwCtrlPolicyName", template.nw_ctrl_policy_name.as_str())
            .attr("templType", template.templ_type.as_str())
            .attr("statsPolicyName", template.stats_policy_name.as_str())
            .attr("mtu", template.mtu.as_str())
            .attr("pinToGroupName", template.pin_to_group_name.as_str())
            .attr("switchId", template.switch_id.as_str());
        let if_pair = ConfigPair::new(if_dn, CLASS_VNIC_ETHER_IF)
            .attr("name", vlan_name)
            .attr("defaultNet", "no");

        self.commit(&[template_pair, if_pair]).await?;
        tracing::info!(
            vlan = vlan_name,
            template = vnic_template_name,
            org = %organization,
            "bound VLAN to vNIC template"
        );
        Ok(BindOutcome::Bound { organization })
    }

    // --- Wire helpers ---

    async fn resolve_class(
        &self,
        class_id: &str,
        rn_filter: Option<&str>,
    ) -> Result<Vec<AttrMap>, UcsError> {
        let request = xml::resolve_class_request(&self.cookie, class_id, rn_filter);
        let response = post(&self.http, &self.endpoint, request).await?;
        xml::check_error(&response)?;
        Ok(response.objects_of_class(class_id).cloned().collect())
    }

    async fn commit(&self, pairs: &[ConfigPair]) -> Result<(), UcsError> {
        let request = xml::config_conf_mos_request(&self.cookie, pairs);
        let response = post(&self.http, &self.endpoint, request).await?;
        xml::check_error(&response)
    }
}

async fn post(http: &Client, endpoint: &str, body: String) -> Result<xml::UcsResponse, UcsError> {
    let response = http
        .post(endpoint)
        .header(reqwest::header::CONTENT_TYPE, "text/xml")
        .body(body)
        .send()
        .await?;
    let status = response.status();
    if !status.is_success() {
        return Err(UcsError::ConnectionFailed(format!(
            "management endpoint returned HTTP {}",
            status
        )));
    }
    xml::parse_response(&response.text().await?)
}

/// Endpoint URL for a UCS host. A host carrying an explicit scheme is used
/// as-is, which is how lab proxies and plain-HTTP test doubles are reached;
/// anything else is assumed to be an HTTPS UCS Manager.
fn endpoint_for(host: &str) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        format!("{}/nuova", host.trim_end_matches('/'))
    } else {
        format!("https://{}/nuova", host)
    }
}

/// Resolve which organization owns a template, by longest substring match
/// of the known org DNs against the template DN. Falls back to the root
/// org only when nothing matches.
pub fn resolve_organization<'a>(known_orgs: &'a [String], template_dn: &str) -> &'a str {
    known_orgs
        .iter()
        .filter(|org| template_dn.contains(org.as_str()))
        .max_by_key(|org| org.len())
        .map(String::as_str)
        .unwrap_or(ORG_ROOT_DN)
}
