//! Typed views of the UCS managed objects this tool works with.

use super::xml::AttrMap;

pub const CLASS_FABRIC_VLAN: &str = "fabricVlan";
pub const CLASS_VNIC_LAN_CONN_TEMPL: &str = "vnicLanConnTempl";
pub const CLASS_VNIC_ETHER_IF: &str = "vnicEtherIf";
pub const CLASS_ORG: &str = "orgOrg";

/// Fixed parent path under which VLAN definitions live.
pub const FABRIC_LAN_DN: &str = "fabric/lan";
/// The root organization, excluded from org listings.
pub const ORG_ROOT_DN: &str = "org-root";
/// Relative-name prefix of vNIC LAN connectivity templates.
pub const VNIC_TEMPL_RN_PREFIX: &str = "lan-conn-templ-";

/// A named VLAN definition under the fabric LAN root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FabricVlan {
    pub name: String,
    pub id: String,
}

impl FabricVlan {
    pub fn from_attrs(attrs: &AttrMap) -> Option<Self> {
        Some(Self {
            name: attrs.get("name")?.clone(),
            id: attrs.get("id")?.clone(),
        })
    }
}

/// A vNIC LAN connectivity template. Binding a VLAN re-creates the
/// template from this full attribute set plus a child Ethernet interface,
/// so every field here is copied onto the wire verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VnicTemplate {
    pub name: String,
    pub dn: String,
    pub ident_pool_name: String,
    pub qos_policy_name: String,
    pub descr: String,
    pub policy_owner: String,
    pub nw_ctrl_policy_name: String,
    pub templ_type: String,
    pub stats_policy_name: String,
    pub mtu: String,
    pub pin_to_group_name: String,
    pub switch_id: String,
}

impl VnicTemplate {
    pub fn from_attrs(attrs: &AttrMap) -> Option<Self> {
        let get = |key: &str| attrs.get(key).cloned().unwrap_or_default();
        Some(Self {
            name: attrs.get("name")?.clone(),
            dn: attrs.get("dn")?.clone(),
            ident_pool_name: get("identPoolName"),
            qos_policy_name: get("qosPolicyName"),
            descr: get("descr"),
            policy_owner: get("policyOwner"),
            nw_ctrl_policy_name: get("nwCtrlPolicyName"),
            templ_type: get("templType"),
            stats_policy_name: get("statsPolicyName"),
            mtu: get("mtu"),
            pin_to_group_name: get("pinToGroupName"),
            switch_id: get("switchId"),
        })
    }
}

/// An organizational unit, identified only by its distinguished name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Organization {
    pub dn: String,
}

impl Organization {
    pub fn from_attrs(attrs: &AttrMap) -> Option<Self> {
        Some(Self {
            dn: attrs.get("dn")?.clone(),
        })
    }
}
