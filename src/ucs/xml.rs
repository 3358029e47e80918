//! UCS XML API request building and response parsing.
//!
//! The UCS Manager management plane speaks the UCS XML API: every call is
//! an HTTP POST of a single XML element to `/nuova`, and every response is
//! a single XML element whose attributes carry the result. Managed-object
//! payloads appear as nested elements whose tag is the object's class id
//! and whose attributes are the object's properties.

use std::collections::HashMap;

use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::UcsError;

/// Attribute map of a single managed object as it appears on the wire.
pub type AttrMap = HashMap<String, String>;

/// A parsed UCS XML API document: the root element's tag and attributes
/// plus every managed object found beneath it, tagged with its class id.
/// Requests and responses share this shape on the wire.
#[derive(Debug, Default)]
pub struct UcsResponse {
    pub tag: String,
    pub attrs: AttrMap,
    pub objects: Vec<(String, AttrMap)>,
}

impl UcsResponse {
    /// All managed objects of the given class id.
    pub fn objects_of_class<'a>(
        &'a self,
        class_id: &'a str,
    ) -> impl Iterator<Item = &'a AttrMap> + 'a {
        self.objects
            .iter()
            .filter(move |(tag, _)| tag == class_id)
            .map(|(_, attrs)| attrs)
    }
}

// --- Request builders ---

pub fn login_request(username: &str, password: &str) -> String {
    format!(
        r#"<aaaLogin inName="{}" inPassword="{}" />"#,
        escape(username),
        escape(password)
    )
}

pub fn logout_request(cookie: &str) -> String {
    format!(r#"<aaaLogout inCookie="{}" />"#, escape(cookie))
}

/// Query all managed objects of a class, optionally filtered to a single
/// relative name.
pub fn resolve_class_request(cookie: &str, class_id: &str, rn_filter: Option<&str>) -> String {
    match rn_filter {
        Some(rn) => format!(
            concat!(
                r#"<configResolveClass cookie="{}" classId="{}" inHierarchical="false">"#,
                r#"<inFilter><eq class="{}" property="rn" value="{}" /></inFilter>"#,
                r#"</configResolveClass>"#
            ),
            escape(cookie),
            escape(class_id),
            escape(class_id),
            escape(rn)
        ),
        None => format!(
            r#"<configResolveClass cookie="{}" classId="{}" inHierarchical="false" />"#,
            escape(cookie),
            escape(class_id)
        ),
    }
}

/// One `<pair>` of a `configConfMos` request: a managed object to create,
/// keyed by its distinguished name.
#[derive(Debug, Clone)]
pub struct ConfigPair {
    pub dn: String,
    pub class_id: String,
    pub attrs: Vec<(String, String)>,
}

impl ConfigPair {
    pub fn new(dn: impl Into<String>, class_id: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            class_id: class_id.into(),
            attrs: Vec::new(),
        }
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((key.into(), value.into()));
        self
    }
}

/// Build a `configConfMos` request. All pairs ride in one request, which is
/// the unit of atomicity the management plane offers.
pub fn config_conf_mos_request(cookie: &str, pairs: &[ConfigPair]) -> String {
    let mut body = format!(
        r#"<configConfMos cookie="{}" inHierarchical="false"><inConfigs>"#,
        escape(cookie)
    );
    for pair in pairs {
        body.push_str(&format!(r#"<pair key="{}">"#, escape(&pair.dn)));
        body.push('<');
        body.push_str(&pair.class_id);
        body.push_str(&format!(r#" dn="{}""#, escape(&pair.dn)));
        for (key, value) in &pair.attrs {
            body.push_str(&format!(r#" {}="{}""#, key, escape(value)));
        }
        body.push_str(" /></pair>");
    }
    body.push_str("</inConfigs></configConfMos>");
    body
}

// --- Response parsing ---

/// Parse a UCS XML API response into its root attributes and the managed
/// objects nested beneath it.
pub fn parse_response(body: &str) -> Result<UcsResponse, UcsError> {
    let mut reader = Reader::from_str(body);
    reader.trim_text(true);

    let mut response = UcsResponse::default();
    let mut seen_root = false;
    let mut depth: u32 = 0;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let tag = tag_name(e.name().as_ref())?;
                let attrs = collect_attrs(&e)?;
                record(&mut response, &mut seen_root, depth, tag, attrs);
                depth += 1;
            }
            Event::Empty(e) => {
                let tag = tag_name(e.name().as_ref())?;
                let attrs = collect_attrs(&e)?;
                record(&mut response, &mut seen_root, depth, tag, attrs);
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(UcsError::Protocol("empty response body".to_string()));
    }
    Ok(response)
}

/// Map a response's error attributes into the error taxonomy. UCS reports
/// failures in-band with HTTP 200, via `errorCode`/`errorDescr` on the
/// root element. Code 551/552 are the authentication failures.
pub fn check_error(response: &UcsResponse) -> Result<(), UcsError> {
    let Some(code) = response.attrs.get("errorCode") else {
        return Ok(());
    };
    let description = response
        .attrs
        .get("errorDescr")
        .cloned()
        .unwrap_or_else(|| "no description".to_string());
    if code == "551" || code == "552" {
        return Err(UcsError::AuthenticationFailed(description));
    }
    Err(UcsError::RemoteValidationRejected {
        code: code.clone(),
        description,
    })
}

fn record(
    response: &mut UcsResponse,
    seen_root: &mut bool,
    depth: u32,
    tag: String,
    attrs: AttrMap,
) {
    if depth == 0 {
        response.tag = tag;
        response.attrs = attrs;
        *seen_root = true;
    } else {
        response.objects.push((tag, attrs));
    }
}

fn tag_name(raw: &[u8]) -> Result<String, UcsError> {
    String::from_utf8(raw.to_vec())
        .map_err(|_| UcsError::Protocol("non-UTF-8 element name".to_string()))
}

fn collect_attrs(e: &quick_xml::events::BytesStart<'_>) -> Result<AttrMap, UcsError> {
    let mut attrs = AttrMap::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| UcsError::Protocol(err.to_string()))?;
        let key = tag_name(attr.key.as_ref())?;
        let value = attr.unescape_value()?.into_owned();
        attrs.insert(key, value);
    }
    Ok(attrs)
}
