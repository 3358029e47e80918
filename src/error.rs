use thiserror::Error;

/// Errors surfaced by the UCS management-plane client.
///
/// Read queries that match nothing are not errors: the inventory calls
/// return empty collections and `get_vnic_template` returns `None`.
#[derive(Error, Debug)]
pub enum UcsError {
    #[error("connection to UCS Manager failed: {0}")]
    ConnectionFailed(String),

    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("{0} not found")]
    ObjectNotFound(String),

    #[error("UCS Manager rejected the request (code {code}): {description}")]
    RemoteValidationRejected { code: String, description: String },

    #[error("malformed UCS Manager response: {0}")]
    Protocol(String),
}

impl From<reqwest::Error> for UcsError {
    fn from(err: reqwest::Error) -> Self {
        UcsError::ConnectionFailed(err.to_string())
    }
}

impl From<quick_xml::Error> for UcsError {
    fn from(err: quick_xml::Error) -> Self {
        UcsError::Protocol(err.to_string())
    }
}
