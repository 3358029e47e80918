use std::env;

/// Config holds all application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub ucs_host: String,
    pub ucs_username: String,
    pub ucs_password: String,
    /// Opt-in compatibility shim for UCS domains running self-signed or
    /// legacy certificates. Off by default; certificates are verified.
    pub accept_invalid_certs: bool,
    pub request_timeout_secs: u64,
    pub session_ttl_secs: u64,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn load() -> Self {
        Self {
            listen_addr: get_env("LISTEN_ADDR", "0.0.0.0:8080"),
            ucs_host: get_env("UCS_HOST", ""),
            ucs_username: get_env("UCS_USERNAME", ""),
            ucs_password: get_env("UCS_PASSWORD", ""),
            accept_invalid_certs: get_env("UCS_ACCEPT_INVALID_CERTS", "false")
                .parse()
                .unwrap_or(false),
            request_timeout_secs: get_env("UCS_TIMEOUT_SECS", "30")
                .parse()
                .unwrap_or(30),
            session_ttl_secs: get_env("SESSION_TTL_SECS", "1800")
                .parse()
                .unwrap_or(1800),
        }
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
