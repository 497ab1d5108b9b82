//! Configuration module for environment variable parsing.
//!
//! Everything is read once at startup into an immutable [`Config`] that is
//! shared with the gates and handlers through `AppState`.

use std::env;
use std::path::PathBuf;

use tracing::warn;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 3001;

/// Default SendGrid API base URL.
pub const DEFAULT_SENDGRID_API_URL: &str = "https://api.sendgrid.com";

/// A configured set of permitted values, or a wildcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Allowlist {
    /// `*` was configured: everything is permitted.
    Any,
    /// Only the listed values are permitted.
    Only(Vec<String>),
}

impl Allowlist {
    /// Parse a comma-separated list. A `*` entry anywhere makes it a wildcard.
    pub fn parse(raw: &str) -> Self {
        let entries: Vec<String> = raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if entries.iter().any(|e| e == "*") {
            Allowlist::Any
        } else {
            Allowlist::Only(entries)
        }
    }

    /// Whether `value` is permitted.
    pub fn permits(&self, value: &str) -> bool {
        match self {
            Allowlist::Any => true,
            Allowlist::Only(entries) => entries.iter().any(|e| e == value),
        }
    }

    /// True for an `Only` list with no entries.
    pub fn is_empty(&self) -> bool {
        matches!(self, Allowlist::Only(entries) if entries.is_empty())
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Origins allowed to call the API from a browser
    pub allowed_origins: Allowlist,

    /// One reverse-proxy hop in front of the server. The IP gate reads
    /// `X-Forwarded-For` whenever it is present, so this is informational.
    pub trust_proxy: bool,

    /// Caller addresses allowed through the IP gate (empty disables the gate)
    pub allowed_ips: Allowlist,

    /// SendGrid API key
    pub sendgrid_api_key: Option<String>,

    /// SendGrid API base URL
    pub sendgrid_api_url: String,

    /// Operator address receiving contact notifications
    pub to_email: Option<String>,

    /// Sender address for both outbound messages (falls back to `to_email`)
    pub from_email: Option<String>,

    /// OpenAPI document overriding the bundled one
    pub docs_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let first_of = |names: &[&str]| names.iter().find_map(|name| var(*name));

        let port = match var("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(env_var = "PORT", value = %raw, "Invalid port, using default");
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let allowed_origins = first_of(&[
            "ALLOWED_CLIENTS_ORIGIN",
            "allowed_clients_origin",
            "FRONTEND_ORIGIN",
        ])
        .map(|raw| Allowlist::parse(&raw))
        .unwrap_or(Allowlist::Any);

        let allowed_ips = first_of(&["ALLOWED_CLIENTS_IP", "allowed_clients_ip"])
            .map(|raw| Allowlist::parse(&raw))
            .unwrap_or_else(|| Allowlist::Only(Vec::new()));

        let to_email = var("TO_EMAIL");
        let from_email = var("FROM_EMAIL").or_else(|| to_email.clone());

        Config {
            port,
            allowed_origins,
            trust_proxy: lookup("TRUST_PROXY").as_deref() != Some("false"),
            allowed_ips,
            sendgrid_api_key: var("SENDGRID_API_KEY"),
            sendgrid_api_url: var("SENDGRID_API_URL")
                .unwrap_or_else(|| DEFAULT_SENDGRID_API_URL.to_string()),
            to_email,
            from_email,
            docs_path: var("DOCS_SPEC_PATH").map(PathBuf::from),
        }
    }

    /// Operator and sender addresses, if both the credential and the
    /// operator address are configured.
    pub fn mail_route(&self) -> Option<(&str, &str)> {
        self.sendgrid_api_key.as_ref()?;
        let to = self.to_email.as_deref()?;
        let from = self.from_email.as_deref().unwrap_or(to);
        Some((to, from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_with(&[]);
        assert_eq!(config.port, 3001);
        assert_eq!(config.allowed_origins, Allowlist::Any);
        assert!(config.allowed_ips.is_empty());
        assert!(config.trust_proxy);
        assert_eq!(config.sendgrid_api_url, "https://api.sendgrid.com");
        assert!(config.docs_path.is_none());
        assert!(config.mail_route().is_none());
    }

    #[test]
    fn test_docs_path_override() {
        let config = config_with(&[("DOCS_SPEC_PATH", "/srv/api/openapi.yaml")]);
        assert_eq!(config.docs_path, Some(PathBuf::from("/srv/api/openapi.yaml")));
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let config = config_with(&[("PORT", "not-a-port")]);
        assert_eq!(config.port, 3001);
        let config = config_with(&[("PORT", "8080")]);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_origin_fallback_chain() {
        let config = config_with(&[("FRONTEND_ORIGIN", "https://site.example")]);
        assert_eq!(
            config.allowed_origins,
            Allowlist::Only(vec!["https://site.example".to_string()])
        );

        let config = config_with(&[
            ("ALLOWED_CLIENTS_ORIGIN", "https://a.example, https://b.example"),
            ("FRONTEND_ORIGIN", "https://site.example"),
        ]);
        assert_eq!(
            config.allowed_origins,
            Allowlist::Only(vec![
                "https://a.example".to_string(),
                "https://b.example".to_string()
            ])
        );
    }

    #[test]
    fn test_ip_allowlist_parsing() {
        let config = config_with(&[("ALLOWED_CLIENTS_IP", " * ")]);
        assert_eq!(config.allowed_ips, Allowlist::Any);

        let config = config_with(&[("allowed_clients_ip", "10.0.0.1,, 10.0.0.2")]);
        assert_eq!(
            config.allowed_ips,
            Allowlist::Only(vec!["10.0.0.1".to_string(), "10.0.0.2".to_string()])
        );

        let config = config_with(&[("ALLOWED_CLIENTS_IP", "")]);
        assert!(config.allowed_ips.is_empty());
    }

    #[test]
    fn test_trust_proxy_only_disabled_by_literal_false() {
        assert!(!config_with(&[("TRUST_PROXY", "false")]).trust_proxy);
        assert!(config_with(&[("TRUST_PROXY", "0")]).trust_proxy);
        assert!(config_with(&[("TRUST_PROXY", "FALSE")]).trust_proxy);
    }

    #[test]
    fn test_from_email_defaults_to_to_email() {
        let config = config_with(&[
            ("SENDGRID_API_KEY", "SG.key"),
            ("TO_EMAIL", "ops@example.com"),
        ]);
        assert_eq!(config.from_email.as_deref(), Some("ops@example.com"));
        assert_eq!(
            config.mail_route(),
            Some(("ops@example.com", "ops@example.com"))
        );

        let config = config_with(&[
            ("SENDGRID_API_KEY", "SG.key"),
            ("TO_EMAIL", "ops@example.com"),
            ("FROM_EMAIL", "noreply@example.com"),
        ]);
        assert_eq!(
            config.mail_route(),
            Some(("ops@example.com", "noreply@example.com"))
        );
    }

    #[test]
    fn test_mail_route_requires_api_key() {
        let config = config_with(&[("TO_EMAIL", "ops@example.com")]);
        assert!(config.mail_route().is_none());
    }

    #[test]
    fn test_allowlist_permits() {
        let list = Allowlist::parse("a, b");
        assert!(list.permits("a"));
        assert!(list.permits("b"));
        assert!(!list.permits("c"));
        assert!(Allowlist::parse("a,*").permits("anything"));
    }
}
