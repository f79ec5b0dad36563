use secrecy::SecretString;

pub const DEFAULT_DOMAIN: &str = "aws.us.pangea.cloud";

#[derive(Clone, Debug)]
pub struct AuditConfig {
    pub token: SecretString,
    pub domain: String,
    pub config_id: Option<String>,
    pub log_missing_parent: bool,
}

impl AuditConfig {
    pub fn new(token: SecretString) -> Self {
        Self {
            token,
            domain: DEFAULT_DOMAIN.to_string(),
            config_id: None,
            log_missing_parent: false,
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn with_config_id(mut self, config_id: Option<String>) -> Self {
        self.config_id = config_id;
        self
    }

    pub fn with_log_missing_parent(mut self, log_missing_parent: bool) -> Self {
        self.log_missing_parent = log_missing_parent;
        self
    }

    /// Service base URL. A domain that already carries a scheme is used as is.
    pub fn base_url(&self) -> String {
        let domain = self.domain.trim().trim_end_matches('/');
        if domain.starts_with("http://") || domain.starts_with("https://") {
            domain.to_string()
        } else {
            format!("https://audit.{domain}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> SecretString {
        SecretString::new("t".to_string())
    }

    #[test]
    fn default_domain_resolves_to_audit_host() {
        let config = AuditConfig::new(token());
        assert_eq!(config.base_url(), "https://audit.aws.us.pangea.cloud");
    }

    #[test]
    fn explicit_scheme_is_kept() {
        let config = AuditConfig::new(token()).with_domain("http://127.0.0.1:8080/");
        assert_eq!(config.base_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn debug_output_redacts_token() {
        let config = AuditConfig::new(SecretString::new("pts_supersecret".to_string()));
        assert!(!format!("{config:?}").contains("pts_supersecret"));
    }
}
