//! Harness configuration from the environment

use crate::error::ConfigError;
use crate::model::Credentials;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Where to point the harness and which identities to use.
///
/// The admin email must be the one the service is configured to promote;
/// the service assigns `admin` by email at registration time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    pub base_url: String,
    pub admin: Credentials,
    pub regular: Credentials,
    /// A second plain user, used to exercise ownership checks
    pub other: Credentials,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            admin: Credentials::new("admin@lostandfound.com", "admin123456", "Admin User"),
            regular: Credentials::new("john.doe@example.com", "password123", "John Doe"),
            other: Credentials::new("jane.roe@example.com", "password456", "Jane Roe"),
        }
    }
}

impl HarnessConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to the defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let credentials = |prefix: &str, fallback: Credentials| Credentials {
            email: lookup(&format!("{prefix}_EMAIL")).unwrap_or(fallback.email),
            password: lookup(&format!("{prefix}_PASSWORD")).unwrap_or(fallback.password),
            name: lookup(&format!("{prefix}_NAME")).unwrap_or(fallback.name),
        };

        let config = Self {
            base_url: lookup("LOSTFOUND_BASE_URL").unwrap_or(defaults.base_url),
            admin: credentials("LOSTFOUND_ADMIN", defaults.admin),
            regular: credentials("LOSTFOUND_USER", defaults.regular),
            other: credentials("LOSTFOUND_OTHER", defaults.other),
        };
        config.validate()?;
        Ok(config)
    }

    /// Override the base URL, e.g. from a positional argument
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        self.base_url = base_url.to_string();
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::Empty {
                name: "LOSTFOUND_BASE_URL",
            });
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::InvalidBaseUrl(base_url.to_string()));
        }
        for (name, creds) in [
            ("LOSTFOUND_ADMIN_EMAIL", &self.admin),
            ("LOSTFOUND_USER_EMAIL", &self.regular),
            ("LOSTFOUND_OTHER_EMAIL", &self.other),
        ] {
            if creds.email.trim().is_empty() {
                return Err(ConfigError::Empty { name });
            }
        }
        Ok(())
    }
}
