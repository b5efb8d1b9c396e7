//! Configuration loading and validation for the vault service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any variable is missing or invalid.

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;

use crate::crypto::KeySecret;

/// Deployment environment. Controls whether the development key fallback is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppEnv {
    Development,
    Production,
}

/// Validated vault service configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// `development` or `production`.
    #[serde(default = "default_app_env")]
    pub app_env: AppEnv,

    /// Secret the field key is derived from. **Required in production.**
    #[serde(default)]
    pub field_encryption_secret: Option<String>,

    /// Secret being rotated out. When set, `/fields/rotate` re-encrypts values
    /// from this key to the current one.
    #[serde(default)]
    pub field_encryption_previous_secret: Option<String>,

    /// Port the HTTP adapter listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Minimum age, in whole years, for birth-date eligibility checks.
    #[serde(default = "default_minimum_age_years")]
    pub minimum_age_years: u32,

    /// Optional OTLP endpoint for span export.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_app_env() -> AppEnv {
    AppEnv::Development
}
fn default_listen_port() -> u16 {
    8080
}
fn default_minimum_age_years() -> u32 {
    18
}
fn default_log_level() -> String {
    "info".into()
}

/// Ages above this are treated as a configuration mistake.
const MAX_MINIMUM_AGE_YEARS: u32 = 150;

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        match self.field_encryption_secret.as_deref() {
            None if self.app_env == AppEnv::Production => {
                anyhow::bail!("FIELD_ENCRYPTION_SECRET is required when APP_ENV=production");
            }
            Some(s) => ensure_non_empty(s, "FIELD_ENCRYPTION_SECRET")?,
            None => {}
        }
        if let Some(previous) = self.field_encryption_previous_secret.as_deref() {
            ensure_non_empty(previous, "FIELD_ENCRYPTION_PREVIOUS_SECRET")?;
            if Some(previous) == self.field_encryption_secret.as_deref() {
                anyhow::bail!(
                    "FIELD_ENCRYPTION_PREVIOUS_SECRET must differ from FIELD_ENCRYPTION_SECRET"
                );
            }
        }
        if self.listen_port == 0 {
            anyhow::bail!("LISTEN_PORT must be > 0");
        }
        if self.minimum_age_years == 0 || self.minimum_age_years > MAX_MINIMUM_AGE_YEARS {
            anyhow::bail!("MINIMUM_AGE_YEARS must be between 1 and {MAX_MINIMUM_AGE_YEARS}");
        }
        Ok(())
    }

    /// The secret for the current field key.
    ///
    /// Falls back to the development-only secret when none is configured;
    /// [`validate`](Self::validate) has already refused that in production.
    pub fn current_secret(&self) -> KeySecret {
        match &self.field_encryption_secret {
            Some(s) => KeySecret::configured(s.clone()),
            None => {
                warn!(
                    "FIELD_ENCRYPTION_SECRET not set; using the development-only fallback key. \
                     Values encrypted now must not be persisted beyond this session"
                );
                KeySecret::development_fallback()
            }
        }
    }

    /// The secret being rotated out, if any.
    pub fn previous_secret(&self) -> Option<KeySecret> {
        self.field_encryption_previous_secret
            .as_ref()
            .map(|s| KeySecret::configured(s.clone()))
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |s: &Option<String>| s.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("Config")
            .field("app_env", &self.app_env)
            .field("field_encryption_secret", &redact(&self.field_encryption_secret))
            .field(
                "field_encryption_previous_secret",
                &redact(&self.field_encryption_previous_secret),
            )
            .field("listen_port", &self.listen_port)
            .field("minimum_age_years", &self.minimum_age_years)
            .field("otel_exporter_otlp_endpoint", &self.otel_exporter_otlp_endpoint)
            .field("log_level", &self.log_level)
            .finish()
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} must not be empty");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KeyOrigin;

    fn base() -> Config {
        Config {
            app_env: AppEnv::Production,
            field_encryption_secret: Some("prod-secret".into()),
            field_encryption_previous_secret: None,
            listen_port: default_listen_port(),
            minimum_age_years: default_minimum_age_years(),
            otel_exporter_otlp_endpoint: None,
            log_level: default_log_level(),
        }
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_app_env(), AppEnv::Development);
        assert_eq!(default_listen_port(), 8080);
        assert_eq!(default_minimum_age_years(), 18);
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn validate_accepts_production_with_secret() {
        assert!(base().validate().is_ok());
    }

    #[test]
    fn validate_rejects_production_without_secret() {
        let cfg = Config {
            field_encryption_secret: None,
            ..base()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn development_without_secret_uses_flagged_fallback() {
        let cfg = Config {
            app_env: AppEnv::Development,
            field_encryption_secret: None,
            ..base()
        };
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.current_secret().origin(), KeyOrigin::DevelopmentFallback);
    }

    #[test]
    fn validate_rejects_blank_secret() {
        let cfg = Config {
            field_encryption_secret: Some("   ".into()),
            ..base()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_previous_equal_to_current() {
        let cfg = Config {
            field_encryption_previous_secret: Some("prod-secret".into()),
            ..base()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_minimum_age() {
        for age in [0, 151] {
            let cfg = Config {
                minimum_age_years: age,
                ..base()
            };
            assert!(cfg.validate().is_err());
        }
    }

    #[test]
    fn validate_rejects_zero_port() {
        let cfg = Config {
            listen_port: 0,
            ..base()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn debug_redacts_secrets() {
        let cfg = Config {
            field_encryption_previous_secret: Some("old-secret".into()),
            ..base()
        };
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("prod-secret"));
        assert!(!dbg.contains("old-secret"));
    }

    #[test]
    fn previous_secret_is_configured_origin() {
        let cfg = Config {
            field_encryption_previous_secret: Some("old".into()),
            ..base()
        };
        assert_eq!(
            cfg.previous_secret().map(|s| s.origin()),
            Some(KeyOrigin::Configured)
        );
    }
}
