//! Naming configuration for one deployment invocation
//!
//! A [`NamingConfig`] is built once, validated with `garde`, and then passed
//! by reference to every naming, tagging and policy call. There is no global
//! instance, so several environments can be composed in one process.

use crate::defaults::{MAX_APP_IDENTITY_LEN, NAME_DELIMITER};
use crate::environment::Environment;
use crate::error::ScopeError;
use garde::Validate;
use serde::Serialize;
use std::fmt;

/// Application identity plus target environment
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Validate)]
pub struct NamingConfig {
    /// Application identity, e.g. "appre"
    #[garde(custom(validate_app_identity))]
    app_identity: String,

    /// Target environment (validated on construction)
    #[garde(skip)]
    environment: Environment,
}

impl NamingConfig {
    /// Build a config from raw tokens, accepting any well-formed environment
    pub fn new(app_identity: impl Into<String>, environment: &str) -> Result<Self, ScopeError> {
        Self::from_parts(app_identity.into(), Environment::new(environment)?)
    }

    /// Build a config, rejecting environments outside the allow-list
    pub fn new_strict(
        app_identity: impl Into<String>,
        environment: &str,
    ) -> Result<Self, ScopeError> {
        Self::from_parts(app_identity.into(), Environment::new_known(environment)?)
    }

    /// Build a config from an already-validated environment
    pub fn from_parts(app_identity: String, environment: Environment) -> Result<Self, ScopeError> {
        let config = Self {
            app_identity,
            environment,
        };
        config
            .validate()
            .map_err(|report| ScopeError::InvalidConfig(report.to_string()))?;
        Ok(config)
    }

    pub fn app_identity(&self) -> &str {
        &self.app_identity
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Fail unless `other` belongs to the same environment as this config
    pub fn ensure_environment(
        &self,
        other: &Environment,
        context: &'static str,
    ) -> Result<(), ScopeError> {
        if &self.environment != other {
            return Err(ScopeError::EnvironmentMismatch {
                context,
                expected: self.environment.to_string(),
                found: other.to_string(),
            });
        }
        Ok(())
    }

    /// Fail unless `other` is the same application and environment
    ///
    /// An environment difference is reported as for
    /// [`ensure_environment`](Self::ensure_environment); an application
    /// difference reports both configs as `app/environment`.
    pub fn ensure_same_config(
        &self,
        other: &NamingConfig,
        context: &'static str,
    ) -> Result<(), ScopeError> {
        self.ensure_environment(&other.environment, context)?;
        if self.app_identity != other.app_identity {
            return Err(ScopeError::EnvironmentMismatch {
                context,
                expected: self.to_string(),
                found: other.to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for NamingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.app_identity, self.environment)
    }
}

/// App identities are lowercase, hyphen-safe tokens: `[a-z0-9-]`, starting and
/// ending with an alphanumeric, no consecutive hyphens.
fn validate_app_identity(value: &str, _ctx: &()) -> garde::Result {
    if value.is_empty() {
        return Err(garde::Error::new("app identity cannot be empty"));
    }
    if value.len() > MAX_APP_IDENTITY_LEN {
        return Err(garde::Error::new(format!(
            "app identity exceeds {MAX_APP_IDENTITY_LEN} characters"
        )));
    }
    if let Some(bad) = value
        .chars()
        .find(|&c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || c == NAME_DELIMITER))
    {
        return Err(garde::Error::new(format!(
            "app identity contains forbidden character {bad:?} (allowed: a-z, 0-9, '-')"
        )));
    }
    if value.starts_with(NAME_DELIMITER) || value.ends_with(NAME_DELIMITER) {
        return Err(garde::Error::new(
            "app identity must start and end with a letter or digit",
        ));
    }
    if value.contains("--") {
        return Err(garde::Error::new("app identity cannot contain '--'"));
    }
    Ok(())
}
