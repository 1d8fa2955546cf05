//! Deployment environment tokens and their classification
//!
//! Environments form an open set: any lowercase alphanumeric token is a valid
//! [`Environment`]. Only [`KnownEnvironment`] tokens are on the allow-list,
//! and only production tokens classify as [`EnvironmentClass::Production`].

use crate::defaults::MAX_ENVIRONMENT_LEN;
use crate::error::ScopeError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Environments on the closed allow-list
///
/// Short aliases parse to the same variant but are distinct tokens when used
/// as an [`Environment`], so `prod` and `production` name different resources.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
pub enum KnownEnvironment {
    #[strum(serialize = "development", serialize = "dev")]
    Development,
    #[strum(serialize = "test")]
    Test,
    #[strum(serialize = "staging")]
    Staging,
    #[strum(serialize = "production", serialize = "prod")]
    Production,
}

/// Coarse classification driving lifecycle decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum EnvironmentClass {
    Production,
    NonProduction,
}

/// A validated environment token, e.g. `test` or `production`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Environment(String);

impl Environment {
    /// Validate and wrap an environment token
    ///
    /// Tokens must be 1-16 lowercase ASCII alphanumerics. The delimiter is
    /// not allowed because the environment is the trailing name segment.
    pub fn new(token: impl Into<String>) -> Result<Self, ScopeError> {
        let token = token.into();
        validate_environment_token(&token).map_err(ScopeError::InvalidConfig)?;
        Ok(Self(token))
    }

    /// Validate a token and require it to be on the allow-list
    pub fn new_known(token: impl Into<String>) -> Result<Self, ScopeError> {
        let env = Self::new(token)?;
        if env.known().is_none() {
            return Err(ScopeError::UnknownEnvironment(env.0));
        }
        Ok(env)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Allow-list entry for this token, if any
    pub fn known(&self) -> Option<KnownEnvironment> {
        self.0.parse().ok()
    }

    /// Classify this environment
    ///
    /// Unrecognized tokens are non-production. A typo such as `prodution`
    /// therefore never inherits production's retention guarantees.
    pub fn class(&self) -> EnvironmentClass {
        match self.known() {
            Some(KnownEnvironment::Production) => EnvironmentClass::Production,
            _ => EnvironmentClass::NonProduction,
        }
    }

    pub fn is_production(&self) -> bool {
        self.class() == EnvironmentClass::Production
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Environment {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for Environment {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn validate_environment_token(token: &str) -> Result<(), String> {
    if token.is_empty() {
        return Err("environment cannot be empty".to_string());
    }
    if token.len() > MAX_ENVIRONMENT_LEN {
        return Err(format!(
            "environment '{token}' exceeds {MAX_ENVIRONMENT_LEN} characters"
        ));
    }
    if let Some(bad) = token
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit()))
    {
        return Err(format!(
            "environment '{token}' contains forbidden character {bad:?} (allowed: a-z, 0-9)"
        ));
    }
    Ok(())
}
