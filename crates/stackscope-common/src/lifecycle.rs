//! Retention and durability decisions per environment
//!
//! # Unknown environments are disposable
//!
//! Any environment that is not a production token (`production` or `prod`)
//! takes the non-production branch: resources are destroyed with the stack
//! and point-in-time recovery is off. A misspelled production environment
//! therefore gets *no* retention. Validate environments against the
//! allow-list ([`NamingConfig::new_strict`]) before composing a stack if
//! that matters.

use crate::environment::EnvironmentClass;
use crate::naming_config::NamingConfig;
use serde::Serialize;
use tracing::warn;

/// What happens to a resource when its stack is deleted
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RemovalPolicy {
    Retain,
    Destroy,
}

/// Retention/durability posture for one environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LifecycleDecision {
    pub retain_on_delete: bool,
    pub point_in_time_recovery: bool,
}

impl LifecycleDecision {
    pub fn removal_policy(&self) -> RemovalPolicy {
        if self.retain_on_delete {
            RemovalPolicy::Retain
        } else {
            RemovalPolicy::Destroy
        }
    }
}

/// Maps an environment classification to a lifecycle decision
pub struct ResourceLifecyclePolicy;

impl ResourceLifecyclePolicy {
    /// Decide retention for resources of `config`'s environment.
    ///
    /// Total: production retains with PITR, everything else (including
    /// unknown tokens) is destroyed without PITR.
    pub fn decide(config: &NamingConfig) -> LifecycleDecision {
        let environment = config.environment();
        if environment.known().is_none() {
            warn!(
                environment = %environment,
                "Unrecognized environment; applying non-production lifecycle (resources are destroyed on delete)"
            );
        }
        Self::for_class(environment.class())
    }

    pub fn for_class(class: EnvironmentClass) -> LifecycleDecision {
        match class {
            EnvironmentClass::Production => LifecycleDecision {
                retain_on_delete: true,
                point_in_time_recovery: true,
            },
            EnvironmentClass::NonProduction => LifecycleDecision {
                retain_on_delete: false,
                point_in_time_recovery: false,
            },
        }
    }
}
