//! Builder for environment-conditioned permission statements

use super::actions::{AccessLevel, ActionSet};
use super::statement::{Exemption, PolicyStatement, TagCondition};
use crate::arn::AccountScope;
use stackscope_common::{NamingConfig, ResourceKind, ResourceNamer, ScopeError};
use tracing::debug;

/// Builds statements scoped to one naming config's environment
///
/// Every statement from [`scoped_policy`](Self::scoped_policy) carries
/// `aws:ResourceTag/Environment == <environment>`. The only way to get an
/// unconditioned statement is [`exempt_policy`](Self::exempt_policy), which
/// requires an [`Exemption`] and refuses environment-sensitive actions.
#[derive(Debug, Clone)]
pub struct AccessPolicyBuilder<'a> {
    config: &'a NamingConfig,
}

impl<'a> AccessPolicyBuilder<'a> {
    pub fn new(config: &'a NamingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NamingConfig {
        self.config
    }

    /// Grant `actions` on `resource_pattern`, conditioned on the resource's
    /// Environment tag matching this config's environment
    pub fn scoped_policy(
        &self,
        actions: ActionSet,
        resource_pattern: impl Into<String>,
    ) -> Result<PolicyStatement, ScopeError> {
        if actions.is_empty() {
            return Err(ScopeError::EmptyActionSet);
        }
        let resource_pattern = resource_pattern.into();
        debug!(
            environment = %self.config.environment(),
            resource_pattern = %resource_pattern,
            actions = actions.len(),
            "Building scoped statement"
        );
        Ok(PolicyStatement::conditioned(
            actions,
            resource_pattern,
            TagCondition::environment(self.config.environment()),
        ))
    }

    /// Grant environment-agnostic `actions` without a condition
    ///
    /// Fails with [`ScopeError::MissingCondition`] if any action is
    /// environment-sensitive (including any action not on the agnostic
    /// allow-list).
    pub fn exempt_policy(
        &self,
        actions: ActionSet,
        resource_pattern: impl Into<String>,
        exemption: Exemption,
    ) -> Result<PolicyStatement, ScopeError> {
        if actions.is_empty() {
            return Err(ScopeError::EmptyActionSet);
        }
        let sensitive = actions.sensitive_actions();
        if !sensitive.is_empty() {
            return Err(ScopeError::MissingCondition {
                sensitive_actions: sensitive.iter().map(ToString::to_string).collect(),
            });
        }
        let resource_pattern = resource_pattern.into();
        debug!(
            resource_pattern = %resource_pattern,
            reason = exemption.reason(),
            "Building exempt statement"
        );
        Ok(PolicyStatement::exempt(actions, resource_pattern, exemption))
    }

    /// Scoped grant of `access` on resources of `kind`
    ///
    /// With no base names the grant covers the whole suffix family
    /// (`{app}-{namespace}-*-{env}`); otherwise one statement per distinct
    /// resource ARN. Kinds addressed by generated IDs share one ARN, so
    /// several base names may collapse into a single statement.
    pub fn grant(
        &self,
        kind: ResourceKind,
        access: AccessLevel,
        base_names: &[&str],
        scope: &AccountScope,
    ) -> Result<Vec<PolicyStatement>, ScopeError> {
        if base_names.is_empty() {
            let pattern = ResourceNamer::name_pattern(self.config, kind);
            let statement = self.scoped_policy(access.actions(kind), scope.resource_arn(kind, &pattern))?;
            return Ok(vec![statement]);
        }

        let mut statements: Vec<PolicyStatement> = Vec::with_capacity(base_names.len());
        for base in base_names {
            let name = ResourceNamer::physical_name(self.config, kind, base)?;
            let arn = scope.resource_arn(kind, name.as_str());
            if statements.iter().any(|s| s.resource_pattern() == arn) {
                debug!(%kind, base_name = %base, arn = %arn, "Resource already granted");
                continue;
            }
            statements.push(self.scoped_policy(access.actions(kind), arn)?);
        }
        Ok(statements)
    }
}
