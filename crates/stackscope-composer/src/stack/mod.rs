//! Stack composition
//!
//! [`StackComposer`] turns an environment-agnostic [`StackSpec`] into a
//! [`StackDefinition`] for one naming config. Every name goes through
//! [`ResourceNamer`](stackscope_common::ResourceNamer), every resource gets
//! the same [`TagSet`], and every function policy goes through
//! [`AccessPolicyBuilder`], so nothing in the output can address another
//! environment.

pub mod definition;

pub use definition::{
    DeadLetterDefinition, Durability, FunctionDefinition, IdentityStoreDefinition,
    QueueDefinition, ResourceDefinition, StackDefinition, TableDefinition, TemplateDefinition,
};

use crate::arn::AccountScope;
use crate::config::{FunctionSpec, GrantSpec, StackSpec};
use crate::policy::{AccessPolicyBuilder, Exemption, PolicyDocument, PolicyStatement};
use stackscope_common::defaults::{DEAD_LETTER_SUFFIX, ENV_APP_NAME, ENV_ENVIRONMENT};
use stackscope_common::{
    NamingConfig, ResourceKind, ResourceLifecyclePolicy, ResourceResolver,
    ScopeError, TagSet, TagSpec,
};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Physical names of every declared resource, keyed by kind
struct Registry {
    resolvers: BTreeMap<ResourceKind, ResourceResolver>,
}

impl Registry {
    fn new(config: &NamingConfig, spec: &StackSpec) -> Result<Self, ScopeError> {
        let queue_names: Vec<String> = spec
            .queues
            .iter()
            .flat_map(|q| {
                let dlq = q
                    .dead_letter
                    .then(|| format!("{}{DEAD_LETTER_SUFFIX}", q.name));
                std::iter::once(q.name.clone()).chain(dlq)
            })
            .collect();

        let declared: [(ResourceKind, Vec<&str>); 5] = [
            (ResourceKind::Table, spec.tables.iter().map(|t| t.name.as_str()).collect()),
            (ResourceKind::Queue, queue_names.iter().map(String::as_str).collect()),
            (ResourceKind::Template, spec.templates.iter().map(|t| t.name.as_str()).collect()),
            (
                ResourceKind::IdentityStore,
                spec.identity_stores.iter().map(|i| i.name.as_str()).collect(),
            ),
            (ResourceKind::Function, spec.functions.iter().map(|f| f.name.as_str()).collect()),
        ];

        let mut resolvers = BTreeMap::new();
        for (kind, names) in declared {
            resolvers.insert(kind, ResourceResolver::new(config, kind, names)?);
        }
        Ok(Self { resolvers })
    }

    fn resolver(&self, kind: ResourceKind) -> Result<&ResourceResolver, ScopeError> {
        // Every kind is registered in `new`
        self.resolvers.get(&kind).ok_or_else(|| ScopeError::UnknownResource {
            kind,
            base_name: String::new(),
            available: Vec::new(),
        })
    }
}

/// Composes stack definitions for one application/environment
pub struct StackComposer<'a> {
    config: &'a NamingConfig,
    scope: AccountScope,
}

impl<'a> StackComposer<'a> {
    pub fn new(config: &'a NamingConfig, scope: AccountScope) -> Self {
        Self { config, scope }
    }

    /// Derive names, tags, durability and policies for every resource in
    /// `spec`
    ///
    /// Output keeps declaration order. Fails on the first invalid base name,
    /// duplicate declaration, unknown grant target or tag problem.
    pub fn compose(&self, spec: &StackSpec) -> Result<StackDefinition, ScopeError> {
        info!(
            app_identity = %self.config.app_identity(),
            environment = %self.config.environment(),
            resources = spec.resource_count(),
            "Composing stack"
        );

        let registry = Registry::new(self.config, spec)?;
        let tags = stack_tags(self.config, spec)?;
        let lifecycle = ResourceLifecyclePolicy::decide(self.config);

        let resource = |kind: ResourceKind, base_name: &str| -> Result<ResourceDefinition, ScopeError> {
            let name = registry.resolver(kind)?.resolve(base_name)?.clone();
            debug!(kind = %kind, physical_name = %name, "Defining resource");
            ResourceDefinition::new(name, tags.clone(), lifecycle)
        };

        let tables = spec
            .tables
            .iter()
            .map(|t| {
                Ok(TableDefinition {
                    resource: resource(ResourceKind::Table, &t.name)?,
                    partition_key: t.partition_key.clone(),
                    sort_key: t.sort_key.clone(),
                    ttl_attribute: t.ttl_attribute.clone(),
                })
            })
            .collect::<Result<Vec<_>, ScopeError>>()?;

        let queues = spec
            .queues
            .iter()
            .map(|q| {
                let dead_letter = if q.dead_letter {
                    let dlq_name = format!("{}{DEAD_LETTER_SUFFIX}", q.name);
                    Some(DeadLetterDefinition {
                        resource: resource(ResourceKind::Queue, &dlq_name)?,
                        max_receive_count: q.max_receive_count,
                    })
                } else {
                    None
                };
                Ok(QueueDefinition {
                    resource: resource(ResourceKind::Queue, &q.name)?,
                    visibility_timeout_secs: q.visibility_timeout_secs,
                    dead_letter,
                })
            })
            .collect::<Result<Vec<_>, ScopeError>>()?;

        let templates = spec
            .templates
            .iter()
            .map(|t| {
                Ok(TemplateDefinition {
                    resource: resource(ResourceKind::Template, &t.name)?,
                    subject: t.subject.clone(),
                })
            })
            .collect::<Result<Vec<_>, ScopeError>>()?;

        let identity_stores = spec
            .identity_stores
            .iter()
            .map(|i| {
                Ok(IdentityStoreDefinition {
                    resource: resource(ResourceKind::IdentityStore, &i.name)?,
                })
            })
            .collect::<Result<Vec<_>, ScopeError>>()?;

        let functions = spec
            .functions
            .iter()
            .map(|f| {
                Ok(FunctionDefinition {
                    resource: resource(ResourceKind::Function, &f.name)?,
                    environment_variables: self.runtime_variables(),
                    policy: self.function_policy(f, &registry)?,
                })
            })
            .collect::<Result<Vec<_>, ScopeError>>()?;

        let stack = StackDefinition {
            naming: self.config.clone(),
            tables,
            queues,
            templates,
            identity_stores,
            functions,
        };
        info!(
            environment = %self.config.environment(),
            removal_policy = %lifecycle.removal_policy(),
            resources = stack.resources().len(),
            "Stack composed"
        );
        Ok(stack)
    }

    /// The only runtime configuration a function receives
    fn runtime_variables(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (ENV_APP_NAME.to_string(), self.config.app_identity().to_string()),
            (ENV_ENVIRONMENT.to_string(), self.config.environment().to_string()),
        ])
    }

    fn function_policy(
        &self,
        function: &FunctionSpec,
        registry: &Registry,
    ) -> Result<PolicyDocument, ScopeError> {
        let builder = AccessPolicyBuilder::new(self.config);
        let mut document = PolicyDocument::new();

        for grant in &function.grants {
            for statement in self.grant_statements(&builder, grant, registry)? {
                document.push(statement);
            }
        }

        for exempt in &function.exempt_grants {
            let statement = builder.exempt_policy(
                exempt.actions.iter().map(String::as_str).collect(),
                exempt.resource.as_str(),
                Exemption::environment_agnostic(exempt.reason.as_str()),
            )?;
            document.push(statement);
        }

        debug!(
            function = %function.name,
            statements = document.statements().len(),
            "Built function policy"
        );
        Ok(document)
    }

    fn grant_statements(
        &self,
        builder: &AccessPolicyBuilder<'_>,
        grant: &GrantSpec,
        registry: &Registry,
    ) -> Result<Vec<PolicyStatement>, ScopeError> {
        let sid = format!("{}{}", grant.kind, grant.access);
        if grant.resources.is_empty() {
            let statements = builder.grant(grant.kind, grant.access, &[], &self.scope)?;
            return Ok(statements.into_iter().map(|s| s.with_sid(sid.as_str())).collect());
        }

        let resolver = registry.resolver(grant.kind)?;
        grant
            .resources
            .iter()
            .map(|base| {
                let name = resolver.resolve(base)?;
                let statement = builder.scoped_policy(
                    grant.access.actions(grant.kind),
                    self.scope.resource_arn(grant.kind, name.as_str()),
                )?;
                Ok(statement.with_sid(format!("{sid}{base}")))
            })
            .collect()
    }
}

/// Tags applied to every resource of a stack
pub fn stack_tags(config: &NamingConfig, spec: &StackSpec) -> Result<TagSet, ScopeError> {
    let extra: Vec<(&str, &str)> = spec
        .tags
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    TagSpec::tags_for(config, &extra)
}
