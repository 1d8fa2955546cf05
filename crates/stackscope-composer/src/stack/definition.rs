//! Composed resource definitions
//!
//! These are the environment-specific outputs of [`StackComposer`]: every
//! resource carries its physical name, tags and durability settings, ready
//! to hand to a deployment tool.
//!
//! [`StackComposer`]: super::StackComposer

use crate::policy::PolicyDocument;
use serde::Serialize;
use stackscope_common::{
    LifecycleDecision, NamingConfig, PhysicalName, RemovalPolicy, ResourceKind, ResourceNamer,
    ScopeError, TagSet,
};
use std::collections::BTreeMap;

/// Removal and backup settings for one resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Durability {
    pub removal_policy: RemovalPolicy,
    /// Only ever true for tables
    pub point_in_time_recovery: bool,
}

impl Durability {
    pub fn for_kind(kind: ResourceKind, lifecycle: LifecycleDecision) -> Self {
        Self {
            removal_policy: lifecycle.removal_policy(),
            point_in_time_recovery: lifecycle.point_in_time_recovery
                && kind.supports_point_in_time_recovery(),
        }
    }
}

/// Name, tags and durability shared by every resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceDefinition {
    name: PhysicalName,
    kind: ResourceKind,
    tags: TagSet,
    durability: Durability,
}

impl ResourceDefinition {
    /// Combine a name with its tags and lifecycle
    ///
    /// Fails with [`ScopeError::EnvironmentMismatch`] if the tags were built
    /// for a different application or environment than the name.
    pub fn new(
        name: PhysicalName,
        tags: TagSet,
        lifecycle: LifecycleDecision,
    ) -> Result<Self, ScopeError> {
        name.naming_config().ensure_same_config(tags.naming_config(), "resource tags")?;
        let kind = name.kind();
        Ok(Self {
            name,
            kind,
            tags,
            durability: Durability::for_kind(kind, lifecycle),
        })
    }

    pub fn name(&self) -> &PhysicalName {
        &self.name
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    pub fn durability(&self) -> Durability {
        self.durability
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableDefinition {
    #[serde(flatten)]
    pub resource: ResourceDefinition,
    pub partition_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl_attribute: Option<String>,
}

/// Dead-letter queue attached to a queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeadLetterDefinition {
    #[serde(flatten)]
    pub resource: ResourceDefinition,
    pub max_receive_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueDefinition {
    #[serde(flatten)]
    pub resource: ResourceDefinition,
    pub visibility_timeout_secs: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dead_letter: Option<DeadLetterDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateDefinition {
    #[serde(flatten)]
    pub resource: ResourceDefinition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityStoreDefinition {
    #[serde(flatten)]
    pub resource: ResourceDefinition,
}

/// Function with its runtime variables and execution-role policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionDefinition {
    #[serde(flatten)]
    pub resource: ResourceDefinition,
    /// Only the application identity and environment; resources are
    /// resolved from base names at runtime
    pub environment_variables: BTreeMap<String, String>,
    pub policy: PolicyDocument,
}

/// Every resource of one application in one environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackDefinition {
    /// Serialized as `app_identity` and `environment`
    #[serde(flatten)]
    pub naming: NamingConfig,
    pub tables: Vec<TableDefinition>,
    pub queues: Vec<QueueDefinition>,
    pub templates: Vec<TemplateDefinition>,
    pub identity_stores: Vec<IdentityStoreDefinition>,
    pub functions: Vec<FunctionDefinition>,
}

impl StackDefinition {
    /// All resources in declaration order, dead-letter queues after their
    /// source queue
    pub fn resources(&self) -> Vec<&ResourceDefinition> {
        let mut out = Vec::new();
        out.extend(self.tables.iter().map(|t| &t.resource));
        for queue in &self.queues {
            out.push(&queue.resource);
            if let Some(dlq) = &queue.dead_letter {
                out.push(&dlq.resource);
            }
        }
        out.extend(self.templates.iter().map(|t| &t.resource));
        out.extend(self.identity_stores.iter().map(|i| &i.resource));
        out.extend(self.functions.iter().map(|f| &f.resource));
        out
    }

    /// Look up a composed function by base name
    pub fn function(&self, base_name: &str) -> Option<&FunctionDefinition> {
        let name = ResourceNamer::physical_name(&self.naming, ResourceKind::Function, base_name).ok()?;
        self.functions.iter().find(|f| f.resource.name() == &name)
    }
}
