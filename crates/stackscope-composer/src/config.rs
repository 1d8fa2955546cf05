//! Stack spec loading from JSON
//!
//! A stack spec lists resources by base name only. Physical names, tags and
//! lifecycle settings are derived from the [`NamingConfig`] at compose time,
//! so the same file deploys unchanged to every environment.
//!
//! [`NamingConfig`]: stackscope_common::NamingConfig

use crate::policy::AccessLevel;
use anyhow::{Context, Result};
use garde::Validate;
use serde::{Deserialize, Serialize};
use stackscope_common::ResourceKind;
use stackscope_common::defaults::{
    ARN_WILDCARD, default_max_receive_count, default_visibility_timeout_secs,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Longest visibility timeout SQS accepts (12 hours)
pub const MAX_VISIBILITY_TIMEOUT_SECS: u32 = 43_200;

/// Upper bound for the redrive receive count
pub const MAX_RECEIVE_COUNT: u32 = 1_000;

/// Key-value table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct TableSpec {
    /// Base name, e.g. "otp"
    #[garde(length(min = 1))]
    pub name: String,

    /// Partition key attribute
    #[garde(length(min = 1))]
    pub partition_key: String,

    /// Optional sort key attribute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[garde(length(min = 1))]
    pub sort_key: Option<String>,

    /// Attribute holding the expiry timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[garde(length(min = 1))]
    pub ttl_attribute: Option<String>,
}

/// Message queue, optionally with a dead-letter queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct QueueSpec {
    #[garde(length(min = 1))]
    pub name: String,

    /// Create `{name}_dlq` and redrive into it
    #[serde(default)]
    #[garde(skip)]
    pub dead_letter: bool,

    /// Visibility timeout in seconds (default: 30)
    #[serde(default = "default_visibility_timeout_secs")]
    #[garde(range(max = MAX_VISIBILITY_TIMEOUT_SECS))]
    pub visibility_timeout_secs: u32,

    /// Receives before a message moves to the dead-letter queue (default: 3)
    #[serde(default = "default_max_receive_count")]
    #[garde(range(min = 1, max = MAX_RECEIVE_COUNT))]
    pub max_receive_count: u32,
}

/// Email template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct TemplateSpec {
    #[garde(length(min = 1))]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[garde(skip)]
    pub subject: Option<String>,
}

/// User directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct IdentityStoreSpec {
    #[garde(length(min = 1))]
    pub name: String,
}

/// Access a function needs to resources of one kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct GrantSpec {
    #[garde(skip)]
    pub kind: ResourceKind,

    /// Base names to grant; empty means every resource of the kind
    #[serde(default)]
    #[garde(inner(length(min = 1)))]
    pub resources: Vec<String>,

    #[garde(skip)]
    pub access: AccessLevel,
}

/// Unconditioned grant for environment-agnostic actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ExemptGrantSpec {
    #[garde(length(min = 1), inner(length(min = 1)))]
    pub actions: Vec<String>,

    /// Resource pattern (default: "*")
    #[serde(default = "default_resource_pattern")]
    #[garde(length(min = 1))]
    pub resource: String,

    /// Why these actions need no Environment condition
    #[garde(length(min = 1))]
    pub reason: String,
}

fn default_resource_pattern() -> String {
    ARN_WILDCARD.to_string()
}

/// Compute function with its grants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct FunctionSpec {
    #[garde(length(min = 1))]
    pub name: String,

    #[serde(default)]
    #[garde(dive)]
    pub grants: Vec<GrantSpec>,

    #[serde(default)]
    #[garde(dive)]
    pub exempt_grants: Vec<ExemptGrantSpec>,
}

/// Environment-agnostic description of one application stack
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct StackSpec {
    #[serde(default)]
    #[garde(dive)]
    pub tables: Vec<TableSpec>,

    #[serde(default)]
    #[garde(dive)]
    pub queues: Vec<QueueSpec>,

    #[serde(default)]
    #[garde(dive)]
    pub templates: Vec<TemplateSpec>,

    #[serde(default)]
    #[garde(dive)]
    pub identity_stores: Vec<IdentityStoreSpec>,

    #[serde(default)]
    #[garde(dive)]
    pub functions: Vec<FunctionSpec>,

    /// Extra tags applied to every resource
    #[serde(default)]
    #[garde(skip)]
    pub tags: BTreeMap<String, String>,
}

impl StackSpec {
    /// Load and validate a stack spec from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read stack spec: {}", path.display()))?;

        Self::from_json(&content)
            .with_context(|| format!("Failed to load stack spec: {}", path.display()))
    }

    /// Parse and validate a stack spec from JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        let spec: Self = serde_json::from_str(content).context("Failed to parse stack spec")?;
        spec.validate()
            .map_err(|report| anyhow::anyhow!("Invalid stack spec: {report}"))?;
        Ok(spec)
    }

    /// Total number of declared resources, dead-letter queues excluded
    pub fn resource_count(&self) -> usize {
        self.tables.len()
            + self.queues.len()
            + self.templates.len()
            + self.identity_stores.len()
            + self.functions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_stack_spec() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{
                "tables": [{{"name": "otp", "partition_key": "email", "ttl_attribute": "expires_at"}}],
                "queues": [{{"name": "email", "dead_letter": true}}],
                "templates": [{{"name": "otp", "subject": "Your code"}}],
                "functions": [{{
                    "name": "pre_signup",
                    "grants": [{{"kind": "table", "resources": ["otp"], "access": "read-write"}}]
                }}]
            }}"#
        )
        .unwrap();

        let spec = StackSpec::load(file.path()).unwrap();
        assert_eq!(spec.tables[0].name, "otp");
        assert_eq!(spec.tables[0].ttl_attribute.as_deref(), Some("expires_at"));
        assert!(spec.queues[0].dead_letter);
        assert_eq!(spec.queues[0].visibility_timeout_secs, 30);
        assert_eq!(spec.queues[0].max_receive_count, 3);
        assert_eq!(spec.functions[0].grants[0].kind, ResourceKind::Table);
        assert_eq!(spec.functions[0].grants[0].access, AccessLevel::ReadWrite);
        assert_eq!(spec.resource_count(), 4);
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = StackSpec::load(Path::new("/nonexistent/stack.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/stack.json"));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let err = StackSpec::from_json(r#"{"tables": [], "buckets": []}"#).unwrap_err();
        assert!(format!("{err:#}").contains("buckets"));
    }

    #[test]
    fn test_validation_rejects_out_of_range_timeout() {
        let err = StackSpec::from_json(
            r#"{"queues": [{"name": "email", "visibility_timeout_secs": 50000}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Invalid stack spec"));
    }

    #[test]
    fn test_validation_rejects_empty_exemption_reason() {
        let err = StackSpec::from_json(
            r#"{"functions": [{"name": "health", "exempt_grants": [{"actions": ["sqs:ListQueues"], "reason": ""}]}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Invalid stack spec"));
    }

    #[test]
    fn test_exempt_grant_defaults_to_wildcard() {
        let spec = StackSpec::from_json(
            r#"{"functions": [{"name": "health", "exempt_grants": [{"actions": ["sqs:ListQueues"], "reason": "discovery"}]}]}"#,
        )
        .unwrap();
        assert_eq!(spec.functions[0].exempt_grants[0].resource, "*");
    }

    #[test]
    fn test_empty_spec_is_valid() {
        let spec = StackSpec::from_json("{}").unwrap();
        assert_eq!(spec, StackSpec::default());
        assert_eq!(spec.resource_count(), 0);
    }
}
