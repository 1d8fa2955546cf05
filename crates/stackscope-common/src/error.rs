//! Naming, tagging and policy errors
//!
//! Every variant is a caller or configuration mistake, never a transient
//! condition, so nothing here is retried.

use crate::resource_kind::ResourceKind;
use thiserror::Error;

/// Errors raised while naming, tagging or scoping resources
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    /// App identity or environment token is not a valid identifier segment
    #[error("Invalid naming config: {0}")]
    InvalidConfig(String),

    /// Environment is not on the closed allow-list (strict mode only)
    #[error("Unknown environment '{0}' (expected one of: development, test, staging, production)")]
    UnknownEnvironment(String),

    /// Base name cannot be embedded in a physical name for this kind
    #[error("Invalid base name '{base_name}' for {kind}: {reason}")]
    InvalidBaseName {
        kind: ResourceKind,
        base_name: String,
        reason: String,
    },

    /// Physical name does not belong to the given app/environment/kind
    #[error("Cannot resolve '{physical_name}' as a {kind} of {app_identity}/{environment}: {reason}")]
    UnresolvableName {
        kind: ResourceKind,
        physical_name: String,
        app_identity: String,
        environment: String,
        reason: String,
    },

    /// Caller tried to redefine a reserved tag with a different value
    #[error("Tag '{key}' is reserved: cannot override '{expected}' with '{attempted}'")]
    TagConflict {
        key: String,
        expected: String,
        attempted: String,
    },

    /// Tag key or value violates provider limits
    #[error("Invalid tag '{key}': {reason}")]
    InvalidTag { key: String, reason: String },

    /// Unconditioned statement requested for environment-sensitive actions
    #[error("Refusing to build a statement without an Environment condition: {} are environment-sensitive", sensitive_actions.join(", "))]
    MissingCondition { sensitive_actions: Vec<String> },

    /// Policy statement with no actions
    #[error("Policy statement must grant at least one action")]
    EmptyActionSet,

    /// Two values built from different naming configs were combined
    #[error("Environment mismatch in {context}: expected '{expected}', found '{found}'")]
    EnvironmentMismatch {
        context: &'static str,
        expected: String,
        found: String,
    },

    /// Logical name was never registered for this kind
    #[error("Unknown {kind} '{base_name}'. Available: {}", available.join(", "))]
    UnknownResource {
        kind: ResourceKind,
        base_name: String,
        available: Vec<String>,
    },

    /// The same logical resource was declared twice
    #[error("Duplicate {kind} '{base_name}'")]
    DuplicateResource { kind: ResourceKind, base_name: String },
}

impl ScopeError {
    /// Check if this error stems from mixing two environments
    pub fn is_cross_environment(&self) -> bool {
        match self {
            ScopeError::EnvironmentMismatch { .. } => true,
            ScopeError::TagConflict { key, .. } => {
                key.eq_ignore_ascii_case(crate::tags::TAG_ENVIRONMENT)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ScopeError::InvalidBaseName {
            kind: ResourceKind::Template,
            base_name: "otp-test".to_string(),
            reason: "contains delimiter '-'".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid base name 'otp-test' for template: contains delimiter '-'"
        );

        let err = ScopeError::MissingCondition {
            sensitive_actions: vec!["dynamodb:GetItem".to_string(), "sqs:SendMessage".to_string()],
        };
        assert!(err.to_string().contains("dynamodb:GetItem, sqs:SendMessage"));
    }

    #[test]
    fn test_cross_environment_classification() {
        let mismatch = ScopeError::EnvironmentMismatch {
            context: "resource tags",
            expected: "test".to_string(),
            found: "production".to_string(),
        };
        assert!(mismatch.is_cross_environment());

        let env_conflict = ScopeError::TagConflict {
            key: "Environment".to_string(),
            expected: "test".to_string(),
            attempted: "production".to_string(),
        };
        assert!(env_conflict.is_cross_environment());

        let other_conflict = ScopeError::TagConflict {
            key: "Application".to_string(),
            expected: "appre".to_string(),
            attempted: "other".to_string(),
        };
        assert!(!other_conflict.is_cross_environment());
        assert!(!ScopeError::EmptyActionSet.is_cross_environment());
    }
}
