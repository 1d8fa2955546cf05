//! ARN layout per resource kind

use serde::{Deserialize, Serialize};
use stackscope_common::ResourceKind;
use stackscope_common::defaults::{ARN_WILDCARD, default_partition};

/// Partition/region/account used to build ARNs
///
/// Region and account default to `*`: isolation between environments comes
/// from the name suffix and the tag condition, not from the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountScope {
    #[serde(default = "default_partition")]
    pub partition: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
}

impl Default for AccountScope {
    fn default() -> Self {
        Self {
            partition: default_partition(),
            region: None,
            account_id: None,
        }
    }
}

impl AccountScope {
    pub fn new(region: Option<String>, account_id: Option<String>) -> Self {
        Self {
            region,
            account_id,
            ..Self::default()
        }
    }

    fn region(&self) -> &str {
        self.region.as_deref().unwrap_or(ARN_WILDCARD)
    }

    fn account(&self) -> &str {
        self.account_id.as_deref().unwrap_or(ARN_WILDCARD)
    }

    /// ARN (or ARN pattern) for a resource named `name`
    ///
    /// `name` may be a physical name or a name pattern containing `*`.
    /// Identity stores are addressed by generated pool IDs, so their ARN is
    /// always a wildcard and access to them relies on the tag condition.
    pub fn resource_arn(&self, kind: ResourceKind, name: &str) -> String {
        let (p, r, a) = (&self.partition, self.region(), self.account());
        match kind {
            ResourceKind::Table => format!("arn:{p}:dynamodb:{r}:{a}:table/{name}"),
            ResourceKind::Queue => format!("arn:{p}:sqs:{r}:{a}:{name}"),
            ResourceKind::Template => format!("arn:{p}:ses:{r}:{a}:template/{name}"),
            ResourceKind::IdentityStore => format!("arn:{p}:cognito-idp:{r}:{a}:userpool/*"),
            ResourceKind::Function => format!("arn:{p}:lambda:{r}:{a}:function:{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scope_uses_wildcards() {
        let scope = AccountScope::default();
        assert_eq!(
            scope.resource_arn(ResourceKind::Table, "appre-table-otp-test"),
            "arn:aws:dynamodb:*:*:table/appre-table-otp-test"
        );
        assert_eq!(
            scope.resource_arn(ResourceKind::Queue, "appre-queue-*-test"),
            "arn:aws:sqs:*:*:appre-queue-*-test"
        );
    }

    #[test]
    fn test_concrete_scope() {
        let scope = AccountScope::new(Some("us-east-2".to_string()), Some("123456789012".to_string()));
        assert_eq!(
            scope.resource_arn(ResourceKind::Template, "appre-template-otp-test"),
            "arn:aws:ses:us-east-2:123456789012:template/appre-template-otp-test"
        );
        assert_eq!(
            scope.resource_arn(ResourceKind::Function, "appre-function-pre_signup-test"),
            "arn:aws:lambda:us-east-2:123456789012:function:appre-function-pre_signup-test"
        );
    }

    #[test]
    fn test_identity_store_is_wildcard() {
        let scope = AccountScope::default();
        assert_eq!(
            scope.resource_arn(ResourceKind::IdentityStore, "appre-identity-users-test"),
            "arn:aws:cognito-idp:*:*:userpool/*"
        );
    }
}
