//! IAM policy documents

use super::statement::PolicyStatement;
use serde::{Serialize, Serializer};
use stackscope_common::TagSet;
use std::collections::HashSet;

/// IAM policy language version
pub const POLICY_VERSION: &str = "2012-10-17";

/// Ordered list of statements attached to one role
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyDocument {
    statements: Vec<PolicyStatement>,
}

impl PolicyDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a statement unless an earlier one already grants the same
    /// actions on the same resource under the same condition
    pub fn push(&mut self, statement: PolicyStatement) {
        if self.statements.iter().any(|s| s.same_grant(&statement)) {
            return;
        }
        self.statements.push(statement);
    }

    pub fn statements(&self) -> &[PolicyStatement] {
        &self.statements
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Whether any statement allows `action` on the resource
    pub fn permits(&self, action: &str, resource_arn: &str, resource_tags: &TagSet) -> bool {
        self.statements
            .iter()
            .any(|s| s.permits(action, resource_arn, resource_tags))
    }

    /// Render in the IAM JSON policy format
    ///
    /// Statements without an explicit sid get `Stmt{n}`; repeated sids are
    /// suffixed with their position so every sid is unique.
    pub fn to_json(&self) -> serde_json::Value {
        let mut seen = HashSet::new();
        let statements: Vec<_> = self
            .statements
            .iter()
            .enumerate()
            .map(|(idx, stmt)| {
                let mut sid = stmt
                    .sid()
                    .filter(|s| !s.is_empty())
                    .map_or_else(|| format!("Stmt{idx}"), str::to_string);
                if !seen.insert(sid.clone()) {
                    sid = format!("{sid}{idx}");
                    seen.insert(sid.clone());
                }

                let actions: Vec<&str> = stmt.actions().iter().map(|a| a.as_str()).collect();
                let mut json = serde_json::json!({
                    "Sid": sid,
                    "Effect": stmt.effect().to_string(),
                    "Action": actions,
                    "Resource": stmt.resource_pattern(),
                });
                if let Some(condition) = stmt.condition() {
                    let mut test = serde_json::Map::new();
                    test.insert(condition.condition_key(), condition.value().into());
                    let mut block = serde_json::Map::new();
                    block.insert(condition.operator().to_string(), test.into());
                    json["Condition"] = block.into();
                }
                json
            })
            .collect();

        serde_json::json!({
            "Version": POLICY_VERSION,
            "Statement": statements,
        })
    }
}

impl Serialize for PolicyDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl FromIterator<PolicyStatement> for PolicyDocument {
    fn from_iter<I: IntoIterator<Item = PolicyStatement>>(iter: I) -> Self {
        let mut document = Self::new();
        document.extend(iter);
        document
    }
}

impl Extend<PolicyStatement> for PolicyDocument {
    fn extend<I: IntoIterator<Item = PolicyStatement>>(&mut self, iter: I) {
        for statement in iter {
            self.push(statement);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{AccessPolicyBuilder, Exemption};
    use stackscope_common::NamingConfig;

    #[test]
    fn test_iam_json_shape() {
        let cfg = NamingConfig::new("appre", "test").unwrap();
        let builder = AccessPolicyBuilder::new(&cfg);
        let doc: PolicyDocument = [
            builder
                .scoped_policy(
                    ["ses:SendTemplatedEmail"].into_iter().collect(),
                    "arn:aws:ses:*:*:template/appre-template-otp-test",
                )
                .unwrap()
                .with_sid("SendOtp"),
            builder
                .exempt_policy(
                    ["ses:GetSendQuota"].into_iter().collect(),
                    "*",
                    Exemption::environment_agnostic("quota check"),
                )
                .unwrap(),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            doc.to_json(),
            serde_json::json!({
                "Version": "2012-10-17",
                "Statement": [
                    {
                        "Sid": "SendOtp",
                        "Effect": "Allow",
                        "Action": ["ses:SendTemplatedEmail"],
                        "Resource": "arn:aws:ses:*:*:template/appre-template-otp-test",
                        "Condition": {
                            "StringEquals": {"aws:ResourceTag/Environment": "test"}
                        }
                    },
                    {
                        "Sid": "Stmt1",
                        "Effect": "Allow",
                        "Action": ["ses:GetSendQuota"],
                        "Resource": "*"
                    }
                ]
            })
        );
    }

    #[test]
    fn test_duplicate_sids_made_unique() {
        let cfg = NamingConfig::new("appre", "test").unwrap();
        let builder = AccessPolicyBuilder::new(&cfg);
        let stmt = |resource: &str| {
            builder
                .scoped_policy(["sqs:SendMessage"].into_iter().collect(), resource)
                .unwrap()
                .with_sid("Send")
        };
        let doc: PolicyDocument = [stmt("a"), stmt("b")].into_iter().collect();
        let json = doc.to_json();
        assert_eq!(json["Statement"][0]["Sid"], "Send");
        assert_eq!(json["Statement"][1]["Sid"], "Send1");
    }

    #[test]
    fn test_identical_grants_collapsed() {
        let cfg = NamingConfig::new("appre", "test").unwrap();
        let builder = AccessPolicyBuilder::new(&cfg);
        let stmt = |sid: &str| {
            builder
                .scoped_policy(
                    ["cognito-idp:AdminGetUser"].into_iter().collect(),
                    "arn:aws:cognito-idp:*:*:userpool/*",
                )
                .unwrap()
                .with_sid(sid)
        };

        let mut doc: PolicyDocument = [stmt("Users"), stmt("Admins")].into_iter().collect();
        assert_eq!(doc.statements().len(), 1);
        assert_eq!(doc.statements()[0].sid(), Some("Users"));

        doc.push(stmt("Again"));
        assert_eq!(doc.statements().len(), 1);

        // A different condition is a different grant
        let prod = NamingConfig::new("appre", "production").unwrap();
        doc.push(
            AccessPolicyBuilder::new(&prod)
                .scoped_policy(
                    ["cognito-idp:AdminGetUser"].into_iter().collect(),
                    "arn:aws:cognito-idp:*:*:userpool/*",
                )
                .unwrap(),
        );
        assert_eq!(doc.statements().len(), 2);
    }
}
