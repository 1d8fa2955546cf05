//! Action identifiers, access levels and sensitivity classification
//!
//! Any action that is not on the environment-agnostic allow-list is treated
//! as environment-sensitive, so unknown actions always get the
//! Environment condition.

use serde::{Deserialize, Serialize};
use stackscope_common::ResourceKind;
use std::collections::BTreeSet;
use std::fmt;

/// Actions that reveal no resource content and cannot be tag-scoped
///
/// List calls operate on the account, not on a tagged resource, so a tag
/// condition would make them fail outright.
const ENVIRONMENT_AGNOSTIC_ACTIONS: &[&str] = &[
    "dynamodb:ListTables",
    "dynamodb:DescribeLimits",
    "sqs:ListQueues",
    "ses:ListTemplates",
    "ses:GetSendQuota",
    "lambda:ListFunctions",
    "cognito-idp:ListUserPools",
];

/// A single permission identifier, e.g. `dynamodb:GetItem`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(String);

impl ActionId {
    pub fn new(action: impl Into<String>) -> Self {
        Self(action.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn sensitivity(&self) -> Sensitivity {
        if ENVIRONMENT_AGNOSTIC_ACTIONS.contains(&self.0.as_str()) {
            Sensitivity::EnvironmentAgnostic
        } else {
            Sensitivity::EnvironmentSensitive
        }
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActionId {
    fn from(action: &str) -> Self {
        Self::new(action)
    }
}

/// Whether an action touches environment-owned data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sensitivity {
    /// Data-plane reads/writes and administrative operations
    EnvironmentSensitive,
    /// Account-level listing without content
    EnvironmentAgnostic,
}

/// Ordered, de-duplicated set of actions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ActionSet(BTreeSet<ActionId>);

impl ActionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, action: impl Into<ActionId>) {
        self.0.insert(action.into());
    }

    pub fn contains(&self, action: &str) -> bool {
        self.0.iter().any(|a| a.as_str() == action)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionId> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Actions in this set that require the Environment condition
    pub fn sensitive_actions(&self) -> Vec<&ActionId> {
        self.0
            .iter()
            .filter(|a| a.sensitivity() == Sensitivity::EnvironmentSensitive)
            .collect()
    }

    /// Merge another set into this one
    pub fn extend(&mut self, other: &ActionSet) {
        self.0.extend(other.0.iter().cloned());
    }
}

impl<A: Into<ActionId>> FromIterator<A> for ActionSet {
    fn from_iter<I: IntoIterator<Item = A>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Coarse access levels mapped to concrete actions per kind
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum AccessLevel {
    /// Read records, receive messages, fetch templates
    Read,
    /// Write records, send messages, send templated mail, invoke
    Write,
    /// Read and Write combined
    ReadWrite,
}

impl AccessLevel {
    /// Concrete actions granted by this level on `kind`
    pub fn actions(self, kind: ResourceKind) -> ActionSet {
        match self {
            AccessLevel::Read => read_actions(kind).iter().copied().collect(),
            AccessLevel::Write => write_actions(kind).iter().copied().collect(),
            AccessLevel::ReadWrite => read_actions(kind)
                .iter()
                .chain(write_actions(kind))
                .copied()
                .collect(),
        }
    }
}

fn read_actions(kind: ResourceKind) -> &'static [&'static str] {
    match kind {
        ResourceKind::Table => &[
            "dynamodb:GetItem",
            "dynamodb:BatchGetItem",
            "dynamodb:Query",
            "dynamodb:Scan",
            "dynamodb:ConditionCheckItem",
            "dynamodb:DescribeTable",
        ],
        ResourceKind::Queue => &[
            "sqs:ReceiveMessage",
            "sqs:DeleteMessage",
            "sqs:ChangeMessageVisibility",
            "sqs:GetQueueAttributes",
            "sqs:GetQueueUrl",
        ],
        ResourceKind::Template => &["ses:GetTemplate"],
        ResourceKind::IdentityStore => &[
            "cognito-idp:AdminGetUser",
            "cognito-idp:ListUsers",
            "cognito-idp:DescribeUserPool",
        ],
        ResourceKind::Function => &["lambda:GetFunction", "lambda:GetFunctionConfiguration"],
    }
}

fn write_actions(kind: ResourceKind) -> &'static [&'static str] {
    match kind {
        ResourceKind::Table => &[
            "dynamodb:PutItem",
            "dynamodb:UpdateItem",
            "dynamodb:DeleteItem",
            "dynamodb:BatchWriteItem",
        ],
        ResourceKind::Queue => &[
            "sqs:SendMessage",
            "sqs:GetQueueAttributes",
            "sqs:GetQueueUrl",
        ],
        ResourceKind::Template => &["ses:SendTemplatedEmail", "ses:SendBulkTemplatedEmail"],
        ResourceKind::IdentityStore => &[
            "cognito-idp:AdminCreateUser",
            "cognito-idp:AdminUpdateUserAttributes",
            "cognito-idp:AdminDeleteUser",
            "cognito-idp:AdminSetUserPassword",
        ],
        ResourceKind::Function => &["lambda:InvokeFunction"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_unknown_actions_are_sensitive() {
        assert_eq!(
            ActionId::new("dynamodb:GetItem").sensitivity(),
            Sensitivity::EnvironmentSensitive
        );
        assert_eq!(
            ActionId::new("custom:Whatever").sensitivity(),
            Sensitivity::EnvironmentSensitive
        );
        assert_eq!(
            ActionId::new("sqs:ListQueues").sensitivity(),
            Sensitivity::EnvironmentAgnostic
        );
    }

    #[test]
    fn test_every_level_is_sensitive_and_non_empty() {
        for kind in ResourceKind::iter() {
            for level in AccessLevel::iter() {
                let actions = level.actions(kind);
                assert!(!actions.is_empty(), "{level} on {kind} has no actions");
                assert_eq!(
                    actions.sensitive_actions().len(),
                    actions.len(),
                    "{level} on {kind} contains agnostic actions"
                );
            }
        }
    }

    #[test]
    fn test_read_write_is_union_without_duplicates() {
        let rw = AccessLevel::ReadWrite.actions(ResourceKind::Queue);
        let mut union = AccessLevel::Read.actions(ResourceKind::Queue);
        union.extend(&AccessLevel::Write.actions(ResourceKind::Queue));
        assert_eq!(rw, union);
        assert!(rw.contains("sqs:SendMessage"));
        assert!(rw.contains("sqs:ReceiveMessage"));
    }

    #[test]
    fn test_access_level_parse() {
        assert_eq!("read-write".parse::<AccessLevel>().unwrap(), AccessLevel::ReadWrite);
        assert_eq!("READ".parse::<AccessLevel>().unwrap(), AccessLevel::Read);
    }
}
