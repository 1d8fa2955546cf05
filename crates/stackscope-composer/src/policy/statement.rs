//! Permission statements and their environment condition
//!
//! Statements can only be constructed by
//! [`AccessPolicyBuilder`](super::AccessPolicyBuilder). Fields are private,
//! so a statement without a condition exists only when it was built with an
//! explicit [`Exemption`].

use super::actions::ActionSet;
use serde::Serialize;
use stackscope_common::TagSet;
use stackscope_common::environment::Environment;
use stackscope_common::tags::TAG_ENVIRONMENT;

/// Condition key prefix for tags on the target resource
pub const RESOURCE_TAG_CONDITION_PREFIX: &str = "aws:ResourceTag/";

/// Statement effect. Only allow statements are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display, strum::AsRefStr)]
pub enum Effect {
    Allow,
}

/// Condition operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display, strum::AsRefStr)]
pub enum ConditionOperator {
    StringEquals,
}

/// Tag-equality predicate evaluated by the authorization engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCondition {
    operator: ConditionOperator,
    tag_key: String,
    value: String,
}

impl TagCondition {
    /// `aws:ResourceTag/Environment == environment`
    pub fn environment(environment: &Environment) -> Self {
        Self {
            operator: ConditionOperator::StringEquals,
            tag_key: TAG_ENVIRONMENT.to_string(),
            value: environment.to_string(),
        }
    }

    pub fn operator(&self) -> ConditionOperator {
        self.operator
    }

    /// The resource tag being compared
    pub fn tag_key(&self) -> &str {
        &self.tag_key
    }

    /// Fully-qualified condition key, e.g. `aws:ResourceTag/Environment`
    pub fn condition_key(&self) -> String {
        format!("{RESOURCE_TAG_CONDITION_PREFIX}{}", self.tag_key)
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether a resource carrying `tags` satisfies this condition
    ///
    /// A resource missing the tag never satisfies it.
    pub fn is_satisfied_by(&self, tags: &TagSet) -> bool {
        match self.operator {
            ConditionOperator::StringEquals => tags.get(&self.tag_key) == Some(self.value.as_str()),
        }
    }
}

/// Explicit opt-out of the environment condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exemption {
    reason: String,
}

impl Exemption {
    /// Mark an action set as environment-agnostic, recording why
    pub fn environment_agnostic(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// One allow statement: actions on a resource pattern under a condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyStatement {
    #[serde(skip_serializing_if = "Option::is_none")]
    sid: Option<String>,
    effect: Effect,
    actions: ActionSet,
    resource_pattern: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    condition: Option<TagCondition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exemption: Option<Exemption>,
}

impl PolicyStatement {
    pub(super) fn conditioned(
        actions: ActionSet,
        resource_pattern: String,
        condition: TagCondition,
    ) -> Self {
        Self {
            sid: None,
            effect: Effect::Allow,
            actions,
            resource_pattern,
            condition: Some(condition),
            exemption: None,
        }
    }

    pub(super) fn exempt(actions: ActionSet, resource_pattern: String, exemption: Exemption) -> Self {
        Self {
            sid: None,
            effect: Effect::Allow,
            actions,
            resource_pattern,
            condition: None,
            exemption: Some(exemption),
        }
    }

    /// Attach a statement id. Ids must be alphanumeric to be accepted by IAM.
    pub fn with_sid(mut self, sid: impl Into<String>) -> Self {
        let sid: String = sid.into();
        self.sid = Some(sid.chars().filter(char::is_ascii_alphanumeric).collect());
        self
    }

    pub fn sid(&self) -> Option<&str> {
        self.sid.as_deref()
    }

    pub fn effect(&self) -> Effect {
        self.effect
    }

    pub fn actions(&self) -> &ActionSet {
        &self.actions
    }

    pub fn resource_pattern(&self) -> &str {
        &self.resource_pattern
    }

    pub fn condition(&self) -> Option<&TagCondition> {
        self.condition.as_ref()
    }

    pub fn exemption(&self) -> Option<&Exemption> {
        self.exemption.as_ref()
    }

    pub fn is_exempt(&self) -> bool {
        self.exemption.is_some()
    }

    /// Whether both statements grant the same thing, ignoring the sid
    pub fn same_grant(&self, other: &PolicyStatement) -> bool {
        self.effect == other.effect
            && self.actions == other.actions
            && self.resource_pattern == other.resource_pattern
            && self.condition == other.condition
            && self.exemption == other.exemption
    }

    /// Local structural evaluation of this statement
    ///
    /// Mirrors what the authorization engine does for a single allow
    /// statement: the action must be granted, the resource must match the
    /// pattern, and the condition (if any) must hold for the resource's tags.
    pub fn permits(&self, action: &str, resource_arn: &str, resource_tags: &TagSet) -> bool {
        self.actions.contains(action)
            && wildcard_match(&self.resource_pattern, resource_arn)
            && self
                .condition
                .as_ref()
                .is_none_or(|condition| condition.is_satisfied_by(resource_tags))
    }
}

/// Match `text` against `pattern`, where `*` matches any run of characters
pub fn wildcard_match(pattern: &str, text: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    if parts.len() == 1 {
        return pattern == text;
    }

    let (first, last) = (parts[0], parts[parts.len() - 1]);
    if !text.starts_with(first) || text.len() < first.len() + last.len() {
        return false;
    }
    let mut rest = &text[first.len()..];
    for part in &parts[1..parts.len() - 1] {
        match rest.find(part) {
            Some(idx) => rest = &rest[idx + part.len()..],
            None => return false,
        }
    }
    rest.ends_with(last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackscope_common::{NamingConfig, TagSpec};

    fn tags(env: &str) -> TagSet {
        TagSpec::tags_for(&NamingConfig::new("appre", env).unwrap(), &[]).unwrap()
    }

    fn statement(env: &str) -> PolicyStatement {
        PolicyStatement::conditioned(
            ["dynamodb:GetItem"].into_iter().collect(),
            "arn:aws:dynamodb:*:*:table/appre-table-*-test".to_string(),
            TagCondition::environment(&Environment::new(env).unwrap()),
        )
    }

    #[test]
    fn test_wildcard_match() {
        assert!(wildcard_match("abc", "abc"));
        assert!(!wildcard_match("abc", "abcd"));
        assert!(wildcard_match("*", ""));
        assert!(wildcard_match("a-*-test", "a-x-test"));
        assert!(wildcard_match("a-*-test", "a--test"));
        assert!(!wildcard_match("a-*-test", "a-test"));
        assert!(!wildcard_match("a-*-test", "a-x-prod"));
        assert!(wildcard_match("a*b*c", "a123b456c"));
        assert!(!wildcard_match("a*b*c", "a123c"));
        assert!(wildcard_match("arn:*:table/*", "arn:aws:table/x"));
    }

    #[test]
    fn test_condition_key() {
        let condition = TagCondition::environment(&Environment::new("test").unwrap());
        assert_eq!(condition.condition_key(), "aws:ResourceTag/Environment");
        assert_eq!(condition.value(), "test");
        assert_eq!(condition.operator(), ConditionOperator::StringEquals);
    }

    #[test]
    fn test_permits_requires_matching_tag() {
        let stmt = statement("test");
        let arn = "arn:aws:dynamodb:us-east-2:123:table/appre-table-otp-test";
        assert!(stmt.permits("dynamodb:GetItem", arn, &tags("test")));
        assert!(!stmt.permits("dynamodb:GetItem", arn, &tags("production")));
        assert!(!stmt.permits("dynamodb:PutItem", arn, &tags("test")));
        assert!(!stmt.permits(
            "dynamodb:GetItem",
            "arn:aws:dynamodb:us-east-2:123:table/appre-table-otp-prod",
            &tags("test")
        ));
    }

    #[test]
    fn test_with_sid_strips_non_alphanumerics() {
        let stmt = statement("test").with_sid("Table-Read_otp");
        assert_eq!(stmt.sid(), Some("TableReadotp"));
    }

    #[test]
    fn test_same_grant_ignores_sid() {
        let stmt = statement("test");
        assert!(stmt.same_grant(&statement("test").with_sid("Other")));
        assert!(!stmt.same_grant(&statement("production")));
    }

    #[test]
    fn test_exempt_statement_has_no_condition() {
        let stmt = PolicyStatement::exempt(
            ["sqs:ListQueues"].into_iter().collect(),
            "*".to_string(),
            Exemption::environment_agnostic("queue discovery"),
        );
        assert!(stmt.condition().is_none());
        assert!(stmt.is_exempt());
        assert_eq!(stmt.exemption().unwrap().reason(), "queue discovery");
        assert!(stmt.permits("sqs:ListQueues", "anything", &tags("production")));
    }
}
