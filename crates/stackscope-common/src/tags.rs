//! Resource tag schema for stackscope
//!
//! Every provisioned resource carries these tags. The `Environment` tag is
//! what access policies condition on, so it is authoritative and can never
//! be overridden by a caller.
//!
//! ## Tag Schema
//!
//! | Tag Key | Description |
//! |---------|-------------|
//! | `Environment` | Environment token from the naming config (authoritative) |
//! | `Application` | Application identity from the naming config |
//! | any other | Caller-supplied extra tags |

use crate::environment::Environment;
use crate::error::ScopeError;
use crate::naming_config::NamingConfig;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Tag key for the deployment environment
pub const TAG_ENVIRONMENT: &str = "Environment";

/// Tag key for the application identity
pub const TAG_APPLICATION: &str = "Application";

/// Tag keys injected from the naming config
pub const RESERVED_TAGS: &[&str] = &[TAG_ENVIRONMENT, TAG_APPLICATION];

/// Provider-reserved key prefix
const PROVIDER_PREFIX: &str = "aws:";

/// Maximum tag key length
pub const MAX_TAG_KEY_LEN: usize = 128;

/// Maximum tag value length
pub const MAX_TAG_VALUE_LEN: usize = 256;

/// Immutable, ordered set of tags always containing `Environment`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagSet {
    tags: BTreeMap<String, String>,
    #[serde(skip)]
    config: NamingConfig,
}

impl TagSet {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Environment this tag set was built for
    pub fn environment(&self) -> &Environment {
        self.config.environment()
    }

    /// Naming config this tag set was built for
    pub fn naming_config(&self) -> &NamingConfig {
        &self.config
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Builds the required tag set for a naming config
pub struct TagSpec;

impl TagSpec {
    /// Build tags for `config` plus optional extra tags.
    ///
    /// Tag keys are compared case-insensitively. Extra tags may repeat a
    /// reserved key only with the same value, and may not repeat each other.
    pub fn tags_for(config: &NamingConfig, extra: &[(&str, &str)]) -> Result<TagSet, ScopeError> {
        let mut tags = BTreeMap::new();
        tags.insert(
            TAG_ENVIRONMENT.to_string(),
            config.environment().to_string(),
        );
        tags.insert(
            TAG_APPLICATION.to_string(),
            config.app_identity().to_string(),
        );

        let mut seen = BTreeSet::new();
        for (key, value) in extra {
            validate_tag(key, value)?;
            if !seen.insert(key.to_ascii_lowercase()) {
                return Err(ScopeError::InvalidTag {
                    key: key.to_string(),
                    reason: "duplicate key".to_string(),
                });
            }
            if let Some(reserved) = RESERVED_TAGS.iter().find(|r| r.eq_ignore_ascii_case(key)) {
                let expected = &tags[*reserved];
                if expected != value {
                    return Err(ScopeError::TagConflict {
                        key: reserved.to_string(),
                        expected: expected.clone(),
                        attempted: value.to_string(),
                    });
                }
                continue;
            }
            tags.insert(key.to_string(), value.to_string());
        }

        Ok(TagSet {
            tags,
            config: config.clone(),
        })
    }
}

fn validate_tag(key: &str, value: &str) -> Result<(), ScopeError> {
    let invalid = |reason: String| ScopeError::InvalidTag {
        key: key.to_string(),
        reason,
    };
    if key.is_empty() {
        return Err(invalid("key cannot be empty".to_string()));
    }
    if key.len() > MAX_TAG_KEY_LEN {
        return Err(invalid(format!("key exceeds {MAX_TAG_KEY_LEN} characters")));
    }
    if value.len() > MAX_TAG_VALUE_LEN {
        return Err(invalid(format!(
            "value exceeds {MAX_TAG_VALUE_LEN} characters"
        )));
    }
    if key.to_ascii_lowercase().starts_with(PROVIDER_PREFIX) {
        return Err(invalid(format!("prefix '{PROVIDER_PREFIX}' is reserved")));
    }
    Ok(())
}
