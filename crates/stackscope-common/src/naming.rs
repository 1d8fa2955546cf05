//! Physical resource naming
//!
//! Physical names follow a fixed, bit-exact layout:
//!
//! ```text
//! {app_identity}-{namespace}-{base_name}-{environment}
//! ```
//!
//! The environment is always the last segment, so every resource of one
//! environment shares a greppable suffix. Base names and environments never
//! contain the delimiter, which makes the mapping injective and reversible.
//! This is the only place an environment suffix is applied: callers pass
//! environment-agnostic base names.

use crate::defaults::NAME_DELIMITER;
use crate::environment::Environment;
use crate::error::ScopeError;
use crate::naming_config::NamingConfig;
use crate::resource_kind::ResourceKind;
use serde::{Serialize, Serializer};
use std::fmt;
use tracing::trace;

/// A generated physical name, remembering the kind and naming config it was
/// generated for
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhysicalName {
    name: String,
    kind: ResourceKind,
    config: NamingConfig,
}

impl PhysicalName {
    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn environment(&self) -> &Environment {
        self.config.environment()
    }

    pub fn naming_config(&self) -> &NamingConfig {
        &self.config
    }
}

impl fmt::Display for PhysicalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl AsRef<str> for PhysicalName {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

impl PartialEq<str> for PhysicalName {
    fn eq(&self, other: &str) -> bool {
        self.name == other
    }
}

impl PartialEq<&str> for PhysicalName {
    fn eq(&self, other: &&str) -> bool {
        self.name == *other
    }
}

impl Serialize for PhysicalName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}

/// Maps logical base names to physical names and back
pub struct ResourceNamer;

impl ResourceNamer {
    /// Generate the physical name for `base_name`
    ///
    /// Rejects base names that are empty, contain the delimiter, use
    /// characters outside the kind's class, or would push the name past the
    /// kind's length limit. Input is never sanitized.
    pub fn physical_name(
        config: &NamingConfig,
        kind: ResourceKind,
        base_name: &str,
    ) -> Result<PhysicalName, ScopeError> {
        validate_base_name(kind, base_name).map_err(|reason| ScopeError::InvalidBaseName {
            kind,
            base_name: base_name.to_string(),
            reason,
        })?;

        let name = format!(
            "{app}{d}{ns}{d}{base}{d}{env}",
            app = config.app_identity(),
            ns = kind.namespace(),
            base = base_name,
            env = config.environment(),
            d = NAME_DELIMITER,
        );

        if name.len() > kind.max_name_len() {
            return Err(ScopeError::InvalidBaseName {
                kind,
                base_name: base_name.to_string(),
                reason: format!(
                    "physical name '{name}' exceeds {} characters",
                    kind.max_name_len()
                ),
            });
        }

        trace!(%kind, base_name, physical_name = %name, "Generated physical name");

        Ok(PhysicalName {
            name,
            kind,
            config: config.clone(),
        })
    }

    /// Recover the base name from a physical name
    ///
    /// Fails if the app identity, namespace or environment segments do not
    /// match `config` and `kind`, which guards against resolving another
    /// environment's resource.
    pub fn extract_base_name(
        physical: &str,
        config: &NamingConfig,
        kind: ResourceKind,
    ) -> Result<String, ScopeError> {
        let unresolvable = |reason: String| ScopeError::UnresolvableName {
            kind,
            physical_name: physical.to_string(),
            app_identity: config.app_identity().to_string(),
            environment: config.environment().to_string(),
            reason,
        };

        let prefix = format!(
            "{}{d}{}{d}",
            config.app_identity(),
            kind.namespace(),
            d = NAME_DELIMITER
        );
        let suffix = format!("{NAME_DELIMITER}{}", config.environment());

        let rest = physical
            .strip_prefix(&prefix)
            .ok_or_else(|| unresolvable(format!("expected prefix '{prefix}'")))?;
        let base = rest
            .strip_suffix(&suffix)
            .ok_or_else(|| unresolvable(format!("expected environment suffix '{suffix}'")))?;

        validate_base_name(kind, base).map_err(unresolvable)?;
        Ok(base.to_string())
    }

    /// Pattern matching every physical name of `kind` in this environment
    pub fn name_pattern(config: &NamingConfig, kind: ResourceKind) -> String {
        format!(
            "{app}{d}{ns}{d}*{d}{env}",
            app = config.app_identity(),
            ns = kind.namespace(),
            env = config.environment(),
            d = NAME_DELIMITER,
        )
    }
}

/// Check a base name against the character class of `kind`
pub fn validate_base_name(kind: ResourceKind, base_name: &str) -> Result<(), String> {
    let Some(first) = base_name.chars().next() else {
        return Err("base name cannot be empty".to_string());
    };
    if base_name.contains(NAME_DELIMITER) {
        return Err(format!("contains delimiter '{NAME_DELIMITER}'"));
    }
    if let Some(bad) = base_name.chars().find(|&c| !kind.allows_base_char(c)) {
        return Err(format!("contains forbidden character {bad:?}"));
    }
    if !first.is_ascii_alphanumeric() {
        return Err("must start with a letter or digit".to_string());
    }
    Ok(())
}
