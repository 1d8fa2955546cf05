//! Logical-name resolution for runtime callers
//!
//! Code that uses a resource (e.g. a sender picking a message template)
//! refers to it by base name only. A [`ResourceResolver`] built from the
//! current naming config maps those base names to physical names, so the
//! environment is applied once, inside the namer.

use crate::error::ScopeError;
use crate::naming::{PhysicalName, ResourceNamer};
use crate::naming_config::NamingConfig;
use crate::resource_kind::ResourceKind;
use std::collections::BTreeMap;

/// Precomputed base-name → physical-name lookup for one kind
#[derive(Debug, Clone)]
pub struct ResourceResolver {
    kind: ResourceKind,
    names: BTreeMap<String, PhysicalName>,
}

impl ResourceResolver {
    /// Register `base_names` for `kind` under `config`
    ///
    /// Fails on the first invalid or duplicate base name.
    pub fn new<'a>(
        config: &NamingConfig,
        kind: ResourceKind,
        base_names: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, ScopeError> {
        let mut names = BTreeMap::new();
        for base in base_names {
            let physical = ResourceNamer::physical_name(config, kind, base)?;
            if names.insert(base.to_string(), physical).is_some() {
                return Err(ScopeError::DuplicateResource {
                    kind,
                    base_name: base.to_string(),
                });
            }
        }
        Ok(Self { kind, names })
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Look up the physical name for a registered base name
    pub fn resolve(&self, base_name: &str) -> Result<&PhysicalName, ScopeError> {
        self.names
            .get(base_name)
            .ok_or_else(|| ScopeError::UnknownResource {
                kind: self.kind,
                base_name: base_name.to_string(),
                available: self.names.keys().cloned().collect(),
            })
    }

    pub fn base_names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATES: &[&str] = &[
        "otp",
        "welcome",
        "complete_registration_user_info",
        "complete_registration_stripe",
        "newsletter",
    ];

    #[test]
    fn test_resolves_registered_templates() {
        let config = NamingConfig::new("appre", "test").unwrap();
        let resolver =
            ResourceResolver::new(&config, ResourceKind::Template, TEMPLATES.iter().copied())
                .unwrap();

        assert_eq!(resolver.len(), TEMPLATES.len());
        assert_eq!(resolver.resolve("otp").unwrap(), "appre-template-otp-test");
        assert_eq!(
            resolver.resolve("newsletter").unwrap(),
            "appre-template-newsletter-test"
        );
    }

    #[test]
    fn test_unknown_lists_available() {
        let config = NamingConfig::new("appre", "test").unwrap();
        let resolver =
            ResourceResolver::new(&config, ResourceKind::Template, ["otp", "welcome"]).unwrap();

        match resolver.resolve("invoice").unwrap_err() {
            ScopeError::UnknownResource {
                kind,
                base_name,
                available,
            } => {
                assert_eq!(kind, ResourceKind::Template);
                assert_eq!(base_name, "invoice");
                assert_eq!(available, vec!["otp", "welcome"]);
            }
            other => panic!("expected UnknownResource, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_duplicates_and_invalid_names() {
        let config = NamingConfig::new("appre", "test").unwrap();
        assert!(matches!(
            ResourceResolver::new(&config, ResourceKind::Queue, ["email", "email"]),
            Err(ScopeError::DuplicateResource { .. })
        ));
        assert!(matches!(
            ResourceResolver::new(&config, ResourceKind::Queue, ["email-test"]),
            Err(ScopeError::InvalidBaseName { .. })
        ));
    }

    #[test]
    fn test_same_base_names_resolve_per_environment() {
        let test = NamingConfig::new("appre", "test").unwrap();
        let prod = NamingConfig::new("appre", "production").unwrap();
        let test_resolver = ResourceResolver::new(&test, ResourceKind::Template, ["otp"]).unwrap();
        let prod_resolver = ResourceResolver::new(&prod, ResourceKind::Template, ["otp"]).unwrap();

        assert_ne!(
            test_resolver.resolve("otp").unwrap(),
            prod_resolver.resolve("otp").unwrap()
        );
        assert_eq!(
            prod_resolver.resolve("otp").unwrap(),
            "appre-template-otp-production"
        );
    }
}
