//! stackscope-common - Environment-scoped naming primitives
//!
//! This crate provides the pure naming, tagging and lifecycle types used by
//! the policy builder and stack composer. It performs no I/O and never reads
//! the process environment; callers pass a [`NamingConfig`] explicitly.
//!
//! ## Modules
//!
//! - [`defaults`]: Naming contract constants and serde defaults
//! - [`environment`]: Environment tokens, allow-list and classification
//! - [`error`]: The [`ScopeError`] taxonomy
//! - [`lifecycle`]: Retain/PITR decisions per environment class
//! - [`naming`]: Physical name generation and reverse extraction
//! - [`naming_config`]: Validated application identity + environment
//! - [`resolve`]: Base-name lookup for runtime callers
//! - [`resource_kind`]: Resource categories and naming constraints
//! - [`tags`]: Required tag set

pub mod defaults;
pub mod environment;
pub mod error;
pub mod lifecycle;
pub mod naming;
pub mod naming_config;
pub mod resolve;
pub mod resource_kind;
pub mod tags;

// Re-export commonly used types
pub use environment::{Environment, EnvironmentClass, KnownEnvironment};
pub use error::ScopeError;
pub use lifecycle::{LifecycleDecision, RemovalPolicy, ResourceLifecyclePolicy};
pub use naming::{PhysicalName, ResourceNamer};
pub use naming_config::NamingConfig;
pub use resolve::ResourceResolver;
pub use resource_kind::ResourceKind;
pub use tags::{TagSet, TagSpec};
