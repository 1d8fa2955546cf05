//! stackscope-composer - Environment-scoped policies and stack composition
//!
//! Builds IAM policies whose every data-plane statement is conditioned on
//! the target resource's `Environment` tag, and composes whole application
//! stacks (tables, queues, templates, identity stores, functions) from an
//! environment-agnostic spec.

pub mod arn;
pub mod config;
pub mod policy;
pub mod stack;

pub use arn::AccountScope;
pub use config::StackSpec;
pub use policy::{AccessLevel, AccessPolicyBuilder, Exemption, PolicyDocument, PolicyStatement};
pub use stack::{StackComposer, StackDefinition};
