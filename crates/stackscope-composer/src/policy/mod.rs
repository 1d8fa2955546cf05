//! Environment-scoped access policies
//!
//! Statements are produced by [`AccessPolicyBuilder`] and collected into a
//! [`PolicyDocument`] for rendering.

pub mod actions;
pub mod builder;
pub mod document;
pub mod statement;

pub use actions::{AccessLevel, ActionId, ActionSet, Sensitivity};
pub use builder::AccessPolicyBuilder;
pub use document::PolicyDocument;
pub use statement::{Effect, Exemption, PolicyStatement, TagCondition, wildcard_match};
