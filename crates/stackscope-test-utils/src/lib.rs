//! Shared test utilities for stackscope
//!
//! This crate provides common fixtures and proptest strategies that can be
//! used across the workspace's unit and integration tests.
//!
//! ## Modules
//!
//! - [`fixtures`]: Naming configs and sample stack specs
//! - [`strategies`]: proptest strategies for names, environments and kinds

pub mod fixtures;
pub mod strategies;

// Re-export commonly used items
pub use fixtures::{naming_config, sample_stack_json, unique_app_identity};
pub use strategies::{
    app_identity_strategy, base_name_strategy, environment_strategy, kind_strategy,
};
