//! Naming configs and sample stack specs

use stackscope_common::NamingConfig;

/// Application identity used by fixtures
pub const TEST_APP_IDENTITY: &str = "appre";

/// Naming config for [`TEST_APP_IDENTITY`] in `environment`
///
/// # Panics
///
/// Panics if `environment` is not a valid token.
///
/// # Example
///
/// ```
/// use stackscope_test_utils::naming_config;
///
/// let cfg = naming_config("test");
/// assert_eq!(cfg.app_identity(), "appre");
/// ```
pub fn naming_config(environment: &str) -> NamingConfig {
    NamingConfig::new(TEST_APP_IDENTITY, environment)
        .unwrap_or_else(|e| panic!("invalid test environment {environment:?}: {e}"))
}

/// Generate a unique application identity.
///
/// Format: `app{counter}`, so tests composing stacks side by side never
/// share names.
///
/// ```
/// use stackscope_test_utils::unique_app_identity;
///
/// assert_ne!(unique_app_identity(), unique_app_identity());
/// ```
pub fn unique_app_identity() -> String {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);

    let counter = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("app{counter}")
}

/// Stack spec exercising every resource kind, a dead-letter queue, scoped
/// grants and one exempt grant
pub fn sample_stack_json() -> &'static str {
    r#"{
        "tables": [
            {"name": "otp", "partition_key": "email", "ttl_attribute": "expires_at"},
            {"name": "users", "partition_key": "user_id"}
        ],
        "queues": [
            {"name": "email", "dead_letter": true, "visibility_timeout_secs": 60}
        ],
        "templates": [
            {"name": "otp", "subject": "Your verification code"},
            {"name": "complete_registration_user_info"}
        ],
        "identity_stores": [
            {"name": "users"}
        ],
        "functions": [
            {
                "name": "pre_signup",
                "grants": [
                    {"kind": "table", "resources": ["otp"], "access": "read-write"},
                    {"kind": "queue", "resources": ["email"], "access": "write"}
                ]
            },
            {
                "name": "email_sender",
                "grants": [
                    {"kind": "queue", "resources": ["email"], "access": "read"},
                    {"kind": "template", "access": "write"}
                ],
                "exempt_grants": [
                    {"actions": ["ses:GetSendQuota"], "reason": "quota check before sending"}
                ]
            }
        ],
        "tags": {"CostCenter": "auth"}
    }"#
}
