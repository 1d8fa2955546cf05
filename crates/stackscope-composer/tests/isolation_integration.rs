//! Cross-environment isolation properties of names and policies

use proptest::prelude::*;
use stackscope_common::{NamingConfig, ResourceKind, ResourceNamer, ScopeError, TagSpec};
use stackscope_composer::{AccessLevel, AccessPolicyBuilder, AccountScope};
use stackscope_test_utils::{
    app_identity_strategy, base_name_strategy, environment_strategy, kind_strategy, naming_config,
};

#[test]
fn test_otp_template_example() {
    let test = naming_config("test");
    let name = ResourceNamer::physical_name(&test, ResourceKind::Template, "otp").unwrap();
    assert_eq!(name, "appre-template-otp-test");

    let prod = naming_config("prod");
    let err = ResourceNamer::extract_base_name(name.as_str(), &prod, ResourceKind::Template)
        .unwrap_err();
    assert!(matches!(err, ScopeError::UnresolvableName { .. }));
}

#[test]
fn test_delimiter_in_base_name_rejected() {
    let err = ResourceNamer::physical_name(&naming_config("test"), ResourceKind::Template, "otp-test")
        .unwrap_err();
    assert!(matches!(err, ScopeError::InvalidBaseName { .. }));
}

#[test]
fn test_test_and_production_coexist() {
    let test = naming_config("test");
    let prod = naming_config("production");
    let scope = AccountScope::default();

    for kind in [
        ResourceKind::Table,
        ResourceKind::Queue,
        ResourceKind::Template,
        ResourceKind::Function,
    ] {
        let test_stmts = AccessPolicyBuilder::new(&test)
            .grant(kind, AccessLevel::ReadWrite, &[], &scope)
            .unwrap();
        let prod_stmts = AccessPolicyBuilder::new(&prod)
            .grant(kind, AccessLevel::ReadWrite, &[], &scope)
            .unwrap();
        let (test_stmt, prod_stmt) = (&test_stmts[0], &prod_stmts[0]);

        let test_arn = scope.resource_arn(
            kind,
            ResourceNamer::physical_name(&test, kind, "otp").unwrap().as_str(),
        );
        let prod_arn = scope.resource_arn(
            kind,
            ResourceNamer::physical_name(&prod, kind, "otp").unwrap().as_str(),
        );
        let test_tags = TagSpec::tags_for(&test, &[]).unwrap();
        let prod_tags = TagSpec::tags_for(&prod, &[]).unwrap();

        let action = test_stmt.actions().iter().next().unwrap().as_str();
        assert!(test_stmt.permits(action, &test_arn, &test_tags));
        assert!(!test_stmt.permits(action, &prod_arn, &prod_tags));
        assert!(prod_stmt.permits(action, &prod_arn, &prod_tags));
        assert!(!prod_stmt.permits(action, &test_arn, &test_tags));
    }
}

#[test]
fn test_identity_store_isolated_by_tag_alone() {
    let test = naming_config("test");
    let prod = naming_config("production");
    let scope = AccountScope::default();
    let kind = ResourceKind::IdentityStore;

    let statements = AccessPolicyBuilder::new(&test)
        .grant(kind, AccessLevel::Read, &["users"], &scope)
        .unwrap();
    let stmt = &statements[0];
    // Pool ARNs don't carry the name, so the resource pattern matches both.
    let pool_arn = "arn:aws:cognito-idp:us-east-2:123456789012:userpool/us-east-2_AbCdEf";

    assert!(stmt.permits(
        "cognito-idp:AdminGetUser",
        pool_arn,
        &TagSpec::tags_for(&test, &[]).unwrap()
    ));
    assert!(!stmt.permits(
        "cognito-idp:AdminGetUser",
        pool_arn,
        &TagSpec::tags_for(&prod, &[]).unwrap()
    ));
}

proptest! {
    #[test]
    fn test_statement_never_crosses_environments(
        app in app_identity_strategy(),
        env_a in environment_strategy(),
        env_b in environment_strategy(),
        kind in kind_strategy(),
        base in base_name_strategy(),
    ) {
        prop_assume!(env_a != env_b);
        let cfg_a = NamingConfig::new(app.as_str(), &env_a).unwrap();
        let cfg_b = NamingConfig::new(app.as_str(), &env_b).unwrap();
        let scope = AccountScope::default();

        let name_a = ResourceNamer::physical_name(&cfg_a, kind, &base).unwrap();
        let name_b = ResourceNamer::physical_name(&cfg_b, kind, &base).unwrap();
        prop_assert_ne!(name_a.as_str(), name_b.as_str());

        let statements = AccessPolicyBuilder::new(&cfg_a)
            .grant(kind, AccessLevel::ReadWrite, &[], &scope)
            .unwrap();
        let arn_b = scope.resource_arn(kind, name_b.as_str());
        let tags_b = TagSpec::tags_for(&cfg_b, &[]).unwrap();

        for stmt in &statements {
            for action in stmt.actions().iter() {
                prop_assert!(!stmt.permits(action.as_str(), &arn_b, &tags_b));
            }
        }
    }

    #[test]
    fn test_statement_reaches_own_environment(
        app in app_identity_strategy(),
        env in environment_strategy(),
        kind in kind_strategy(),
        base in base_name_strategy(),
    ) {
        let cfg = NamingConfig::new(app.as_str(), &env).unwrap();
        let scope = AccountScope::default();

        let statements = AccessPolicyBuilder::new(&cfg)
            .grant(kind, AccessLevel::Read, &[], &scope)
            .unwrap();
        let name = ResourceNamer::physical_name(&cfg, kind, &base).unwrap();
        let arn = scope.resource_arn(kind, name.as_str());
        let tags = TagSpec::tags_for(&cfg, &[]).unwrap();

        let action = statements[0].actions().iter().next().unwrap().as_str().to_string();
        prop_assert!(statements[0].permits(&action, &arn, &tags));
    }
}
