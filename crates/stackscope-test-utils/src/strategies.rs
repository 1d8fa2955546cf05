//! proptest strategies for naming inputs

use proptest::prelude::*;
use stackscope_common::ResourceKind;
use strum::IntoEnumIterator;

/// Valid base names for every kind: short enough to fit the tightest
/// length limit alongside [`app_identity_strategy`] and
/// [`environment_strategy`] values
pub fn base_name_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9][a-z0-9_]{0,15}"
}

/// Valid environment tokens, known or not
pub fn environment_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9]{1,12}"
}

/// Valid application identities, optionally hyphenated
pub fn app_identity_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,7}(-[a-z0-9]{1,6})?"
}

/// Any resource kind
pub fn kind_strategy() -> impl Strategy<Value = ResourceKind> {
    proptest::sample::select(ResourceKind::iter().collect::<Vec<_>>())
}
