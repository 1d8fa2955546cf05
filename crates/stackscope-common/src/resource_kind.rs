//! Resource kinds and their naming constraints
//!
//! Each kind contributes a namespace segment to the physical name and
//! restricts which characters a base name may use. The namespace segments
//! never contain the delimiter, which keeps physical names unambiguous.

use serde::{Deserialize, Serialize};

/// Categories of cloud resources named by stackscope
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ResourceKind {
    /// Key-value data table
    Table,
    /// Message queue
    Queue,
    /// Message (email) template
    Template,
    /// User/identity pool
    IdentityStore,
    /// Serverless function
    Function,
}

impl ResourceKind {
    /// Namespace segment embedded in physical names
    pub fn namespace(self) -> &'static str {
        match self {
            ResourceKind::Table => "table",
            ResourceKind::Queue => "queue",
            ResourceKind::Template => "template",
            ResourceKind::IdentityStore => "identity",
            ResourceKind::Function => "function",
        }
    }

    /// Maximum length of a physical name of this kind
    ///
    /// Limits follow the provider's identifier rules:
    /// - tables: 255
    /// - queues: 80
    /// - templates: 64
    /// - identity stores: 128
    /// - functions: 64
    pub fn max_name_len(self) -> usize {
        match self {
            ResourceKind::Table => 255,
            ResourceKind::Queue => 80,
            ResourceKind::Template => 64,
            ResourceKind::IdentityStore => 128,
            ResourceKind::Function => 64,
        }
    }

    /// Check whether `c` may appear in a base name of this kind
    ///
    /// All kinds accept lowercase alphanumerics and `_`. Tables also accept `.`.
    pub fn allows_base_char(self, c: char) -> bool {
        match c {
            'a'..='z' | '0'..='9' | '_' => true,
            '.' => self == ResourceKind::Table,
            _ => false,
        }
    }

    /// Whether PITR applies to this kind
    pub fn supports_point_in_time_recovery(self) -> bool {
        self == ResourceKind::Table
    }
}
