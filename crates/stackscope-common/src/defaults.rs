//! Default values shared by the library and the CLI
//!
//! These constants define the naming and tagging contract that other
//! systems depend on; changing them renames every resource.

/// Delimiter between physical name segments
pub const NAME_DELIMITER: char = '-';

/// Maximum length of an application identity
pub const MAX_APP_IDENTITY_LEN: usize = 32;

/// Maximum length of an environment token
pub const MAX_ENVIRONMENT_LEN: usize = 16;

/// Default cloud partition for ARNs
pub const DEFAULT_PARTITION: &str = "aws";

/// Wildcard used for unspecified ARN segments
pub const ARN_WILDCARD: &str = "*";

/// Suffix appended to a queue's base name for its dead-letter queue
pub const DEAD_LETTER_SUFFIX: &str = "_dlq";

/// Default queue visibility timeout in seconds
pub const DEFAULT_VISIBILITY_TIMEOUT_SECS: u32 = 30;

/// Default dead-letter redrive threshold
pub const DEFAULT_MAX_RECEIVE_COUNT: u32 = 3;

/// Runtime variable carrying the application identity
pub const ENV_APP_NAME: &str = "APP_NAME";

/// Runtime variable carrying the environment
pub const ENV_ENVIRONMENT: &str = "ENVIRONMENT";

// Serde default functions for struct field defaults

/// Returns the default visibility timeout
pub fn default_visibility_timeout_secs() -> u32 {
    DEFAULT_VISIBILITY_TIMEOUT_SECS
}

/// Returns the default max receive count
pub fn default_max_receive_count() -> u32 {
    DEFAULT_MAX_RECEIVE_COUNT
}

/// Returns the default partition
pub fn default_partition() -> String {
    DEFAULT_PARTITION.to_string()
}
