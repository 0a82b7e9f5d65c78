//! Error types for the fallible edges of the crate.
//!
//! Tree operations themselves never fail; configuration loading and snapshot
//! restoring do.

use thiserror::Error;

/// Result type alias for tree view operations.
pub type TreeResult<T> = Result<T, TreeError>;

/// Errors reported by configuration and snapshot handling.
#[derive(Error, Debug)]
pub enum TreeError {
    /// A configuration value is out of range.
    #[error("invalid config value for '{field}': {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },

    /// A snapshot refers to an item the model does not contain.
    #[error("snapshot {field} item is not present in the model")]
    UnknownItem { field: &'static str },

    /// TOML parsing error
    #[cfg(feature = "serde")]
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_field() {
        let err = TreeError::InvalidConfig {
            field: "auto_expand.node_children_limit",
            reason: "must be greater than zero",
        };
        assert_eq!(
            err.to_string(),
            "invalid config value for 'auto_expand.node_children_limit': must be greater than zero"
        );

        let err = TreeError::UnknownItem { field: "focused" };
        assert_eq!(
            err.to_string(),
            "snapshot focused item is not present in the model"
        );
    }
}
