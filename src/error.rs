//! Error types for building and rendering status maps

use thiserror::Error;

/// Errors that can occur while building, refreshing or rendering a map
#[derive(Debug, Error)]
pub enum MapError {
    /// Member configuration with a type discriminator no variant handles
    #[error("unsupported member object type '{object_type}' (object '{id}')")]
    UnsupportedType { object_type: String, id: String },

    /// Connector coordinates that are not exactly two numeric points
    #[error("invalid line coordinates for object '{id}': {reason}")]
    InvalidLineCoordinates { id: String, reason: String },

    /// The same entity id appears twice in one batch
    #[error("duplicate entity id '{id}'")]
    DuplicateId { id: String },

    /// Hover menu requested for an object that has no rendered node
    #[error("object '{id}' has not been rendered yet")]
    NotRendered { id: String },

    /// Failed to read a configuration, stylesheet or input file
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("failed to parse configuration TOML: {0}")]
    Config(#[from] toml::de::Error),

    /// Failed to parse JSON entity input
    #[error("failed to parse entity JSON: {0}")]
    Input(#[from] serde_json::Error),
}

impl MapError {
    /// Create an unsupported member type error
    pub fn unsupported(object_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::UnsupportedType {
            object_type: object_type.into(),
            id: id.into(),
        }
    }

    /// Create an invalid line coordinates error
    pub fn invalid_line(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidLineCoordinates {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Create a duplicate id error
    pub fn duplicate(id: impl Into<String>) -> Self {
        Self::DuplicateId { id: id.into() }
    }

    /// Create a not-rendered error
    pub fn not_rendered(id: impl Into<String>) -> Self {
        Self::NotRendered { id: id.into() }
    }

    /// Whether the error only affects a single map member
    pub fn is_member_local(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedType { .. }
                | Self::InvalidLineCoordinates { .. }
                | Self::DuplicateId { .. }
                | Self::NotRendered { .. }
        )
    }
}
