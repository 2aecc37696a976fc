//! Error types for the viewer core.

use serde::{Deserialize, Serialize};

/// Errors surfaced by the viewer core.
///
/// Asset errors (missing skeleton/atlas/texture page) are not recovered
/// locally; they propagate to the loading collaborator, which resets its own
/// load state and presents a message. Control operations issued while no rig
/// is live never produce an error; they degrade to silent no-ops.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum RigError {
    /// The loaded file set contains neither a json nor a skel skeleton.
    #[error("no skeleton file (json or skel) in the loaded set")]
    MissingSkeleton,

    /// The loaded file set contains no atlas.
    #[error("no atlas file in the loaded set")]
    MissingAtlas,

    /// An image page referenced by the atlas has no matching file entry.
    #[error("atlas page '{page}' has no matching image file")]
    MissingTexturePage { page: String },

    /// A file entry's payload kind does not match its declared type.
    #[error("file '{name}' is not usable as {expected}")]
    InvalidFileData { name: String, expected: String },

    /// A color string could not be parsed.
    #[error("invalid color value: {value}")]
    InvalidColor { value: String },

    /// Failure reported by the rendering backend (malformed skeleton data,
    /// incompatible runtime version, resource exhaustion).
    #[error("rendering backend error: {reason}")]
    Backend { reason: String },
}

impl RigError {
    /// Create a backend error from any displayable reason.
    pub fn backend(reason: impl Into<String>) -> Self {
        Self::Backend {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for RigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Backend {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_constructor() {
        let err = RigError::backend("unsupported skeleton version");
        assert!(matches!(err, RigError::Backend { .. }));
        assert_eq!(
            err.to_string(),
            "rendering backend error: unsupported skeleton version"
        );
    }

    #[test]
    fn serialization_round_trip() {
        let err = RigError::MissingTexturePage {
            page: "hero.png".into(),
        };
        let json = serde_json::to_string(&err).unwrap();
        let back: RigError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, back);
    }
}
