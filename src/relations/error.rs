use thiserror::Error;

/// Problems found in a character's relationship data. These are logged and
/// the offending entry skipped; extraction itself never fails.
#[derive(Debug, Error)]
pub enum RelationError {
    #[error("character {character}: `extra` is {found}, expected an object")]
    MalformedExtra {
        character: String,
        found: &'static str,
    },
    #[error("character {character}: `extra` holds a string that is not JSON: {source}")]
    UnreadableExtra {
        character: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("character {character}: `relationships` is {found}, expected an array")]
    MalformedList {
        character: String,
        found: &'static str,
    },
    #[error("character {character}: relationship entry {index} is unreadable: {reason}")]
    MalformedEntry {
        character: String,
        index: usize,
        reason: String,
    },
    #[error("character {character}: annotation {annotation:?} is not of the form `name (relation)`")]
    UnparsedAnnotation {
        character: String,
        annotation: String,
    },
    #[error("character {character}: no known character matches {target:?}")]
    UnresolvedTarget { character: String, target: String },
    #[error("character {character}: relationship targets unknown character id {target_id:?}")]
    DanglingTarget {
        character: String,
        target_id: String,
    },
    #[error("character {character}: relationship points back at itself")]
    SelfRelation { character: String },
}

impl RelationError {
    /// Shape errors mean the stored data is wrong; the rest are expected
    /// gaps in best-effort matching.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::MalformedExtra { .. }
                | Self::UnreadableExtra { .. }
                | Self::MalformedList { .. }
                | Self::MalformedEntry { .. }
                | Self::DanglingTarget { .. }
        )
    }
}
