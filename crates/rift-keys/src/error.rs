//! Identity derivation errors.

use std::fmt;
use thiserror::Error as ThisError;

/// Why a derivation request could not produce an identity.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum KeyError {
    /// The instance or record carries none of its type's identifying
    /// attribute sets in full. There is nothing to cache it under.
    #[error("{entity} instance has no fully-present identifying attribute set")]
    InsufficientIdentity { entity: &'static str },

    /// The query is structurally unusable for this entity type.
    #[error("malformed {entity} query: {reason}")]
    MalformedQuery {
        entity: &'static str,
        reason: MalformedReason,
    },
}

impl KeyError {
    pub fn entity(&self) -> &'static str {
        match self {
            KeyError::InsufficientIdentity { entity } => entity,
            KeyError::MalformedQuery { entity, .. } => entity,
        }
    }
}

/// The specific defect behind a [`KeyError::MalformedQuery`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    /// A declared discriminator is missing from the query.
    MissingDiscriminator(&'static str),
    /// No identifying attribute set is fully present in the query.
    UnsatisfiedIdentity,
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::MissingDiscriminator(attr) => {
                write!(f, "missing discriminator `{attr}`")
            }
            MalformedReason::UnsatisfiedIdentity => {
                write!(f, "no identifying attribute set is fully present")
            }
        }
    }
}
