//! Engine fault taxonomy.
//!
//! None of these cross the public API as a returned error during normal
//! operation: the manager absorbs them per element and hands them to the
//! injected observer.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StickyError {
    #[error("element `{0}` is no longer attached to the visual tree")]
    DetachedElement(String),

    /// A parent, container or reference node could not be resolved.
    #[error("element `{id}`: cannot resolve {what}")]
    MissingGeometry { id: String, what: &'static str },
}

impl StickyError {
    pub fn missing(id: &str, what: &'static str) -> Self {
        Self::MissingGeometry {
            id: id.to_string(),
            what,
        }
    }

    /// Element id the fault belongs to.
    pub fn element_id(&self) -> &str {
        match self {
            Self::DetachedElement(id) => id,
            Self::MissingGeometry { id, .. } => id,
        }
    }
}
