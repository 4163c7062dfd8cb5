//! Collector errors

/// Errors surfaced by [`Collector`](super::Collector) operations
///
/// Collaborator failures (status and link resolution) are carried as
/// `anyhow::Error` sources so the traversal caller can print the full chain.
#[derive(Debug, thiserror::Error)]
pub enum CollectorError {
    /// The object has no readable uid or name
    #[error("unable to read {field} of {kind}")]
    MissingIdentity { kind: String, field: &'static str },

    /// The object could not be interpreted as its concrete kind
    #[error("unable to convert object to {target}")]
    Conversion {
        target: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Status resolution failed for a pod group member
    #[error("getting status for pod {name}")]
    Status {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    /// No navigable path could be produced for the object
    #[error("resolving path for {name}")]
    Link {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    /// Wraps any of the above with the object's kind and, when readable, name
    #[error("processing {gvk} {}", .name.as_deref().unwrap_or("<unknown>"))]
    Processing {
        gvk: String,
        name: Option<String>,
        #[source]
        source: Box<CollectorError>,
    },
}

impl CollectorError {
    /// The innermost collector error, skipping `Processing` wrappers
    pub fn root(&self) -> &CollectorError {
        match self {
            CollectorError::Processing { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type CollectorResult<T> = Result<T, CollectorError>;
