//! Navigable paths for graph nodes

use anyhow::{Context, Result};
use kube::core::DynamicObject;
use url::Url;

use crate::models::{gvk_of, plural_of};

/// Turns an object reference into a path the rendering layer can navigate to
pub trait LinkResolver: Send + Sync {
    fn path_for(
        &self,
        object: &DynamicObject,
        name: &str,
        query: &[(String, String)],
    ) -> Result<String>;
}

/// Builds `/<prefix>/namespace/<ns>/<plural>/<name>` paths
///
/// Cluster-scoped objects drop the namespace segment. Query parameters are
/// appended in the order given.
#[derive(Debug, Clone)]
pub struct PathLinker {
    prefix: String,
}

impl PathLinker {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into().trim_matches('/').to_string(),
        }
    }
}

impl Default for PathLinker {
    fn default() -> Self {
        Self::new("overview")
    }
}

impl LinkResolver for PathLinker {
    fn path_for(
        &self,
        object: &DynamicObject,
        name: &str,
        query: &[(String, String)],
    ) -> Result<String> {
        let gvk = gvk_of(object);
        if gvk.kind.is_empty() {
            anyhow::bail!("object {} has no kind", name);
        }

        // Base is only used to get path-segment escaping from the url crate
        let mut url = Url::parse("http://localhost/").context("Failed to build base URL")?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| anyhow::anyhow!("URL cannot be a base"))?;
            segments.pop_if_empty();
            if !self.prefix.is_empty() {
                segments.extend(self.prefix.split('/'));
            }
            if let Some(namespace) = object.metadata.namespace.as_deref() {
                segments.push("namespace").push(namespace);
            }
            segments.push(&plural_of(&gvk.kind)).push(name);
        }

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        let mut path = url.path().to_string();
        if let Some(q) = url.query() {
            path.push('?');
            path.push_str(q);
        }
        Ok(path)
    }
}
