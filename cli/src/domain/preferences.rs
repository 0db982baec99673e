//! Cluster preferences consulted when a request leaves a choice open.
//!
//! Pure types and policy — the store that loads and hot-reloads them lives in
//! `crate::infra::preferences`.

use serde::{Deserialize, Serialize};

/// A read-only snapshot of cluster-wide preferences.
///
/// Keys use the dotted preference names of the preference file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClusterPreferences {
    /// Launch new nodes as spot instances unless the request says otherwise.
    #[serde(rename = "cluster.spot")]
    pub cluster_spot: bool,
}

/// Resolve the spot policy of one request.
///
/// An explicit request value wins; otherwise the cluster default applies.
#[must_use]
pub fn resolve_spot(requested: Option<bool>, preferences: &ClusterPreferences) -> bool {
    requested.unwrap_or(preferences.cluster_spot)
}
