//! In-flight correlation ledger.
//!
//! Tracks which `(region, node label, operation)` triples have been
//! dispatched and not yet finished. A second claim of a live key is refused;
//! the service turns that into an idempotent no-op.

use std::collections::HashSet;
use std::fmt;

use nodescale_common::RegionId;
use serde::Serialize;

/// Lifecycle operation kinds, as used for deduplication.
///
/// Pool reclaim shares `Down` with a regular scale-down: both tear the same
/// node down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Up,
    Down,
    Reassign,
    Terminate,
}

impl Operation {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Reassign => "reassign",
            Self::Terminate => "terminate",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InFlightKey {
    pub region: RegionId,
    pub node_label: String,
    pub op: Operation,
}

impl InFlightKey {
    #[must_use]
    pub fn new(region: RegionId, node_label: &str, op: Operation) -> Self {
        Self {
            region,
            node_label: node_label.to_string(),
            op,
        }
    }
}

#[derive(Debug, Default)]
pub struct InFlightLedger {
    entries: HashSet<InFlightKey>,
}

impl InFlightLedger {
    /// Record `key` as in flight. Returns `false` if it already was.
    pub fn try_claim(&mut self, key: InFlightKey) -> bool {
        self.entries.insert(key)
    }

    /// Forget `key`. Returns `false` if it was not in flight.
    pub fn release(&mut self, key: &InFlightKey) -> bool {
        self.entries.remove(key)
    }

    #[must_use]
    pub fn contains(&self, key: &InFlightKey) -> bool {
        self.entries.contains(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
