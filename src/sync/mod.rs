//! Reconciliation of the local image directory against remote emojis
//!
//! Each emoji name moves between two states across runs:
//!
//! ```text
//! Untracked --create--> Tracked(F)
//! Tracked(F) --file removed--> delete --> Untracked
//! Tracked(F) --content now F'--> delete + create --> Tracked(F')
//! Tracked(F) --unchanged--> Tracked(F)
//! ```
//!
//! The cache file is the only record of `F`; the remote service is consulted
//! for existence only.

use std::fmt;

pub mod reconciler;

pub use reconciler::Reconciler;

/// Tunables for a reconciliation run
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Abort instead of assuming no remote emojis when listing fails
    pub abort_on_list_failure: bool,
}

/// What happened to one emoji name during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    Created { id: String },
    Replaced { old_id: String, new_id: String },
    Unchanged,
    Deleted { id: String },
    /// Ignored, e.g. a second file with an already used name
    Skipped { reason: String },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncEvent {
    pub name: String,
    pub action: SyncAction,
}

impl SyncEvent {
    pub fn new(name: impl Into<String>, action: SyncAction) -> Self {
        Self {
            name: name.into(),
            action,
        }
    }
}

impl fmt::Display for SyncEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.action {
            SyncAction::Created { id } => write!(f, "{} (id {})", self.name, id),
            SyncAction::Replaced { old_id, new_id } => {
                write!(f, "{} (id {} -> {})", self.name, old_id, new_id)
            }
            SyncAction::Unchanged => write!(f, "{} is up to date", self.name),
            SyncAction::Deleted { id } => write!(f, "{} (id {})", self.name, id),
            SyncAction::Skipped { reason } | SyncAction::Failed { reason } => {
                write!(f, "{}: {}", self.name, reason)
            }
        }
    }
}

/// Everything a run did, in the order it happened
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub events: Vec<SyncEvent>,
}

impl SyncReport {
    pub fn action_for(&self, name: &str) -> Option<&SyncAction> {
        self.events
            .iter()
            .find(|event| event.name == name)
            .map(|event| &event.action)
    }

    fn count(&self, pred: impl Fn(&SyncAction) -> bool) -> usize {
        self.events.iter().filter(|event| pred(&event.action)).count()
    }

    pub fn created(&self) -> usize {
        self.count(|a| matches!(a, SyncAction::Created { .. }))
    }

    pub fn replaced(&self) -> usize {
        self.count(|a| matches!(a, SyncAction::Replaced { .. }))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|a| matches!(a, SyncAction::Unchanged))
    }

    pub fn deleted(&self) -> usize {
        self.count(|a| matches!(a, SyncAction::Deleted { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|a| matches!(a, SyncAction::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|a| matches!(a, SyncAction::Failed { .. }))
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    /// Whether the run changed anything remotely
    pub fn is_noop(&self) -> bool {
        self.created() + self.replaced() + self.deleted() == 0
    }
}
