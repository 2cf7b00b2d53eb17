//! Outcome of a sync run

use serde::{Deserialize, Serialize};

/// Report from applying an action set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncReport {
    /// Whether every action was applied
    pub success: bool,
    /// Actions applied (or, in dry-run mode, that would be applied)
    pub actions: Vec<String>,
    /// Failures, one per failed action
    pub errors: Vec<String>,
}

impl SyncReport {
    /// Create a successful sync report
    pub fn success() -> Self {
        Self {
            success: true,
            actions: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Create a failed sync report
    pub fn failure(errors: Vec<String>) -> Self {
        Self {
            success: false,
            actions: Vec::new(),
            errors,
        }
    }

    /// Add an action to the report
    pub fn with_action(mut self, action: String) -> Self {
        self.actions.push(action);
        self
    }

    pub(crate) fn record_error(&mut self, error: String) {
        self.success = false;
        self.errors.push(error);
    }

    /// True when nothing was done and nothing failed.
    pub fn is_noop(&self) -> bool {
        self.actions.is_empty() && self.errors.is_empty()
    }
}

/// Options for applying actions
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// If true, simulate changes without touching the target.
    /// Actions will be prefixed with "[dry-run] Would ..."
    pub dry_run: bool,
}
