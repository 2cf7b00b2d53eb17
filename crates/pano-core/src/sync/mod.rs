//! Collecting states and applying actions
//!
//! This module provides:
//! - **[`StateCollector`]**: produces a [`State`] from some storage
//! - **[`Executor`]**: applies one [`Action`] to some storage
//! - **[`execute_actions`]**: runs an [`ActionSet`](crate::ActionSet) through an executor and
//!   reports per-action outcomes in a [`SyncReport`]

mod engine;
mod report;

pub use engine::{NoProgress, Progress, execute_actions};
pub use report::{SyncOptions, SyncReport};

use async_trait::async_trait;

use crate::reconcile::Action;
use crate::state::State;

/// Source of a complete [`State`].
///
/// Collection is all-or-nothing: an entity that could not be read must fail
/// the whole collection, otherwise it would be reconciled as a delete.
#[async_trait]
pub trait StateCollector: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn collect(&self) -> Result<State, Self::Error>;
}

/// Applies actions to a storage. Applying the same action twice must leave
/// the storage in the same state as applying it once.
#[async_trait]
pub trait Executor: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn execute(&self, action: &Action) -> Result<(), Self::Error>;
}
