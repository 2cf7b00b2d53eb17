//! Core orchestration layer for the pano CLI
//!
//! This crate sits between the entity model and the command layer and
//! implements:
//!
//! - **State**: immutable snapshots of entities keyed by identity
//! - **Reconciler**: the pure `(source, target) -> ActionSet` diff
//! - **Sync engine**: sequential execution of an [`ActionSet`] through an
//!   [`Executor`], collecting per-action failures into a [`SyncReport`]
//! - **Local repository**: the [`LocalCollector`] and [`LocalExecutor`] for a
//!   directory tree of YAML documents
//! - **Configuration**: user credentials and the per-repository context
//! - **Scaffolding**: field definitions for model fields that lack one
//!
//! # Architecture
//!
//! ```text
//!                  pano-cli
//!                     |
//!          +----------+----------+
//!          |                     |
//!      pano-core  <-------  pano-remote
//!          |
//!    +-----+------+
//!    |            |
//! pano-fs    pano-model
//! ```
//!
//! # Example
//!
//! ```ignore
//! use pano_core::{LocalCollector, StateCollector, reconcile};
//!
//! async fn pull(remote: &impl StateCollector<Error = pano_core::Error>) -> pano_core::Result<()> {
//!     let local = LocalCollector::new(".").collect().await?;
//!     let actions = reconcile(&remote.collect().await?, &local);
//!     for action in actions.iter() {
//!         println!("{}", action);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod local;
pub mod reconcile;
pub mod scaffold;
pub mod state;
pub mod sync;

pub use config::{Connection, ConnectionUpdate, Credentials, RepoContext, UserConfig};
pub use error::{Error, Result};
pub use local::{LocalCollector, LocalExecutor, RepoLayout};
pub use reconcile::{Action, ActionKind, ActionSet, reconcile};
pub use scaffold::{ScaffoldedField, missing_fields};
pub use state::{State, StateBuilder, StateEntry};
pub use sync::{Executor, NoProgress, Progress, StateCollector, SyncOptions, SyncReport, execute_actions};
