//! The local model repository
//!
//! A directory tree of YAML documents, one package directory per dataset:
//!
//! - [`RepoLayout`] maps entities to paths
//! - [`LocalCollector`] reads the tree into a [`State`](crate::State)
//! - [`LocalExecutor`] applies actions by writing and deleting documents

mod collector;
mod executor;
mod layout;

pub use collector::LocalCollector;
pub use executor::LocalExecutor;
pub use layout::{Package, RepoLayout};
