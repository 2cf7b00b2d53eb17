//! Filesystem layer for the pano CLI
//!
//! Provides normalized path handling, the on-disk layout constants of a
//! model repository, atomic document I/O and a format-agnostic document store.

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use constants::{FileExtension, PanoPath};
pub use error::{Error, Result};
pub use path::NormalizedPath;
