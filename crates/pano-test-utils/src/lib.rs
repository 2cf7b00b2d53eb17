//! Shared test utilities for the pano workspace.
//!
//! This crate provides standardised fixtures for the crate test suites. It is
//! a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`repo`]: [`TestRepo`] builder for on-disk model repositories
//! - [`catalog`]: [`FakeCatalog`], an in-memory remote catalog

pub mod catalog;
pub mod repo;

pub use catalog::FakeCatalog;
pub use repo::TestRepo;
