//! gitlab
//!
//! The API-client boundary for the remote GitLab instance.
//!
//! # Architecture
//!
//! The scope engine depends on the [`GitLabApi`] trait, never on a concrete
//! client. Production wires up [`rest::RestApi`]; tests use [`mock::MockApi`].
//! Failures surface through the [`ApiError`] taxonomy: a dead remote aborts
//! the pipeline, a project without a repository is a per-item condition the
//! contributor filter absorbs.
//!
//! # Modules
//!
//! - `traits`: the `GitLabApi` trait, domain records, and `ApiError`
//! - [`rest`]: GitLab v4 REST implementation with transparent pagination
//! - [`mock`]: deterministic in-memory implementation for tests

pub mod mock;
pub mod rest;
mod traits;

pub use traits::*;
