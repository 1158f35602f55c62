//! glscope - resolve GitLab project scopes and render them
//!
//! glscope answers one question: "which projects am I acting on?" It resolves
//! a group/user selector against a GitLab instance, optionally narrows the
//! result to projects a given identity created or committed to, and renders
//! the final set either as a flat listing or as myrepos-style checkout
//! configuration for batch multi-repository checkouts.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to scope)
//! - [`scope`] - Resolve → Collect → Filter → Render pipeline
//! - [`gitlab`] - The API-client boundary (trait, REST client, mock)
//! - [`config`] - TOML configuration with env-var overrides
//! - [`ui`] - Diagnostic output gated by verbosity
//!
//! # Correctness Invariants
//!
//! 1. A project appears at most once in a scope, however many namespaces
//!    reach it
//! 2. Rendering is deterministic: same scope in, same lines out
//! 3. A project without a readable repository is skipped, never fatal
//! 4. A selector that matches nothing aborts instead of silently widening
//!    the scope to everything

pub mod cli;
pub mod config;
pub mod gitlab;
pub mod scope;
pub mod ui;
