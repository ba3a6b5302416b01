//! # AFS Architecture
//!
//! AFS is a **UI-agnostic item filtering library**. It decides which items of
//! a collection are visible given a set of active filter tokens, and in what
//! order and page they appear. Rendering, animation and DOM bindings live in
//! whatever UI drives it; the crate never touches any of that.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (main.rs, args.rs, cli/)                         │
//! │  - Loads catalog/config files, prints views                 │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Session facade: one method per user action               │
//! │  - Absorbs every error, emits events, returns FilterView    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Core (toggle, registry, logic, index, engine)              │
//! │  - Pure functions over explicit values                      │
//! │  - toggle: interaction → MutationPlan                       │
//! │  - logic: (categories, registry) → bool                     │
//! │  - engine: items → visible set + added/removed diff         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Secondary predicates (search, range, sort, paginate)       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Tokens and Modes
//!
//! A filter token is `type:value` (`brand:apple`), a bare `value`, or the
//! wildcard `*` meaning "no filter". Items carry a whitespace-separated list
//! of tokens. The global [`model::CategoryMode`] decides how active tokens
//! combine:
//!
//! - `OR`: an item needs any active token
//! - `AND`: an item needs every active token
//! - `mixed`: tokens are grouped by type; each group is satisfied under its
//!   own [`model::LogicMode`] (OR unless configured) and every group must be
//!   satisfied
//!
//! ## Failure Policy
//!
//! Filtering failures must never hide content. Bad configuration falls back
//! to OR, unknown controls and malformed tokens are ignored, and an empty
//! selection becomes the wildcard. Diagnostics go to `tracing` and, for
//! configuration, to [`config::Diagnostic`] records.
//!
//! ## Module Overview
//!
//! - [`api`]: The session facade
//! - [`toggle`]: Control bindings and toggle resolution
//! - [`registry`]: Active tokens, type logic, exclusivity policy
//! - [`logic`]: Category matching
//! - [`index`]: Cached per-item category sets
//! - [`engine`]: Visibility evaluation and diffs
//! - [`search`], [`range`], [`sort`], [`paginate`]: Secondary predicates and ordering
//! - [`events`]: Emitted events and sinks
//! - [`config`]: Configuration loading and normalisation
//! - [`model`]: Core data types
//! - [`error`]: Error types

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod index;
pub mod logic;
pub mod model;
pub mod paginate;
pub mod range;
pub mod registry;
pub mod search;
pub mod sort;
pub mod toggle;
