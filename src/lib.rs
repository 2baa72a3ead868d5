//! # Searchsync Core
//!
//! Row-to-document normalization core for a media search index.
//!
//! Transforms raw relational rows describing media items into flat,
//! fully derived search documents: aspect ratio and size classes,
//! authority scoring, maturity flagging, tag normalization, description
//! truncation, and file-extension extraction. Normalization is a pure
//! function of `(row, schema)` — no internal state, no I/O, identical
//! output for identical input — so rows can be processed concurrently
//! on any number of workers without coordination.
//!
//! This crate contains no tokio, sqlx, or other native-only
//! dependencies. Fetching rows from the source-of-truth store and
//! publishing documents into the search engine belong to the
//! surrounding sync driver, not to this crate.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | Output document and derived-field types |
//! | [`schema`] | Field-name → column-position mapping and typed row access |
//! | [`normalize`] | The normalizer and its derivation rules |
//! | [`policy`] | Category and authority collaborator traits + table-backed defaults |
//! | [`registry`] | Table-name → normalizer handler map |
//! | [`config`] | TOML policy configuration |
//! | [`error`] | Error taxonomy |

pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod policy;
pub mod registry;
pub mod schema;
