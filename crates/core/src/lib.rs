//! Domain logic shared by every other crate in the workspace.
//!
//! This crate has no internal dependencies and no I/O: identifiers, the
//! error taxonomy, pagination contracts, sort allow-lists, search-pattern
//! escaping, and content-length rules all live here so the repository and
//! API layers agree on them.

pub mod content;
pub mod error;
pub mod pagination;
pub mod search;
pub mod sort;
pub mod types;
