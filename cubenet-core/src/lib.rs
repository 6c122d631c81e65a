//! In-memory representation of Cube transit networks.
//!
//! The crate owns the typed records parsed out of Cube transit line files
//! (lines, links, park-and-ride lots, fare systems, PT system statements),
//! the aggregate [`network::NetworkModel`] with its identity-aware merge
//! rules, the structural [`validate`] checks, and the base-vs-build
//! [`diff`] engine. Parsing lives in the companion `cubenet-lin` crate;
//! this crate never touches the filesystem.

pub mod diff;
pub mod error;
pub mod model;
pub mod network;
pub mod validate;
