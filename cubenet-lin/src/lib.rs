//! Parser for the Cube transit line-file family.
//!
//! A [`lexer`] tokenizes the text, the [`grammar`] folds tokens into
//! tagged leaves with byte spans, and [`convert`] turns leaves into the
//! typed records of `cubenet-core`, routed by [`convert::FileKind`]. The
//! [`reader`] module supplies the file-level entry points and the [`app`]
//! module the CLI that drives the parse-merge-validate-diff pipeline.

pub mod app;
pub mod convert;
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod reader;
