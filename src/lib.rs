#![forbid(unsafe_code)]
//! routegen - a build-time router compiler
//!
//! Route tables are written declaratively against the no-op marker API in
//! `routegen_runtime`. This crate reads such a file, extracts the
//! registrations into a path-segment tree, and synthesizes a standalone
//! dispatcher as Rust source text: nested conditionals, no tables, no
//! runtime route resolution.
//!
//! ## Pipeline
//!
//! - `analyzer` - parse the input and extract routes, imports and fallbacks
//! - `tree` - path-segment hierarchy the registrations collect into
//! - `generator` - dispatch source synthesis and formatting
//! - `cli` - the `routegen` binary surface
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `generator` modules
//!   enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **Generated code**: The generator emits source *text*; panics appearing there would belong to the generated
//!   program, and the emitted dispatcher contains none.

pub mod analyzer;
pub mod cli;
pub mod generator;
pub mod tree;
pub mod version;

pub use analyzer::{analyze_source, Analysis, AnalyzeError, RouterMetadata};
pub use generator::{GenerateError, GeneratedSource, Generator};
pub use tree::{clean_path, separate_path, HandlerRef, RouteTree};
