//! Compiler version information.
//!
//! The version is taken from Cargo metadata (`CARGO_PKG_VERSION`) at compile
//! time and exposed as a single constant; the CLI's `--version` output
//! reports it. Prefer this constant over repeating the `env!` lookup.

/// The routegen version string (for example, `0.1.0`).
pub const ROUTEGEN_VERSION: &str = env!("CARGO_PKG_VERSION");
