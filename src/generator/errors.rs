//! Failure modes of dispatcher synthesis.

use std::fmt;

/// Errors raised while assembling generated source.
///
/// Formatting problems are deliberately not represented here; the generator
/// degrades to unformatted token text and reports a warning instead.
#[derive(Debug)]
pub enum GenerateError {
    /// A fragment of generated source did not parse back as Rust.
    SynParse(syn::Error),
    /// An import recorded from the input could not be re-tokenized.
    ImportSyntax { import: String, message: String },
    /// Two parameter segments sit in separate subtrees; regions are cut
    /// along a single nested chain, so such a table cannot be compiled.
    ParameterFork { outer: String, inner: String },
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::SynParse(e) => {
                write!(f, "generated fragment failed to parse: {e}")
            }
            GenerateError::ImportSyntax { import, message } => {
                write!(f, "import `{import}` could not be re-emitted: {message}")
            }
            GenerateError::ParameterFork { outer, inner } => {
                write!(
                    f,
                    "parameter `:{inner}` is not nested under `:{outer}`; \
                     parameter segments must form a single chain"
                )
            }
        }
    }
}

impl std::error::Error for GenerateError {}

impl From<syn::Error> for GenerateError {
    fn from(e: syn::Error) -> GenerateError {
        GenerateError::SynParse(e)
    }
}
