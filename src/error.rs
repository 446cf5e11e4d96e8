//! Internal invariant errors.
//!
//! These never cross the public API as a `Result` — `tokenize`/`analyze`
//! always return a plain record. When one of these is raised internally,
//! `analyze` catches it and converts it into the single fixed `GRAMMAR`
//! diagnostic the error-handling design calls for, with `ast = None`.

/// A condition the parser's control-flow assumes can never happen.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum InternalError {
    #[error("block stack underflow while closing a block")]
    BlockStackUnderflow,

    #[error("parser made no progress at token index {index}")]
    NoProgress { index: usize },

    #[error("recursion depth exceeded {limit} while parsing")]
    DepthExceeded { limit: usize },
}

impl InternalError {
    /// The single fixed message collaborators see for any internal
    /// invariant violation, regardless of which one fired.
    pub const FIXED_MESSAGE: &'static str =
        "internal parser error: analysis could not complete";
}
