//! Foundation types shared by every later stage of the pipeline.
//!
//! Unlike a typical LSP-facing `Position`/`Span` pair (0-indexed, built for
//! editor ranges), positions here are 1-indexed: line 1, column 1 is the
//! first character of the source text. That is a deliberate divergence
//! driven by the diagnostic contract's invariant (`line >= 1`, `column >= 1`).

/// A 1-indexed source location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// The position of the first character of any source text.
    pub fn start() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}
