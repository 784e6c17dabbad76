//! Error types for Cellar.
//!
//! None of these are recoverable inside a session: the runtime stops at the
//! first error and the caller decides how to report it. End of input travels
//! through the same type so that `?` unwinds the reader cleanly.

use std::io;

use thiserror::Error;

/// The result type used throughout Cellar.
pub type Result<T> = std::result::Result<T, LispError>;

#[derive(Error, Debug)]
pub enum LispError {
    /// Input is exhausted. This is the normal end of a session.
    #[error("end of input")]
    EndOfInput,

    /// A `)` appeared where an object was expected.
    #[error("unbalanced ')'")]
    UnbalancedClose,

    /// Input ended inside an open list.
    #[error("unexpected end of input inside a list")]
    UnclosedList,

    /// The dotted separator was misplaced, e.g. `(∙ A)` or `(A ∙ B C)`.
    #[error("malformed dotted list")]
    MalformedDot,

    #[error("unbound symbol: {0}")]
    UnboundSymbol(String),

    #[error("not callable: {0}")]
    NotCallable(String),

    #[error("{op}: not a pair: {value}")]
    NotAPair { op: &'static str, value: String },

    #[error("cond: no clause matched")]
    CondExhausted,

    #[error("heap exhausted: {limit} live pairs")]
    HeapExhausted { limit: usize },

    #[error("recursion depth {limit} exceeded")]
    DepthExceeded { limit: usize },

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

impl LispError {
    /// True when the session ended because input ran out.
    pub fn is_end_of_input(&self) -> bool {
        matches!(self, LispError::EndOfInput)
    }
}
