//! Core of Cellar
//!
//! A minimal metacircular Lisp in the style of McCarthy's 1960 evaluator.
//! Atoms are interned names, pairs live in one growable cell store, and the
//! collector compacts that store after each top-level evaluation so that only
//! the result's structure survives.

pub mod config;
pub mod error;
pub mod eval;
pub mod gc;
pub mod heap;
pub mod interner;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod runtime;
pub mod source;
pub mod value;

// Re-export commonly used items for convenience
pub use config::Config;
pub use error::{LispError, Result};
pub use gc::{GcPolicy, GcStats};
pub use heap::{Cell, Heap};
pub use interner::{Builtins, SymbolTable};
pub use lexer::{Lexer, Token};
pub use printer::Printed;
pub use runtime::Runtime;
pub use source::{BufReadSource, LineSource, StrSource};
pub use value::{AtomId, PairId, Value};
