//! The session context.
//!
//! A [`Runtime`] owns every piece of mutable state a session has: the atom
//! table, the pair heap, the lexer with its current line, the output sink and
//! the collector statistics. Reading, evaluating and printing are all methods
//! on it, so nothing lives in globals.

use std::io::Write;

use log::trace;

use crate::config::Config;
use crate::error::Result;
use crate::gc::{GcPolicy, GcStats};
use crate::heap::Heap;
use crate::interner::{Builtins, SymbolTable};
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::printer::Printed;
use crate::source::{LineSource, StrSource};
use crate::value::Value;

pub struct Runtime<S, W> {
    pub(crate) symbols: SymbolTable,
    pub(crate) heap: Heap,
    pub(crate) builtins: Builtins,
    lexer: Lexer<S>,
    pub(crate) out: W,
    pub(crate) config: Config,
    pub(crate) stats: GcStats,
    pub(crate) depth: usize,
}

impl<W: Write> Runtime<StrSource, W> {
    /// A session reading from an in-memory string.
    pub fn from_text(input: &str, out: W) -> Self {
        Runtime::with_config(StrSource::new(input), out, Config::default())
    }
}

impl<S: LineSource, W: Write> Runtime<S, W> {
    pub fn new(source: S, out: W) -> Self {
        Runtime::with_config(source, out, Config::default())
    }

    pub fn with_config(source: S, out: W, config: Config) -> Self {
        let symbols = SymbolTable::new();
        let builtins = *symbols.builtins();
        Runtime {
            symbols,
            heap: Heap::with_limit(config.max_pairs),
            builtins,
            lexer: Lexer::new(source).blank_line_ends_input(config.blank_line_ends_input),
            out,
            config,
            stats: GcStats::default(),
            depth: 0,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn stats(&self) -> &GcStats {
        &self.stats
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn intern(&mut self, name: &str) -> Value {
        self.symbols.intern(name)
    }

    pub fn display(&self, value: Value) -> Printed<'_> {
        Printed::new(value, &self.heap, &self.symbols)
    }

    /// Printed form of `value`.
    pub fn show(&self, value: Value) -> String {
        self.display(value).to_string()
    }

    // ========================================================================
    // Read / eval / print
    // ========================================================================

    /// Read one object from the session's input.
    pub fn read(&mut self) -> Result<Value> {
        Parser::new(
            &mut self.lexer,
            &mut self.symbols,
            &mut self.heap,
            self.config.max_depth,
        )
        .read()
    }

    /// Evaluate `expr` in the empty environment and compact everything it
    /// allocated down to the result's reachable structure.
    pub fn eval_top(&mut self, expr: Value) -> Result<Value> {
        self.depth = 0;
        let mark = self.heap.mark();
        let result = self.eval(expr, Value::Nil)?;
        Ok(match self.config.gc {
            GcPolicy::TopLevel => self.heap.compact(result, mark, &mut self.stats),
            GcPolicy::EveryEval => result,
        })
    }

    /// One top-level cycle: read, evaluate, collect, print. Pairs from the
    /// previous cycle are released first, so the returned handle is only
    /// valid until the next call.
    pub fn rep(&mut self) -> Result<Value> {
        self.heap.clear();
        let expr = self.read()?;
        trace!("form: {}", self.show(expr));
        let result = self.eval_top(expr)?;
        writeln!(self.out, "{}", Printed::new(result, &self.heap, &self.symbols))?;
        self.out.flush()?;
        Ok(result)
    }

    /// Run cycles until input is exhausted.
    pub fn run(&mut self) -> Result<()> {
        loop {
            match self.rep() {
                Ok(_) => {}
                Err(e) if e.is_end_of_input() => return Ok(()),
                Err(e) => {
                    self.out.flush()?;
                    return Err(e);
                }
            }
        }
    }
}
