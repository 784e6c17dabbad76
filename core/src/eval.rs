use std::io::Write;

use crate::error::{LispError, Result};
use crate::gc::GcPolicy;
use crate::printer::Printed;
use crate::runtime::Runtime;
use crate::source::LineSource;
use crate::value::{AtomId, Value};

/// Atoms that evaluate to themselves: an optional sign followed by digits.
fn is_numeral(name: &str) -> bool {
    let digits = name.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(name);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

// ============================================================================
// Evaluator
// ============================================================================

impl<S: LineSource, W: Write> Runtime<S, W> {
    /// Evaluate `expr` under the association list `env`.
    ///
    /// Scoping is dynamic: a lambda's parameters are bound on top of whatever
    /// environment is current at the call, not the one it was written in.
    pub fn eval(&mut self, expr: Value, env: Value) -> Result<Value> {
        self.enter()?;
        let result = self.eval_inner(expr, env);
        self.depth -= 1;
        result
    }

    fn eval_inner(&mut self, expr: Value, env: Value) -> Result<Value> {
        let id = match expr {
            Value::Nil => return Ok(Value::Nil),
            Value::Atom(atom) => {
                return if self.is_self_evaluating(atom) {
                    Ok(expr)
                } else {
                    self.assoc(atom, env)
                };
            }
            Value::Pair(id) => id,
        };

        let head = self.heap.car(id);
        let rest = self.heap.cdr(id);

        if head == Value::Atom(self.builtins.quote) {
            return self.car(rest, "QUOTE");
        }

        let mark = self.heap.mark();
        let result = if head == Value::Atom(self.builtins.cond) {
            self.evcon(rest, env)?
        } else {
            let args = self.evlis(rest, env)?;
            self.apply(head, args, env)?
        };

        Ok(match self.config.gc {
            GcPolicy::EveryEval => self.heap.compact(result, mark, &mut self.stats),
            GcPolicy::TopLevel => result,
        })
    }

    /// Apply `func` to already evaluated `args`.
    pub fn apply(&mut self, func: Value, args: Value, env: Value) -> Result<Value> {
        self.enter()?;
        let result = self.apply_inner(func, args, env);
        self.depth -= 1;
        result
    }

    fn apply_inner(&mut self, func: Value, args: Value, env: Value) -> Result<Value> {
        let atom = match func {
            Value::Pair(_) => {
                let rest = self.cdr(func, "LAMBDA")?;
                let params = self.car(rest, "LAMBDA")?;
                let body = self.cdr(rest, "LAMBDA")?;
                let body = self.car(body, "LAMBDA")?;
                let env = self.pairlis(params, args, env)?;
                return self.eval(body, env);
            }
            Value::Nil => return Err(LispError::NotCallable(self.show(func))),
            Value::Atom(atom) => atom,
        };

        let b = self.builtins;
        let first = self.car(args, "APPLY")?;

        if atom == b.eq {
            let second = self.cadr(args)?;
            Ok(self.truth(first == second))
        } else if atom == b.cons {
            let second = self.cadr(args)?;
            self.heap.cons(first, second)
        } else if atom == b.atom {
            Ok(self.truth(first.is_atom()))
        } else if atom == b.car {
            self.car(first, "CAR")
        } else if atom == b.cdr {
            self.cdr(first, "CDR")
        } else if atom == b.read {
            self.read()
        } else if atom == b.print {
            if args.is_nil() {
                writeln!(self.out)?;
            } else {
                write!(self.out, "{}", Printed::new(first, &self.heap, &self.symbols))?;
            }
            Ok(Value::Nil)
        } else if atom == b.quote || atom == b.cond || self.is_self_evaluating(atom) {
            Err(LispError::NotCallable(self.show(func)))
        } else {
            let resolved = self.eval(func, env)?;
            self.apply(resolved, args, env)
        }
    }

    /// Evaluate each clause test in order; the first non-nil one selects the
    /// clause whose consequent becomes the result.
    fn evcon(&mut self, mut clauses: Value, env: Value) -> Result<Value> {
        while let Value::Pair(id) = clauses {
            let clause = self.heap.car(id);
            let test = self.car(clause, "COND")?;
            if !self.eval(test, env)?.is_nil() {
                let consequent = self.cadr(clause)?;
                return self.eval(consequent, env);
            }
            clauses = self.heap.cdr(id);
        }
        Err(LispError::CondExhausted)
    }

    /// Evaluate argument expressions left to right into a fresh list.
    fn evlis(&mut self, mut exprs: Value, env: Value) -> Result<Value> {
        let mut values = Vec::new();
        while let Value::Pair(id) = exprs {
            let expr = self.heap.car(id);
            values.push(self.eval(expr, env)?);
            exprs = self.heap.cdr(id);
        }
        self.heap.list(&values)
    }

    /// Prepend `(param . arg)` bindings to `env`, pairing by position until
    /// either list runs out.
    fn pairlis(&mut self, mut params: Value, mut args: Value, env: Value) -> Result<Value> {
        let mut bindings = Vec::new();
        while let (Value::Pair(p), Value::Pair(a)) = (params, args) {
            bindings.push((self.heap.car(p), self.heap.car(a)));
            params = self.heap.cdr(p);
            args = self.heap.cdr(a);
        }

        let mut env = env;
        for (param, arg) in bindings.into_iter().rev() {
            let binding = self.heap.cons(param, arg)?;
            env = self.heap.cons(binding, env)?;
        }
        Ok(env)
    }

    /// Value bound to `atom` in `env`, searching from the newest binding.
    fn assoc(&self, atom: AtomId, mut env: Value) -> Result<Value> {
        let key = Value::Atom(atom);
        while let Value::Pair(id) = env {
            let binding = self.heap.car(id);
            if let Value::Pair(binding) = binding {
                if self.heap.car(binding) == key {
                    return Ok(self.heap.cdr(binding));
                }
            }
            env = self.heap.cdr(id);
        }
        Err(LispError::UnboundSymbol(self.symbols.resolve(atom).to_string()))
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn enter(&mut self) -> Result<()> {
        if self.depth >= self.config.max_depth {
            return Err(LispError::DepthExceeded {
                limit: self.config.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn is_self_evaluating(&self, atom: AtomId) -> bool {
        atom == self.builtins.t || is_numeral(self.symbols.resolve(atom))
    }

    fn truth(&self, flag: bool) -> Value {
        if flag {
            Value::Atom(self.builtins.t)
        } else {
            Value::Nil
        }
    }

    /// `car` of a list position. `NIL` projects to `NIL`.
    fn car(&self, value: Value, op: &'static str) -> Result<Value> {
        match value {
            Value::Pair(id) => Ok(self.heap.car(id)),
            Value::Nil => Ok(Value::Nil),
            Value::Atom(_) => Err(LispError::NotAPair {
                op,
                value: self.show(value),
            }),
        }
    }

    fn cdr(&self, value: Value, op: &'static str) -> Result<Value> {
        match value {
            Value::Pair(id) => Ok(self.heap.cdr(id)),
            Value::Nil => Ok(Value::Nil),
            Value::Atom(_) => Err(LispError::NotAPair {
                op,
                value: self.show(value),
            }),
        }
    }

    fn cadr(&self, value: Value) -> Result<Value> {
        let rest = self.cdr(value, "CDR")?;
        self.car(rest, "CAR")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numerals() {
        assert!(is_numeral("42"));
        assert!(is_numeral("-7"));
        assert!(is_numeral("+0"));
        assert!(!is_numeral("-"));
        assert!(!is_numeral("4A"));
        assert!(!is_numeral(""));
    }
}
