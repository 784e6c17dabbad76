use std::fmt;

use crate::heap::Heap;
use crate::interner::SymbolTable;
use crate::lexer::DOT;
use crate::value::Value;

// ============================================================================
// Display
// ============================================================================

/// A value paired with the stores needed to render it.
pub struct Printed<'a> {
    pub value: Value,
    pub heap: &'a Heap,
    pub symbols: &'a SymbolTable,
}

impl<'a> Printed<'a> {
    pub fn new(value: Value, heap: &'a Heap, symbols: &'a SymbolTable) -> Self {
        Printed {
            value,
            heap,
            symbols,
        }
    }
}

/// Pending output. Nesting lives on an explicit stack, so arbitrarily deep
/// structure prints without native recursion.
enum Step {
    /// Print a whole value.
    Value(Value),
    /// Continue a list whose remaining tail is this value.
    Tail(Value),
    Close,
}

impl fmt::Display for Printed<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut stack = vec![Step::Value(self.value)];

        while let Some(step) = stack.pop() {
            match step {
                Step::Value(Value::Nil) => write!(f, "NIL")?,
                Step::Value(Value::Atom(id)) => write!(f, "{}", self.symbols.resolve(id))?,
                Step::Value(Value::Pair(id)) => {
                    write!(f, "(")?;
                    stack.push(Step::Tail(self.heap.cdr(id)));
                    stack.push(Step::Value(self.heap.car(id)));
                }
                Step::Tail(Value::Nil) | Step::Close => write!(f, ")")?,
                Step::Tail(Value::Pair(id)) => {
                    write!(f, " ")?;
                    stack.push(Step::Tail(self.heap.cdr(id)));
                    stack.push(Step::Value(self.heap.car(id)));
                }
                Step::Tail(atom) => {
                    write!(f, " {DOT} ")?;
                    stack.push(Step::Close);
                    stack.push(Step::Value(atom));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atoms_and_lists() {
        let mut symbols = SymbolTable::new();
        let mut heap = Heap::new();
        let a = symbols.intern("A");
        let b = symbols.intern("B");

        let list = heap.list(&[a, b]).unwrap();
        assert_eq!(Printed::new(list, &heap, &symbols).to_string(), "(A B)");
        assert_eq!(Printed::new(Value::Nil, &heap, &symbols).to_string(), "NIL");
        assert_eq!(Printed::new(a, &heap, &symbols).to_string(), "A");
    }

    #[test]
    fn test_improper_tail() {
        let mut symbols = SymbolTable::new();
        let mut heap = Heap::new();
        let a = symbols.intern("A");
        let b = symbols.intern("B");
        let c = symbols.intern("C");

        let dotted = heap.cons(b, c).unwrap();
        let list = heap.cons(a, dotted).unwrap();
        assert_eq!(
            Printed::new(list, &heap, &symbols).to_string(),
            "(A B ∙ C)"
        );
    }

    #[test]
    fn test_nested_and_nil_elements() {
        let mut symbols = SymbolTable::new();
        let mut heap = Heap::new();
        let a = symbols.intern("A");
        let inner = heap.list(&[a]).unwrap();
        let list = heap.list(&[inner, Value::Nil]).unwrap();
        assert_eq!(
            Printed::new(list, &heap, &symbols).to_string(),
            "((A) NIL)"
        );
    }

    #[test]
    fn test_deep_nesting() {
        let symbols = SymbolTable::new();
        let mut heap = Heap::new();
        let depth = 100_000;
        let mut value = Value::Nil;
        for _ in 0..depth {
            value = heap.cons(value, Value::Nil).unwrap();
        }
        let text = Printed::new(value, &heap, &symbols).to_string();
        assert_eq!(text.len(), 2 * depth + 3);
        assert!(text.starts_with("((("));
        assert!(text.contains("(NIL)"));
    }
}
