use crate::error::{LispError, Result};
use crate::heap::Heap;
use crate::interner::SymbolTable;
use crate::lexer::{Lexer, Token};
use crate::source::LineSource;
use crate::value::Value;

// ============================================================================
// Parser
// ============================================================================

/// Everything one read needs: a token stream plus the stores that atoms and
/// pairs are built in.
pub struct Parser<'a, S> {
    lexer: &'a mut Lexer<S>,
    symbols: &'a mut SymbolTable,
    heap: &'a mut Heap,
    depth: usize,
    max_depth: usize,
}

impl<'a, S: LineSource> Parser<'a, S> {
    /// A parser that fails with [`LispError::DepthExceeded`] once lists and
    /// quotes nest deeper than `max_depth`.
    pub fn new(
        lexer: &'a mut Lexer<S>,
        symbols: &'a mut SymbolTable,
        heap: &'a mut Heap,
        max_depth: usize,
    ) -> Self {
        Parser {
            lexer,
            symbols,
            heap,
            depth: 0,
            max_depth,
        }
    }

    /// Read one complete object. Fails with [`LispError::EndOfInput`] when
    /// input runs out before the object starts.
    pub fn read(&mut self) -> Result<Value> {
        match self.lexer.next_token()? {
            Some(token) => self.read_object(token),
            None => Err(LispError::EndOfInput),
        }
    }

    fn next_inner(&mut self) -> Result<Token> {
        self.lexer.next_token()?.ok_or(LispError::UnclosedList)
    }

    fn read_object(&mut self, token: Token) -> Result<Value> {
        if !matches!(token, Token::LParen | Token::Quote) {
            return self.read_form(token);
        }
        if self.depth >= self.max_depth {
            return Err(LispError::DepthExceeded {
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        let result = self.read_form(token);
        self.depth -= 1;
        result
    }

    fn read_form(&mut self, token: Token) -> Result<Value> {
        match token {
            Token::LParen => self.read_list(),
            Token::RParen => Err(LispError::UnbalancedClose),
            Token::Dot => Err(LispError::MalformedDot),
            Token::Quote => {
                let next = self.next_inner()?;
                let quoted = self.read_object(next)?;
                let quote = Value::Atom(self.symbols.builtins().quote);
                let tail = self.heap.cons(quoted, Value::Nil)?;
                self.heap.cons(quote, tail)
            }
            Token::Atom(name) => Ok(self.symbols.intern(&name)),
        }
    }

    /// Read list elements after an opening paren up to the matching `)`.
    fn read_list(&mut self) -> Result<Value> {
        let mut items = Vec::new();
        let mut tail = Value::Nil;

        loop {
            match self.next_inner()? {
                Token::RParen => break,
                Token::Dot => {
                    if items.is_empty() {
                        return Err(LispError::MalformedDot);
                    }
                    let next = self.next_inner()?;
                    tail = self.read_object(next)?;
                    if self.next_inner()? != Token::RParen {
                        return Err(LispError::MalformedDot);
                    }
                    break;
                }
                token => items.push(self.read_object(token)?),
            }
        }

        items
            .into_iter()
            .rev()
            .try_fold(tail, |rest, item| self.heap.cons(item, rest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StrSource;

    struct Fixture {
        lexer: Lexer<StrSource>,
        symbols: SymbolTable,
        heap: Heap,
    }

    impl Fixture {
        fn new(input: &str) -> Self {
            Fixture {
                lexer: Lexer::new(StrSource::new(input)),
                symbols: SymbolTable::new(),
                heap: Heap::new(),
            }
        }

        fn read(&mut self) -> Result<Value> {
            self.read_nested(64)
        }

        fn read_nested(&mut self, max_depth: usize) -> Result<Value> {
            Parser::new(&mut self.lexer, &mut self.symbols, &mut self.heap, max_depth).read()
        }
    }

    #[test]
    fn test_atom() {
        let mut fx = Fixture::new("FOO");
        let value = fx.read().unwrap();
        assert_eq!(value, fx.symbols.intern("FOO"));
    }

    #[test]
    fn test_list_is_right_leaning() {
        let mut fx = Fixture::new("(A B)");
        let list = fx.read().unwrap().as_pair().unwrap();
        let a = fx.symbols.intern("A");
        let b = fx.symbols.intern("B");
        assert_eq!(fx.heap.car(list), a);
        let rest = fx.heap.cdr(list).as_pair().unwrap();
        assert_eq!(fx.heap.car(rest), b);
        assert_eq!(fx.heap.cdr(rest), Value::Nil);
        assert_eq!(fx.heap.len(), 2);
    }

    #[test]
    fn test_empty_list_is_nil() {
        let mut fx = Fixture::new("()");
        assert_eq!(fx.read().unwrap(), Value::Nil);
    }

    #[test]
    fn test_dotted_pair() {
        let mut fx = Fixture::new("(A ∙ B)");
        let pair = fx.read().unwrap().as_pair().unwrap();
        let b = fx.symbols.intern("B");
        assert_eq!(fx.heap.cdr(pair), b);
    }

    #[test]
    fn test_quote_shorthand() {
        let mut fx = Fixture::new("'A");
        let form = fx.read().unwrap().as_pair().unwrap();
        assert_eq!(
            fx.heap.car(form),
            Value::Atom(fx.symbols.builtins().quote)
        );
    }

    #[test]
    fn test_successive_reads() {
        let mut fx = Fixture::new("A (B)\nC");
        assert!(fx.read().unwrap().is_atom());
        assert!(fx.read().unwrap().is_pair());
        assert!(fx.read().unwrap().is_atom());
        assert!(fx.read().unwrap_err().is_end_of_input());
    }

    #[test]
    fn test_unbalanced_close() {
        let mut fx = Fixture::new(")");
        assert!(matches!(fx.read(), Err(LispError::UnbalancedClose)));
    }

    #[test]
    fn test_unclosed_list() {
        let mut fx = Fixture::new("(A (B)");
        assert!(matches!(fx.read(), Err(LispError::UnclosedList)));
    }

    #[test]
    fn test_malformed_dots() {
        for input in ["(∙ A)", "(A ∙ B C)", "∙"] {
            let mut fx = Fixture::new(input);
            assert!(matches!(fx.read(), Err(LispError::MalformedDot)), "{input}");
        }
    }

    #[test]
    fn test_nesting_limit() {
        let mut fx = Fixture::new(&format!("{}A{}", "(".repeat(8), ")".repeat(8)));
        assert!(fx.read_nested(8).unwrap().is_pair());

        let mut fx = Fixture::new(&format!("{}A{}", "(".repeat(9), ")".repeat(9)));
        assert!(matches!(
            fx.read_nested(8),
            Err(LispError::DepthExceeded { limit: 8 })
        ));

        let mut fx = Fixture::new(&"'".repeat(9));
        assert!(matches!(
            fx.read_nested(8),
            Err(LispError::DepthExceeded { limit: 8 })
        ));
    }

    #[test]
    fn test_unterminated_deep_input_fails_cleanly() {
        let mut fx = Fixture::new(&"(".repeat(1_000_000));
        assert!(matches!(
            fx.read_nested(200),
            Err(LispError::DepthExceeded { limit: 200 })
        ));
    }
}
