use crate::error::Result;
use crate::source::LineSource;

// ============================================================================
// Tokens
// ============================================================================

/// The printer's dotted-pair separator, read back as [`Token::Dot`].
pub const DOT: &str = "∙";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    LParen,
    RParen,
    Quote,
    Dot,
    Atom(String),
}

// ============================================================================
// Lexer
// ============================================================================

/// Pulls tokens out of a [`LineSource`] on demand.
///
/// Lines are fetched only when the current one is used up, and a line's end
/// counts as whitespace, so a token never needs the next line to finish. That
/// keeps interactive reads from blocking once a form is complete and leaves
/// the rest of a line for whoever reads next.
pub struct Lexer<S> {
    source: S,
    line: Vec<char>,
    position: usize,
    exhausted: bool,
    blank_line_ends_input: bool,
}

impl<S: LineSource> Lexer<S> {
    pub fn new(source: S) -> Self {
        Lexer {
            source,
            line: Vec::new(),
            position: 0,
            exhausted: false,
            blank_line_ends_input: true,
        }
    }

    /// Whether an empty line ends input the way end of file does.
    pub fn blank_line_ends_input(mut self, enabled: bool) -> Self {
        self.blank_line_ends_input = enabled;
        self
    }

    /// The look-ahead character, fetching a new line if needed.
    fn current_char(&mut self) -> Result<Option<char>> {
        while self.position >= self.line.len() {
            if self.exhausted {
                return Ok(None);
            }
            match self.source.next_line()? {
                Some(line) if !(self.blank_line_ends_input && is_blank(&line)) => {
                    self.line = line.chars().chain(std::iter::once('\n')).collect();
                    self.position = 0;
                }
                _ => {
                    self.exhausted = true;
                    self.line.clear();
                    self.position = 0;
                }
            }
        }
        Ok(Some(self.line[self.position]))
    }

    fn advance(&mut self) {
        if self.position < self.line.len() {
            self.position += 1;
        }
    }

    /// Next token, or `None` once input is exhausted.
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        let first = loop {
            match self.current_char()? {
                None => return Ok(None),
                Some(ch) if ch <= ' ' => self.advance(),
                Some(ch) => {
                    self.advance();
                    break ch;
                }
            }
        };

        let token = match first {
            '(' => Token::LParen,
            ')' => Token::RParen,
            '\'' => Token::Quote,
            _ => {
                let mut text = String::from(first);
                while self.position < self.line.len() {
                    let ch = self.line[self.position];
                    if ch <= ' ' || ch == '(' || ch == ')' {
                        break;
                    }
                    text.push(ch);
                    self.advance();
                }
                if text == DOT {
                    Token::Dot
                } else {
                    Token::Atom(text)
                }
            }
        };
        Ok(Some(token))
    }
}

/// A line holding nothing but characters the lexer skips.
fn is_blank(line: &str) -> bool {
    line.chars().all(|c| c <= ' ')
}
