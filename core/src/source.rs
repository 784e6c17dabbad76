//! Line sources feeding the lexer.

use std::collections::VecDeque;
use std::io::{self, BufRead};

/// Supplies input one line at a time. `Ok(None)` means input is exhausted.
pub trait LineSource {
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

/// Lines from any buffered reader, e.g. locked stdin or an opened file.
pub struct BufReadSource<R> {
    reader: R,
}

impl<R: BufRead> BufReadSource<R> {
    pub fn new(reader: R) -> Self {
        BufReadSource { reader }
    }
}

impl<R: BufRead> LineSource for BufReadSource<R> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(&['\n', '\r'][..]).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

/// Lines of an in-memory string.
#[derive(Debug, Default)]
pub struct StrSource {
    lines: VecDeque<String>,
}

impl StrSource {
    pub fn new(text: &str) -> Self {
        StrSource {
            lines: text.lines().map(str::to_string).collect(),
        }
    }
}

impl LineSource for StrSource {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}

impl<S: LineSource + ?Sized> LineSource for Box<S> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        (**self).next_line()
    }
}
