//! Logical-line lexer for Python-like source.
//!
//! This is not a full tokenizer. It joins physical lines into logical lines
//! (bracket nesting and backslash continuations), drops comments and blanks
//! out string literal contents so later passes can match statements with
//! simple patterns. Syntax problems it can see (unterminated strings,
//! unbalanced brackets, stray continuation characters) are reported as
//! [`LexError`].

use thiserror::Error;

/// Placeholder substituted for every string literal.
pub const STRING_PLACEHOLDER: &str = "\"\"";

const TAB_WIDTH: usize = 8;

/// One logical line of source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    /// Physical line (1-indexed) where the logical line starts.
    pub line: usize,
    /// Indentation width of the first physical line.
    pub indent: usize,
    /// Statement text with comments removed and strings blanked.
    pub text: String,
}

impl LogicalLine {
    /// 1-indexed column of the first non-blank character.
    pub fn column(&self) -> usize {
        self.indent + 1
    }
}

/// A syntax problem detected while splitting source into logical lines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (line {line})")]
pub struct LexError {
    pub line: usize,
    pub message: String,
}

impl LexError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Split `source` into logical lines.
pub fn logical_lines(source: &str) -> Result<Vec<LogicalLine>, LexError> {
    if let Some(pos) = source.find('\0') {
        let line = source[..pos].matches('\n').count() + 1;
        return Err(LexError::new(line, "source code cannot contain null bytes"));
    }

    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    Lexer::new(source).run()
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    out: Vec<LogicalLine>,
    buf: String,
    brackets: Vec<(char, usize)>,
    start_line: usize,
    indent: usize,
    at_line_start: bool,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            out: Vec::new(),
            buf: String::new(),
            brackets: Vec::new(),
            start_line: 1,
            indent: 0,
            at_line_start: true,
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn run(mut self) -> Result<Vec<LogicalLine>, LexError> {
        while let Some(c) = self.peek(0) {
            if self.at_line_start {
                match c {
                    ' ' => {
                        self.indent += 1;
                        self.pos += 1;
                        continue;
                    }
                    '\t' => {
                        self.indent = (self.indent / TAB_WIDTH + 1) * TAB_WIDTH;
                        self.pos += 1;
                        continue;
                    }
                    '\x0c' => {
                        self.indent = 0;
                        self.pos += 1;
                        continue;
                    }
                    _ => {
                        self.at_line_start = false;
                        self.start_line = self.line;
                    }
                }
            }

            match c {
                '#' => {
                    while self.peek(0).is_some_and(|ch| ch != '\n') {
                        self.pos += 1;
                    }
                }
                '\n' => {
                    self.line += 1;
                    self.pos += 1;
                    if self.brackets.is_empty() {
                        self.flush();
                    } else {
                        self.buf.push(' ');
                    }
                }
                '\r' => self.pos += 1,
                '\\' => self.continuation()?,
                '\'' | '"' => self.string_literal(c)?,
                '(' | '[' | '{' => {
                    self.brackets.push((c, self.line));
                    self.buf.push(c);
                    self.pos += 1;
                }
                ')' | ']' | '}' => {
                    self.close_bracket(c)?;
                    self.buf.push(c);
                    self.pos += 1;
                }
                _ => {
                    self.buf.push(c);
                    self.pos += 1;
                }
            }
        }

        if let Some((open, line)) = self.brackets.last() {
            return Err(LexError::new(*line, format!("'{}' was never closed", open)));
        }

        self.flush();
        Ok(self.out)
    }

    fn flush(&mut self) {
        let text = self.buf.trim();
        if !text.is_empty() {
            self.out.push(LogicalLine {
                line: self.start_line,
                indent: self.indent,
                text: text.to_string(),
            });
        }
        self.buf.clear();
        self.indent = 0;
        self.at_line_start = true;
    }

    fn continuation(&mut self) -> Result<(), LexError> {
        match (self.peek(1), self.peek(2)) {
            (Some('\n'), _) => self.pos += 2,
            (Some('\r'), Some('\n')) => self.pos += 3,
            (None, _) => {
                return Err(LexError::new(self.line, "unexpected EOF after line continuation"))
            }
            _ => {
                return Err(LexError::new(
                    self.line,
                    "unexpected character after line continuation character",
                ))
            }
        }
        self.line += 1;
        self.buf.push(' ');
        Ok(())
    }

    fn close_bracket(&mut self, close: char) -> Result<(), LexError> {
        let expected = match close {
            ')' => '(',
            ']' => '[',
            _ => '{',
        };
        match self.brackets.pop() {
            Some((open, _)) if open == expected => Ok(()),
            Some((open, open_line)) => Err(LexError::new(
                self.line,
                format!(
                    "closing parenthesis '{}' does not match opening parenthesis '{}' on line {}",
                    close, open, open_line
                ),
            )),
            None => Err(LexError::new(self.line, format!("unmatched '{}'", close))),
        }
    }

    fn string_literal(&mut self, quote: char) -> Result<(), LexError> {
        let open_line = self.line;
        let triple = self.peek(1) == Some(quote) && self.peek(2) == Some(quote);
        self.pos += if triple { 3 } else { 1 };

        loop {
            let Some(ch) = self.peek(0) else {
                let message = if triple {
                    "unterminated triple-quoted string literal"
                } else {
                    "unterminated string literal"
                };
                return Err(LexError::new(open_line, message));
            };

            match ch {
                '\\' => {
                    if self.peek(1) == Some('\n') {
                        self.line += 1;
                    }
                    self.pos += 2;
                }
                '\n' if !triple => {
                    return Err(LexError::new(open_line, "unterminated string literal"));
                }
                '\n' => {
                    self.line += 1;
                    self.pos += 1;
                }
                c if c == quote && !triple => {
                    self.pos += 1;
                    break;
                }
                c if c == quote && self.peek(1) == Some(quote) && self.peek(2) == Some(quote) => {
                    self.pos += 3;
                    break;
                }
                _ => self.pos += 1,
            }
        }

        self.buf.push_str(STRING_PLACEHOLDER);
        Ok(())
    }
}
