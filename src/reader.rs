//! Surface-syntax reader.
//!
//! Parenthesized prefix notation: bare tokens are symbols, `$`-prefixed
//! tokens are variables, numeric tokens are grounded numbers, and
//! double-quoted strings support `\"`, `\n`, `\t` and `\\`. `;` starts a
//! comment running to end of line. A `!` immediately before `(` marks a
//! top-level expression as an evaluation directive.
//!
//! Parsing is iterative, so nesting depth is bounded only by memory.

use std::iter::Peekable;
use std::str::Chars;

use thiserror::Error;

use crate::atom::{Atom, VARIABLE_SIGIL};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected ')' at {line}:{column}")]
    UnexpectedClose { line: usize, column: usize },
    #[error("unclosed '(' opened at {line}:{column}")]
    Unclosed { line: usize, column: usize },
    #[error("unterminated string starting at {line}:{column}")]
    UnterminatedString { line: usize, column: usize },
    #[error("invalid escape '\\{escape}' at {line}:{column}")]
    InvalidEscape {
        escape: char,
        line: usize,
        column: usize,
    },
    #[error("variable without a name at {line}:{column}")]
    EmptyVariable { line: usize, column: usize },
    #[error("expected exactly one atom, found {found} (at {line}:{column})")]
    ExpectedSingle {
        found: usize,
        line: usize,
        column: usize,
    },
}

/// Top-level program statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Added to the atomspace.
    Assert(Atom),
    /// `!(...)`: evaluated.
    Evaluate(Atom),
}

impl Statement {
    pub fn atom(&self) -> &Atom {
        match self {
            Statement::Assert(atom) | Statement::Evaluate(atom) => atom,
        }
    }

    pub fn into_atom(self) -> Atom {
        match self {
            Statement::Assert(atom) | Statement::Evaluate(atom) => atom,
        }
    }
}

/// Line and column where a top-level statement starts.
type Position = (usize, usize);

/// Parse a whole program into statements.
pub fn parse_program(text: &str) -> Result<Vec<Statement>, ParseError> {
    let statements = Reader::new(text).read_all()?;
    Ok(statements.into_iter().map(|(statement, _)| statement).collect())
}

/// Parse a document of top-level atoms, ignoring directive markers.
pub fn parse(text: &str) -> Result<Vec<Atom>, ParseError> {
    Ok(parse_program(text)?
        .into_iter()
        .map(Statement::into_atom)
        .collect())
}

/// Parse exactly one atom. An extra atom is reported where it starts; an
/// empty input is reported at its end.
pub fn parse_atom(text: &str) -> Result<Atom, ParseError> {
    let mut reader = Reader::new(text);
    let mut statements = reader.read_all()?;
    if statements.len() == 1 {
        let (statement, _) = statements.remove(0);
        return Ok(statement.into_atom());
    }
    let (line, column) = statements
        .get(1)
        .map_or((reader.line, reader.column), |(_, position)| *position);
    Err(ParseError::ExpectedSingle {
        found: statements.len(),
        line,
        column,
    })
}

/// An open `(` awaiting its children.
struct Frame {
    children: Vec<Atom>,
    directive: bool,
    line: usize,
    column: usize,
}

struct Reader<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Reader<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn read_all(&mut self) -> Result<Vec<(Statement, Position)>, ParseError> {
        let mut statements = Vec::new();
        let mut stack: Vec<Frame> = Vec::new();

        while let Some(&c) = self.chars.peek() {
            let (line, column) = (self.line, self.column);
            let (atom, start) = match c {
                ';' => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                    continue;
                }
                c if c.is_whitespace() => {
                    self.bump();
                    continue;
                }
                '(' => {
                    self.bump();
                    stack.push(Frame {
                        children: Vec::new(),
                        directive: false,
                        line,
                        column,
                    });
                    continue;
                }
                '!' if stack.is_empty() && self.directive_follows() => {
                    self.bump();
                    self.bump();
                    stack.push(Frame {
                        children: Vec::new(),
                        directive: true,
                        line,
                        column,
                    });
                    continue;
                }
                ')' => {
                    self.bump();
                    let frame = stack
                        .pop()
                        .ok_or(ParseError::UnexpectedClose { line, column })?;
                    let start = (frame.line, frame.column);
                    let expr = Atom::expr(frame.children);
                    if frame.directive {
                        statements.push((Statement::Evaluate(expr), start));
                        continue;
                    }
                    (expr, start)
                }
                '"' => (self.read_string()?, (line, column)),
                _ => (self.read_token()?, (line, column)),
            };

            match stack.last_mut() {
                Some(frame) => frame.children.push(atom),
                None => statements.push((Statement::Assert(atom), start)),
            }
        }

        match stack.first() {
            Some(frame) => Err(ParseError::Unclosed {
                line: frame.line,
                column: frame.column,
            }),
            None => Ok(statements),
        }
    }

    /// `!` counts as a directive marker only when `(` follows immediately.
    fn directive_follows(&self) -> bool {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next() == Some('(')
    }

    fn read_string(&mut self) -> Result<Atom, ParseError> {
        let (line, column) = (self.line, self.column);
        self.bump();
        let mut out = String::new();
        loop {
            let c = self
                .bump()
                .ok_or(ParseError::UnterminatedString { line, column })?;
            match c {
                '"' => return Ok(Atom::string(out)),
                '\\' => {
                    let (esc_line, esc_column) = (self.line, self.column);
                    let escape = self
                        .bump()
                        .ok_or(ParseError::UnterminatedString { line, column })?;
                    out.push(match escape {
                        '"' => '"',
                        '\\' => '\\',
                        'n' => '\n',
                        't' => '\t',
                        other => {
                            return Err(ParseError::InvalidEscape {
                                escape: other,
                                line: esc_line,
                                column: esc_column,
                            })
                        }
                    });
                }
                other => out.push(other),
            }
        }
    }

    fn read_token(&mut self) -> Result<Atom, ParseError> {
        let (line, column) = (self.line, self.column);
        let mut token = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() || matches!(c, '(' | ')' | '"' | ';') {
                break;
            }
            token.push(c);
            self.bump();
        }
        classify(token, line, column)
    }
}

fn classify(token: String, line: usize, column: usize) -> Result<Atom, ParseError> {
    if let Some(name) = token.strip_prefix(VARIABLE_SIGIL) {
        if name.is_empty() {
            return Err(ParseError::EmptyVariable { line, column });
        }
        return Ok(Atom::var(&token));
    }
    if let Ok(i) = token.parse::<i64>() {
        return Ok(Atom::int(i));
    }
    if looks_numeric(&token) {
        if let Ok(x) = token.parse::<f64>() {
            return Ok(Atom::float(x));
        }
    }
    Ok(Atom::sym(token))
}

/// Guards the float parse so tokens like `inf` or `NaN` stay symbols.
fn looks_numeric(token: &str) -> bool {
    let digits = token.strip_prefix(['-', '+']).unwrap_or(token);
    digits.starts_with(|c: char| c.is_ascii_digit())
        || (digits.starts_with('.') && digits[1..].starts_with(|c: char| c.is_ascii_digit()))
}
