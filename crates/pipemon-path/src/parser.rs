//! Template parsing
//!
//! A template is free text interleaved with `{...}` actions. Each action is
//! a path expression:
//!
//! ```text
//! action   := '{' ws path ws '}'
//! path     := ('$' | '@')? ident? step*
//! step     := '.' ident | '.' '*' | '..' (ident | '*' | bracket) | bracket
//! bracket  := '[' ( '*' | '?(' filter ')' | selector (',' selector)* ) ']'
//! selector := quoted | int | int? ':' int? (':' int?)?
//! filter   := '@' step* (op literal)?
//! ```

use crate::error::{PathError, PathResult};
use crate::value::Value;

/// Parsed path template
#[derive(Debug, Clone, PartialEq)]
pub struct PathTemplate {
    source: String,
    segments: Vec<Segment>,
}

/// One piece of a template
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text outside any action, kept as a string value
    Text(Value),
    /// Path expression inside `{...}`
    Action(Vec<Step>),
}

/// One traversal step
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// `.name`
    Field(String),
    /// `.*` or `[*]`
    Wildcard,
    /// `[...]` with one or more selectors
    Select(Vec<Selector>),
    /// `..step`, applied to every node of the subtree
    Recursive(Box<Step>),
    /// `[?(...)]`
    Filter(Filter),
}

/// Bracket selector
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// `['name']`
    Name(String),
    /// `[n]`, negative counts from the end
    Index(i64),
    /// `[start:end:step]`
    Slice {
        /// Inclusive start
        start: Option<i64>,
        /// Exclusive end
        end: Option<i64>,
        /// Stride, always positive
        step: i64,
    },
}

/// Filter predicate evaluated against each element
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Path relative to `@`
    pub path: Vec<Step>,
    /// Comparison, or `None` for an existence test
    pub comparison: Option<(CmpOp, Literal)>,
}

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

/// Filter literal
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Quoted string
    String(String),
    /// Number
    Number(f64),
    /// `true` / `false`
    Bool(bool),
    /// `null`
    Null,
}

/// Wrap a bare path expression into a template action.
///
/// Expressions that already are a single braced action are returned as is.
pub fn wrap_action(expr: &str) -> String {
    let expr = expr.trim();
    if expr.starts_with('{') && expr.ends_with('}') {
        expr.to_string()
    } else {
        format!("{{{expr}}}")
    }
}

impl PathTemplate {
    /// Parse a template
    pub fn parse(source: &str) -> PathResult<Self> {
        let segments = Parser::new(source).template()?;
        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// Parse a single path expression, braced or bare
    pub fn expression(expr: &str) -> PathResult<Self> {
        Self::parse(&wrap_action(expr))
    }

    /// Combine two path expressions into one template with two actions
    pub fn concat(first: &str, second: &str) -> PathResult<Self> {
        Self::parse(&format!("{}{}", wrap_action(first), wrap_action(second)))
    }

    /// Template source text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Parsed segments
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

struct Parser<'s> {
    src: &'s str,
    pos: usize,
}

impl<'s> Parser<'s> {
    fn new(src: &'s str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, s: &str) -> bool {
        if self.src[self.pos..].starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> PathResult<()> {
        if self.eat(c) {
            Ok(())
        } else {
            match self.peek() {
                Some(found) => Err(self.error(format!("expected '{c}', found '{found}'"))),
                None => Err(self.error(format!("expected '{c}', found end of input"))),
            }
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn error(&self, message: impl Into<String>) -> PathError {
        PathError::Syntax {
            position: self.pos,
            message: message.into(),
        }
    }

    fn template(&mut self) -> PathResult<Vec<Segment>> {
        let mut segments = Vec::new();
        while self.pos < self.src.len() {
            match self.src[self.pos..].find('{') {
                Some(0) => {
                    self.bump();
                    segments.push(Segment::Action(self.action()?));
                }
                Some(offset) => {
                    let text = &self.src[self.pos..self.pos + offset];
                    segments.push(Segment::Text(Value::String(text.to_string())));
                    self.pos += offset;
                }
                None => {
                    let text = &self.src[self.pos..];
                    segments.push(Segment::Text(Value::String(text.to_string())));
                    self.pos = self.src.len();
                }
            }
        }
        Ok(segments)
    }

    /// Parses the inside of an action; the opening brace is consumed.
    fn action(&mut self) -> PathResult<Vec<Step>> {
        let open = self.pos - 1;
        self.skip_ws();
        if self.peek() == Some('}') {
            return Err(self.error("empty action"));
        }
        let steps = self.path(|c| c == '}' || c.is_whitespace())?;
        self.skip_ws();
        if self.peek().is_none() {
            return Err(PathError::Syntax {
                position: open,
                message: "unclosed action".to_string(),
            });
        }
        self.expect('}')?;
        Ok(steps)
    }

    fn path(&mut self, stop: fn(char) -> bool) -> PathResult<Vec<Step>> {
        let mut steps = Vec::new();
        let _ = self.eat('$') || self.eat('@');
        if matches!(self.peek(), Some(c) if is_ident_char(c)) {
            steps.push(Step::Field(self.ident()?));
        }
        loop {
            match self.peek() {
                None => break,
                Some(c) if stop(c) => break,
                Some('.') => {
                    self.bump();
                    if self.eat('.') {
                        let inner = match self.peek() {
                            Some('[') => self.bracket()?,
                            Some('*') => {
                                self.bump();
                                Step::Wildcard
                            }
                            _ => Step::Field(self.ident()?),
                        };
                        steps.push(Step::Recursive(Box::new(inner)));
                    } else if self.eat('*') {
                        steps.push(Step::Wildcard);
                    } else if steps.is_empty() && matches!(self.peek(), None) {
                        break;
                    } else if steps.is_empty() && matches!(self.peek(), Some(c) if stop(c)) {
                        // a lone `.` refers to the current node
                        break;
                    } else {
                        steps.push(Step::Field(self.ident()?));
                    }
                }
                Some('[') => steps.push(self.bracket()?),
                Some(c) => return Err(self.error(format!("unexpected character '{c}'"))),
            }
        }
        Ok(steps)
    }

    fn ident(&mut self) -> PathResult<String> {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.bump();
                match self.bump() {
                    Some(escaped) => name.push(escaped),
                    None => return Err(self.error("dangling escape")),
                }
            } else if is_ident_char(c) {
                name.push(c);
                self.bump();
            } else {
                break;
            }
        }
        if name.is_empty() {
            return Err(self.error("expected field name"));
        }
        Ok(name)
    }

    fn bracket(&mut self) -> PathResult<Step> {
        self.expect('[')?;
        self.skip_ws();
        let step = if self.eat('*') {
            Step::Wildcard
        } else if self.eat('?') {
            self.expect('(')?;
            let filter = self.filter()?;
            self.expect(')')?;
            Step::Filter(filter)
        } else {
            let mut selectors = vec![self.selector()?];
            self.skip_ws();
            while self.eat(',') {
                self.skip_ws();
                selectors.push(self.selector()?);
                self.skip_ws();
            }
            Step::Select(selectors)
        };
        self.skip_ws();
        self.expect(']')?;
        Ok(step)
    }

    fn selector(&mut self) -> PathResult<Selector> {
        if matches!(self.peek(), Some('\'' | '"')) {
            return Ok(Selector::Name(self.quoted()?));
        }
        let start = self.int()?;
        if !self.eat(':') {
            return match start {
                Some(index) => Ok(Selector::Index(index)),
                None => Err(self.error("expected index, slice or quoted name")),
            };
        }
        let end = self.int()?;
        let step = if self.eat(':') {
            match self.int()? {
                Some(step) if step > 0 => step,
                Some(_) => return Err(self.error("slice step must be positive")),
                None => 1,
            }
        } else {
            1
        };
        Ok(Selector::Slice { start, end, step })
    }

    fn int(&mut self) -> PathResult<Option<i64>> {
        let begin = self.pos;
        self.eat('-');
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.bump();
        }
        let digits = &self.src[begin..self.pos];
        if digits.is_empty() {
            return Ok(None);
        }
        digits.parse().map(Some).map_err(|_| PathError::Syntax {
            position: begin,
            message: format!("invalid integer '{digits}'"),
        })
    }

    fn quoted(&mut self) -> PathResult<String> {
        let quote = match self.bump() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(self.error("expected quote")),
        };
        let open = self.pos - 1;
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('\\') => match self.bump() {
                    Some(c) => text.push(c),
                    None => break,
                },
                Some(c) if c == quote => return Ok(text),
                Some(c) => text.push(c),
                None => break,
            }
        }
        Err(PathError::Syntax {
            position: open,
            message: "unterminated string".to_string(),
        })
    }

    fn filter(&mut self) -> PathResult<Filter> {
        self.skip_ws();
        if !self.eat('@') {
            return Err(self.error("filter must start with '@'"));
        }
        let path = self.path(|c| c.is_whitespace() || matches!(c, ')' | '=' | '!' | '<' | '>'))?;
        self.skip_ws();
        if self.peek() == Some(')') {
            return Ok(Filter { path, comparison: None });
        }
        let op = self.cmp_op()?;
        self.skip_ws();
        let literal = self.literal()?;
        self.skip_ws();
        Ok(Filter {
            path,
            comparison: Some((op, literal)),
        })
    }

    fn cmp_op(&mut self) -> PathResult<CmpOp> {
        // two-character operators first
        for (text, op) in [
            ("==", CmpOp::Eq),
            ("!=", CmpOp::Ne),
            ("<=", CmpOp::Le),
            (">=", CmpOp::Ge),
            ("<", CmpOp::Lt),
            (">", CmpOp::Gt),
        ] {
            if self.eat_str(text) {
                return Ok(op);
            }
        }
        Err(self.error("expected comparison operator"))
    }

    fn literal(&mut self) -> PathResult<Literal> {
        match self.peek() {
            Some('\'' | '"') => Ok(Literal::String(self.quoted()?)),
            Some(c) if c == '-' || c.is_ascii_digit() => {
                let begin = self.pos;
                self.bump();
                while matches!(self.peek(), Some(c) if c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
                {
                    self.bump();
                }
                let text = &self.src[begin..self.pos];
                text.parse().map(Literal::Number).map_err(|_| PathError::Syntax {
                    position: begin,
                    message: format!("invalid number '{text}'"),
                })
            }
            _ => {
                if self.eat_str("true") {
                    Ok(Literal::Bool(true))
                } else if self.eat_str("false") {
                    Ok(Literal::Bool(false))
                } else if self.eat_str("null") {
                    Ok(Literal::Null)
                } else {
                    Err(self.error("expected literal"))
                }
            }
        }
    }
}

fn is_ident_char(c: char) -> bool {
    !c.is_whitespace()
        && !matches!(
            c,
            '.' | '[' | ']' | '{' | '}' | '(' | ')' | ',' | '\'' | '"' | '@' | '$' | '*' | '='
                | '!' | '<' | '>' | '?' | ':' | '\\'
        )
}
