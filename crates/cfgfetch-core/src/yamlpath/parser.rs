//! Path expression parser.

use super::ast::{Selector, Step, YamlPath};
use super::error::YamlPathError;

pub(super) fn parse(path: &str) -> Result<YamlPath, YamlPathError> {
    let mut p = Parser {
        original: path,
        src: path.trim(),
        pos: 0,
    };
    let mut steps = Vec::new();

    if p.eat('$') {
        // explicit root
    } else if !p.at_end() && !p.peek_is('.') && !p.peek_is('[') {
        let name = p.name()?;
        steps.push(Step {
            recursive: false,
            selector: Selector::Names(vec![name]),
        });
    }

    while let Some(c) = p.peek() {
        match c {
            '.' => {
                p.bump();
                let recursive = p.eat('.');
                let selector = if p.eat('*') {
                    Selector::Wildcard
                } else if recursive && p.peek_is('[') {
                    p.bracket()?
                } else {
                    Selector::Names(vec![p.name()?])
                };
                steps.push(Step {
                    recursive,
                    selector,
                });
            }
            '[' => {
                let selector = p.bracket()?;
                steps.push(Step {
                    recursive: false,
                    selector,
                });
            }
            other => return Err(p.error(format!("unexpected character {:?}", other))),
        }
    }

    Ok(YamlPath { steps })
}

struct Parser<'a> {
    original: &'a str,
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, message: impl Into<String>) -> YamlPathError {
        YamlPathError {
            path: self.original.to_string(),
            position: self.pos,
            message: message.into(),
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_is(&self, c: char) -> bool {
        self.peek() == Some(c)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek_is(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<(), YamlPathError> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error(format!("expected {:?}", c)))
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// Dot-notation key: everything up to the next `.` or `[`.
    fn name(&mut self) -> Result<String, YamlPathError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == '.' || c == '[' {
                break;
            }
            self.bump();
        }
        let name = &self.src[start..self.pos];
        if name.is_empty() {
            return Err(self.error("expected a name"));
        }
        Ok(name.to_string())
    }

    fn bracket(&mut self) -> Result<Selector, YamlPathError> {
        self.expect('[')?;
        self.skip_ws();
        let selector = match self.peek() {
            Some('*') => {
                self.bump();
                Selector::Wildcard
            }
            Some('\'') | Some('"') => {
                let mut names = vec![self.quoted()?];
                self.skip_ws();
                while self.eat(',') {
                    self.skip_ws();
                    names.push(self.quoted()?);
                    self.skip_ws();
                }
                Selector::Names(names)
            }
            Some('?') => return Err(self.error("filter expressions are not supported")),
            _ => self.numeric()?,
        };
        self.skip_ws();
        self.expect(']')?;
        Ok(selector)
    }

    fn quoted(&mut self) -> Result<String, YamlPathError> {
        let quote = match self.bump() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(self.error("expected a quoted name")),
        };
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('\\') => match self.bump() {
                    Some(c) => out.push(c),
                    None => return Err(self.error("unterminated escape")),
                },
                Some(c) if c == quote => return Ok(out),
                Some(c) => out.push(c),
                None => return Err(self.error("unterminated quoted name")),
            }
        }
    }

    /// `[n]`, `[n,m,...]` or `[start:end:step]` (contents only).
    fn numeric(&mut self) -> Result<Selector, YamlPathError> {
        let first = self.int()?;
        self.skip_ws();
        if self.eat(':') {
            self.skip_ws();
            let end = self.int()?;
            self.skip_ws();
            let step = if self.eat(':') {
                self.skip_ws();
                self.int()?.unwrap_or(1)
            } else {
                1
            };
            if step == 0 {
                return Err(self.error("slice step cannot be zero"));
            }
            return Ok(Selector::Slice {
                start: first,
                end,
                step,
            });
        }

        let mut indices = vec![first.ok_or_else(|| self.error("expected an index"))?];
        while self.eat(',') {
            self.skip_ws();
            indices.push(self.int()?.ok_or_else(|| self.error("expected an index"))?);
            self.skip_ws();
        }
        Ok(Selector::Indices(indices))
    }

    fn int(&mut self) -> Result<Option<i64>, YamlPathError> {
        let start = self.pos;
        self.eat('-');
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        let text = &self.src[start..self.pos];
        if text.is_empty() {
            return Ok(None);
        }
        text.parse::<i64>()
            .map(Some)
            .map_err(|_| self.error(format!("invalid index {:?}", text)))
    }
}
