//! Recursive-descent parser for the emitted expression subset.
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! expr     := and ('?' expr ':' expr)?
//! and      := equality ('&&' equality)*
//! equality := unary ('===' unary)*
//! unary    := '!' unary | 'typeof' unary | postfix
//! postfix  := primary ('.' ident | '?.' ident | '?.[' expr ']'
//!                      | '[' expr ']' | '(' args ')')*
//! primary  := number | string | template | arrow | ident | tagged
//!             | '(' expr ')' | '[' elements ']'
//! ```
//!
//! Expression positions are whitespace-insensitive; template literal text is
//! preserved byte for byte apart from escape cooking.

use crate::HarnessError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    Ident(String),
    Num(f64),
    Str(String),
    /// Untagged `` `...` `` template.
    Template(Vec<TplPart>),
    /// `$$`-or-`$$$`-tagged template.
    Tagged { tag: Tag, parts: Vec<TplPart> },
    ArrayLit(Vec<Expr>),
    Member {
        obj: Box<Expr>,
        prop: String,
        optional: bool,
    },
    Index {
        obj: Box<Expr>,
        index: Box<Expr>,
        optional: bool,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Arrow {
        params: Vec<String>,
        body: Box<Expr>,
    },
    Not(Box<Expr>),
    TypeOf(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    StrictEq(Box<Expr>, Box<Expr>),
    Ternary {
        cond: Box<Expr>,
        then: Box<Expr>,
        other: Box<Expr>,
    },
}

/// The two runtime entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tag {
    /// `$$` — escaping, returns a string.
    Escape,
    /// `$$$` — trusted, returns a fragment.
    Trust,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TplPart {
    Lit(String),
    Hole(Expr),
}

/// Parse a complete expression; trailing input is an error.
pub(crate) fn parse(src: &str) -> Result<Expr, HarnessError> {
    let mut p = Parser { src, pos: 0 };
    let expr = p.expr()?;
    p.skip_ws();
    if p.pos != src.len() {
        return Err(p.err("unexpected trailing input"));
    }
    Ok(expr)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn err(&self, msg: impl Into<String>) -> HarnessError {
        HarnessError::Parse {
            at: self.pos,
            msg: msg.into(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn starts_with(&self, s: &str) -> bool {
        self.src[self.pos..].starts_with(s)
    }

    fn bump(&mut self, n: usize) {
        self.pos += n;
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.src[self.pos..].chars().next()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, c: u8) -> Result<(), HarnessError> {
        if self.peek() == Some(c) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.err(format!("expected `{}`", c as char)))
        }
    }

    fn ident(&mut self) -> Option<String> {
        let start = self.pos;
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == b'_' || c == b'$' => self.pos += 1,
            _ => return None,
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == b'_' || c == b'$')
        {
            self.pos += 1;
        }
        Some(self.src[start..self.pos].to_string())
    }

    // ---- precedence levels ----

    fn expr(&mut self) -> Result<Expr, HarnessError> {
        let cond = self.and()?;
        self.skip_ws();
        if self.peek() == Some(b'?') && !self.starts_with("?.") {
            self.bump(1);
            let then = self.expr()?;
            self.skip_ws();
            self.expect(b':')?;
            let other = self.expr()?;
            return Ok(Expr::Ternary {
                cond: Box::new(cond),
                then: Box::new(then),
                other: Box::new(other),
            });
        }
        Ok(cond)
    }

    fn and(&mut self) -> Result<Expr, HarnessError> {
        let mut lhs = self.equality()?;
        loop {
            self.skip_ws();
            if self.starts_with("&&") {
                self.bump(2);
                let rhs = self.equality()?;
                lhs = Expr::And(Box::new(lhs), Box::new(rhs));
            } else {
                return Ok(lhs);
            }
        }
    }

    fn equality(&mut self) -> Result<Expr, HarnessError> {
        let mut lhs = self.unary()?;
        loop {
            self.skip_ws();
            if self.starts_with("===") {
                self.bump(3);
                let rhs = self.unary()?;
                lhs = Expr::StrictEq(Box::new(lhs), Box::new(rhs));
            } else {
                return Ok(lhs);
            }
        }
    }

    fn unary(&mut self) -> Result<Expr, HarnessError> {
        self.skip_ws();
        if self.peek() == Some(b'!') {
            self.bump(1);
            return Ok(Expr::Not(Box::new(self.unary()?)));
        }
        self.postfix()
    }

    fn postfix(&mut self) -> Result<Expr, HarnessError> {
        let mut expr = self.primary()?;
        loop {
            self.skip_ws();
            if self.starts_with("?.") {
                self.bump(2);
                if self.peek() == Some(b'[') {
                    self.bump(1);
                    let index = self.expr()?;
                    self.skip_ws();
                    self.expect(b']')?;
                    expr = Expr::Index {
                        obj: Box::new(expr),
                        index: Box::new(index),
                        optional: true,
                    };
                } else {
                    let prop = self.ident().ok_or_else(|| self.err("property after `?.`"))?;
                    expr = Expr::Member {
                        obj: Box::new(expr),
                        prop,
                        optional: true,
                    };
                }
            } else if self.peek() == Some(b'.') {
                self.bump(1);
                let prop = self.ident().ok_or_else(|| self.err("property after `.`"))?;
                expr = Expr::Member {
                    obj: Box::new(expr),
                    prop,
                    optional: false,
                };
            } else if self.peek() == Some(b'[') {
                self.bump(1);
                let index = self.expr()?;
                self.skip_ws();
                self.expect(b']')?;
                expr = Expr::Index {
                    obj: Box::new(expr),
                    index: Box::new(index),
                    optional: false,
                };
            } else if self.peek() == Some(b'(') {
                self.bump(1);
                let args = self.arguments()?;
                expr = Expr::Call {
                    callee: Box::new(expr),
                    args,
                };
            } else {
                return Ok(expr);
            }
        }
    }

    fn arguments(&mut self) -> Result<Vec<Expr>, HarnessError> {
        let mut args = Vec::new();
        self.skip_ws();
        if self.peek() == Some(b')') {
            self.bump(1);
            return Ok(args);
        }
        loop {
            args.push(self.expr()?);
            self.skip_ws();
            match self.peek() {
                Some(b',') => self.bump(1),
                Some(b')') => {
                    self.bump(1);
                    return Ok(args);
                }
                _ => return Err(self.err("expected `,` or `)` in arguments")),
            }
        }
    }

    fn primary(&mut self) -> Result<Expr, HarnessError> {
        self.skip_ws();
        match self.peek() {
            Some(b'(') => {
                if let Some(params) = self.try_arrow_params() {
                    let body = self.expr()?;
                    return Ok(Expr::Arrow {
                        params,
                        body: Box::new(body),
                    });
                }
                self.bump(1);
                let inner = self.expr()?;
                self.skip_ws();
                self.expect(b')')?;
                Ok(inner)
            }
            Some(b'[') => {
                self.bump(1);
                let mut items = Vec::new();
                self.skip_ws();
                if self.peek() == Some(b']') {
                    self.bump(1);
                    return Ok(Expr::ArrayLit(items));
                }
                loop {
                    items.push(self.expr()?);
                    self.skip_ws();
                    match self.peek() {
                        Some(b',') => self.bump(1),
                        Some(b']') => {
                            self.bump(1);
                            return Ok(Expr::ArrayLit(items));
                        }
                        _ => return Err(self.err("expected `,` or `]` in array")),
                    }
                }
            }
            Some(b'`') => Ok(Expr::Template(self.template()?)),
            Some(b'"') => Ok(Expr::Str(self.string_literal()?)),
            Some(c) if c.is_ascii_digit() => self.number(),
            _ => {
                let ident = self.ident().ok_or_else(|| self.err("expected expression"))?;
                if ident == "typeof" {
                    return Ok(Expr::TypeOf(Box::new(self.unary()?)));
                }
                // tagged template directly after the tag name
                if self.peek() == Some(b'`') {
                    let tag = match ident.as_str() {
                        "$$" => Tag::Escape,
                        "$$$" => Tag::Trust,
                        other => return Err(self.err(format!("unknown template tag `{other}`"))),
                    };
                    return Ok(Expr::Tagged {
                        tag,
                        parts: self.template()?,
                    });
                }
                // single-parameter arrow: `w => body`
                let save = self.pos;
                self.skip_ws();
                if self.starts_with("=>") {
                    self.bump(2);
                    let body = self.expr()?;
                    return Ok(Expr::Arrow {
                        params: vec![ident],
                        body: Box::new(body),
                    });
                }
                self.pos = save;
                Ok(Expr::Ident(ident))
            }
        }
    }

    /// Lookahead for `()`, `(a)`, `(a, b)` … followed by `=>`; restores the
    /// position and returns `None` when this is a parenthesized expression.
    fn try_arrow_params(&mut self) -> Option<Vec<String>> {
        let save = self.pos;
        self.bump(1); // '('
        self.skip_ws();
        let mut params = Vec::new();
        if self.peek() == Some(b')') {
            self.bump(1);
        } else {
            loop {
                self.skip_ws();
                let Some(id) = self.ident() else {
                    self.pos = save;
                    return None;
                };
                params.push(id);
                self.skip_ws();
                match self.peek() {
                    Some(b',') => self.bump(1),
                    Some(b')') => {
                        self.bump(1);
                        break;
                    }
                    _ => {
                        self.pos = save;
                        return None;
                    }
                }
            }
        }
        self.skip_ws();
        if self.starts_with("=>") {
            self.bump(2);
            Some(params)
        } else {
            self.pos = save;
            None
        }
    }

    /// `` `...` `` with `${expr}` holes. Cooks the escapes the compiler
    /// emits (`\``, `\$`) plus the common single-character ones.
    fn template(&mut self) -> Result<Vec<TplPart>, HarnessError> {
        self.expect(b'`')?;
        let mut parts = Vec::new();
        let mut lit = String::new();
        loop {
            match self.peek() {
                None => return Err(self.err("unterminated template literal")),
                Some(b'`') => {
                    self.bump(1);
                    parts.push(TplPart::Lit(lit));
                    return Ok(parts);
                }
                Some(b'\\') => {
                    self.bump(1);
                    match self.next_char() {
                        None => return Err(self.err("dangling escape")),
                        Some('n') => lit.push('\n'),
                        Some('t') => lit.push('\t'),
                        Some('r') => lit.push('\r'),
                        // `\``, `\$`, `\\` and any other escaped character
                        // cook to the character itself.
                        Some(c) => lit.push(c),
                    }
                }
                Some(b'$') if self.src[self.pos + 1..].starts_with('{') => {
                    parts.push(TplPart::Lit(std::mem::take(&mut lit)));
                    self.bump(2);
                    let hole = self.expr()?;
                    self.skip_ws();
                    self.expect(b'}')?;
                    parts.push(TplPart::Hole(hole));
                }
                Some(_) => {
                    let c = self.next_char().unwrap();
                    lit.push(c);
                }
            }
        }
    }

    fn string_literal(&mut self) -> Result<String, HarnessError> {
        self.expect(b'"')?;
        let mut out = String::new();
        loop {
            match self.next_char() {
                None => return Err(self.err("unterminated string literal")),
                Some('"') => return Ok(out),
                Some('\\') => match self.next_char() {
                    None => return Err(self.err("dangling escape")),
                    Some(c) => out.push(c),
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn number(&mut self) -> Result<Expr, HarnessError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
        }
        let text = &self.src[start..self.pos];
        text.parse::<f64>()
            .map(Expr::Num)
            .map_err(|_| self.err("bad number literal"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_root_arrow() {
        let ast = parse("(v) => $$`x`").unwrap();
        let Expr::Arrow { params, body } = ast else {
            panic!("expected arrow");
        };
        assert_eq!(params, vec!["v"]);
        assert!(matches!(
            *body,
            Expr::Tagged {
                tag: Tag::Escape,
                ..
            }
        ));
    }

    #[test]
    fn parses_binary_arrow_and_optional_chains() {
        let ast = parse("(v, alt) => $$`${alt.foo?.bar}`").unwrap();
        let Expr::Arrow { params, .. } = ast else {
            panic!("expected arrow");
        };
        assert_eq!(params, vec!["v", "alt"]);
    }

    #[test]
    fn parses_the_on_demand_trichotomy() {
        let src = r#"(v) => $$`${ !!v.bar && (Array.isArray(v.bar) ? v.bar : typeof v.bar === "object" ? [v.bar] : [v]).map(w => $$$`x${w.y}`) }`"#;
        parse(src).unwrap();
    }

    #[test]
    fn parses_zero_param_arrows_and_bare_templates() {
        let src = "(v) => $$`${ v.xs?.map(() => `:baz:`) }`";
        parse(src).unwrap();
    }

    #[test]
    fn cooks_template_escapes() {
        let ast = parse(r"(v) => $$`a\`b\${c}d`").unwrap();
        let Expr::Arrow { body, .. } = ast else {
            panic!()
        };
        let Expr::Tagged { parts, .. } = *body else {
            panic!()
        };
        assert_eq!(parts, vec![TplPart::Lit("a`b${c}d".into())]);
    }

    #[test]
    fn optional_index_and_quoted_members() {
        parse(r#"(v) => $$`${v.list?.[0]?.["other-key"]}`"#).unwrap();
    }

    #[test]
    fn rejects_trailing_input() {
        assert!(parse("(v) => $$`x` junk").is_err());
        assert!(parse("(v) => $$`x").is_err());
    }
}
