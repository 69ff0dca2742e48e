//! Text builders for generated GLSL
//!
//! [`Expr`] is an owned expression fragment that composes by wrapping, and
//! [`ShaderWriter`] is an append-only line buffer.

use std::fmt;

/// Literal a zero register reads as
pub const ZERO_LITERAL: &str = "0.0";

/// Owned GLSL expression text
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Expr(String);

impl Expr {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The `0.0` literal
    pub fn zero() -> Self {
        Self(ZERO_LITERAL.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == ZERO_LITERAL
    }

    /// Append text in place, e.g. a swizzle
    pub fn push_str(&mut self, suffix: &str) {
        self.0.push_str(suffix);
    }

    /// `prefix` + self + `suffix`
    pub fn wrap(self, prefix: &str, suffix: &str) -> Expr {
        let mut text = String::with_capacity(prefix.len() + self.0.len() + suffix.len());
        text.push_str(prefix);
        text.push_str(&self.0);
        text.push_str(suffix);
        Expr(text)
    }

    /// `(lhs op rhs)`
    pub fn binary(lhs: &Expr, op: &str, rhs: &Expr) -> Expr {
        let mut text = String::with_capacity(lhs.0.len() + op.len() + rhs.0.len() + 4);
        text.push('(');
        text.push_str(&lhs.0);
        text.push(' ');
        text.push_str(op);
        text.push(' ');
        text.push_str(&rhs.0);
        text.push(')');
        Expr(text)
    }

    /// `func(a, b)`
    pub fn call2(func: &str, a: &Expr, b: &Expr) -> Expr {
        let mut text = String::with_capacity(func.len() + a.0.len() + b.0.len() + 4);
        text.push_str(func);
        text.push('(');
        text.push_str(&a.0);
        text.push_str(", ");
        text.push_str(&b.0);
        text.push(')');
        Expr(text)
    }

    /// `((cond) ? if_true : if_false)`
    pub fn select(cond: &str, if_true: &Expr, if_false: &Expr) -> Expr {
        let mut text =
            String::with_capacity(cond.len() + if_true.0.len() + if_false.0.len() + 12);
        text.push_str("((");
        text.push_str(cond);
        text.push_str(") ? ");
        text.push_str(&if_true.0);
        text.push_str(" : ");
        text.push_str(&if_false.0);
        text.push(')');
        Expr(text)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Append-only buffer of shader source lines
#[derive(Debug, Clone, Default)]
pub struct ShaderWriter {
    buf: String,
}

impl ShaderWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one formatted line
    pub fn line(&mut self, args: fmt::Arguments<'_>) {
        match args.as_str() {
            Some(text) => self.buf.push_str(text),
            None => self.buf.push_str(&fmt::format(args)),
        }
        self.buf.push('\n');
    }

    /// Append one literal line
    pub fn line_str(&mut self, text: &str) {
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}
