//! # Expression Evaluator
//!
//! Turns human-entered arithmetic text into an `f64`. Display glyphs
//! (`×`, `÷`, `−`) are normalized to their ASCII operators, the text is
//! tokenized, and a recursive-descent parser builds a small AST:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | primary
//! primary := NUMBER | '(' expr ')'
//! ```
//!
//! Same-precedence operators associate left to right. Any malformed input,
//! and any non-finite result, is reported as [`CalcError::InvalidExpression`].
//!
//! ## Example
//!
//! ```rust
//! use calc_core::expression::evaluate;
//!
//! assert_eq!(evaluate("2 × (3 + 4)").unwrap(), 14.0);
//! assert_eq!(evaluate("10 − 4 − 3").unwrap(), 3.0);
//! assert!(evaluate("1 ÷ 0").is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{CalcError, CalcResult};

/// Maximum nesting of parentheses and unary signs.
const MAX_DEPTH: usize = 256;

/// Maximum number of tokens in one expression. Operator chains build a
/// left-leaning tree as deep as the chain, so this also bounds tree depth.
const MAX_TOKENS: usize = 1024;

/// Replace display glyphs with canonical ASCII operators.
///
/// ```rust
/// use calc_core::expression::normalize;
///
/// assert_eq!(normalize("6 ÷ 2 × 3 − 1"), "6 / 2 * 3 - 1");
/// ```
pub fn normalize(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '×' => '*',
            '÷' => '/',
            '−' => '-',
            other => other,
        })
        .collect()
}

/// Evaluate an arithmetic expression.
///
/// Returns the finite result, or `InvalidExpression` if the text is
/// malformed or the result is infinite or NaN.
pub fn evaluate(text: &str) -> CalcResult<f64> {
    let value = Expression::parse(text)?.eval()?;
    debug!(expression = text, result = value, "evaluated expression");
    Ok(value)
}

// ============================================================================
// AST
// ============================================================================

/// Binary arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOp {
    fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Subtract => lhs - rhs,
            BinaryOp::Multiply => lhs * rhs,
            BinaryOp::Divide => lhs / rhs,
        }
    }

    /// Canonical ASCII symbol
    pub fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Subtract => '-',
            BinaryOp::Multiply => '*',
            BinaryOp::Divide => '/',
        }
    }
}

/// Parsed arithmetic expression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Expr {
    /// Numeric literal
    Number { value: f64 },
    /// Unary minus
    Negate { operand: Box<Expr> },
    /// Binary operation
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    /// Evaluate the tree. IEEE semantics apply, so the result may be
    /// infinite or NaN; [`Expression::eval`] is the checked entry point.
    pub fn value(&self) -> f64 {
        match self {
            Expr::Number { value } => *value,
            Expr::Negate { operand } => -operand.value(),
            Expr::Binary { op, lhs, rhs } => op.apply(lhs.value(), rhs.value()),
        }
    }
}

impl fmt::Display for Expr {
    /// Fully parenthesized canonical form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number { value } => write!(f, "{}", value),
            Expr::Negate { operand } => write!(f, "(-{})", operand),
            Expr::Binary { op, lhs, rhs } => write!(f, "({} {} {})", lhs, op.symbol(), rhs),
        }
    }
}

/// An expression parsed once and evaluated on demand.
///
/// ```rust
/// use calc_core::expression::Expression;
///
/// let expr = Expression::parse("1 + 2 * 3").unwrap();
/// assert_eq!(expr.to_string(), "(1 + (2 * 3))");
/// assert_eq!(expr.eval().unwrap(), 7.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    root: Expr,
}

impl Expression {
    /// Normalize, tokenize and parse `text`.
    pub fn parse(text: &str) -> CalcResult<Self> {
        let normalized = normalize(text);
        let tokens = tokenize(&normalized).map_err(|reason| CalcError::invalid_expression(text, reason))?;
        if tokens.len() > MAX_TOKENS {
            return Err(CalcError::invalid_expression(
                text,
                format!("expression has more than {} tokens", MAX_TOKENS),
            ));
        }
        let root = Parser::new(&tokens)
            .parse()
            .map_err(|reason| CalcError::invalid_expression(text, reason))?;

        Ok(Expression {
            source: text.to_string(),
            root,
        })
    }

    /// Evaluate, rejecting non-finite results.
    pub fn eval(&self) -> CalcResult<f64> {
        let value = self.root.value();
        if !value.is_finite() {
            return Err(CalcError::invalid_expression(
                &self.source,
                "result is not a finite number",
            ));
        }
        Ok(value)
    }

    /// The text this expression was parsed from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The root of the parsed tree
    pub fn root(&self) -> &Expr {
        &self.root
    }
}

impl FromStr for Expression {
    type Err = CalcError;

    fn from_str(s: &str) -> CalcResult<Self> {
        Expression::parse(s)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.root, f)
    }
}

// ============================================================================
// Tokenizer
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Op(BinaryOp),
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Op(op) => write!(f, "{}", op.symbol()),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
        }
    }
}

fn tokenize(text: &str) -> Result<Vec<Token>, String> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let token = match c {
            c if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '+' => Token::Op(BinaryOp::Add),
            '-' => Token::Op(BinaryOp::Subtract),
            '*' => Token::Op(BinaryOp::Multiply),
            '/' => Token::Op(BinaryOp::Divide),
            '(' => Token::LParen,
            ')' => Token::RParen,
            c if c.is_ascii_digit() || c == '.' => {
                let (value, next) = lex_number(&chars, i)?;
                tokens.push(Token::Number(value));
                i = next;
                continue;
            }
            other => return Err(format!("unexpected character '{}'", other)),
        };
        tokens.push(token);
        i += 1;
    }

    Ok(tokens)
}

/// Lex a decimal literal starting at `start`, returning its value and the
/// index just past it.
fn lex_number(chars: &[char], start: usize) -> Result<(f64, usize), String> {
    let digits_from = |mut i: usize| {
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let int_end = digits_from(start);
    let mut literal: String = chars[start..int_end].iter().collect();
    let mut i = int_end;

    if i < chars.len() && chars[i] == '.' {
        let frac_end = digits_from(i + 1);
        if literal.is_empty() && frac_end == i + 1 {
            return Err("unexpected character '.'".to_string());
        }
        if literal.is_empty() {
            literal.push('0');
        }
        if frac_end > i + 1 {
            literal.push('.');
            literal.extend(&chars[i + 1..frac_end]);
        }
        i = frac_end;
    }

    // Exponent only when followed by digits, so "2e" stays an error below
    if i < chars.len() && matches!(chars[i], 'e' | 'E') {
        let sign = i + 1 < chars.len() && matches!(chars[i + 1], '+' | '-');
        let digits_start = if sign { i + 2 } else { i + 1 };
        let exp_end = digits_from(digits_start);
        if exp_end > digits_start {
            literal.push('e');
            if sign {
                literal.push(chars[i + 1]);
            }
            literal.extend(&chars[digits_start..exp_end]);
            i = exp_end;
        }
    }

    if i < chars.len() && (chars[i] == '.' || chars[i].is_ascii_alphabetic()) {
        let bad: String = chars[start..=i].iter().collect();
        return Err(format!("malformed number '{}'", bad));
    }

    literal
        .parse::<f64>()
        .map(|value| (value, i))
        .map_err(|e| format!("malformed number '{}': {}", literal, e))
}

// ============================================================================
// Parser
// ============================================================================

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Parser {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn parse(mut self) -> Result<Expr, String> {
        if self.tokens.is_empty() {
            return Err("expression is empty".to_string());
        }

        let expr = self.parse_expr()?;
        match self.peek() {
            None => Ok(expr),
            Some(Token::RParen) => Err("unbalanced parentheses: unexpected ')'".to_string()),
            Some(token) => Err(format!("unexpected '{}' after complete expression", token)),
        }
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn enter(&mut self) -> Result<(), String> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err("expression is nested too deeply".to_string());
        }
        Ok(())
    }

    fn parse_expr(&mut self) -> Result<Expr, String> {
        let mut lhs = self.parse_term()?;
        while let Some(Token::Op(op @ (BinaryOp::Add | BinaryOp::Subtract))) = self.peek() {
            self.pos += 1;
            let rhs = self.parse_term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_term(&mut self) -> Result<Expr, String> {
        let mut lhs = self.parse_unary()?;
        while let Some(Token::Op(op @ (BinaryOp::Multiply | BinaryOp::Divide))) = self.peek() {
            self.pos += 1;
            let rhs = self.parse_unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, String> {
        match self.peek() {
            Some(Token::Op(BinaryOp::Subtract)) => {
                self.pos += 1;
                self.enter()?;
                let operand = self.parse_unary()?;
                self.depth -= 1;
                Ok(Expr::Negate {
                    operand: Box::new(operand),
                })
            }
            Some(Token::Op(BinaryOp::Add)) => {
                self.pos += 1;
                self.enter()?;
                let operand = self.parse_unary()?;
                self.depth -= 1;
                Ok(operand)
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, String> {
        match self.advance() {
            Some(Token::Number(value)) => Ok(Expr::Number { value }),
            Some(Token::LParen) => {
                self.enter()?;
                if self.peek() == Some(Token::RParen) {
                    return Err("empty parentheses".to_string());
                }
                let inner = self.parse_expr()?;
                match self.advance() {
                    Some(Token::RParen) => {
                        self.depth -= 1;
                        Ok(inner)
                    }
                    None => Err("unbalanced parentheses: missing ')'".to_string()),
                    Some(token) => Err(format!("expected ')' but found '{}'", token)),
                }
            }
            Some(Token::RParen) => Err("missing operand before ')'".to_string()),
            Some(Token::Op(op)) => Err(format!("missing operand before '{}'", op.symbol())),
            None => Err("expression ends with an operator".to_string()),
        }
    }
}
