//! Arithmetic formulas over calculator symbols.
//!
//! Formulas are parsed once, when a calculator is registered, into an [`Expr`] tree.
//! The grammar is the usual one for `+ - * /` with parentheses and unary minus:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := '-' unary | primary
//! primary := number | symbol | '(' expr ')'
//! ```

use std::collections::{BTreeMap, BTreeSet};

/// Symbol values used while evaluating a formula.
pub type Bindings = BTreeMap<String, f64>;

/// Bound on tree depth: parentheses, unary minus and chained operators all count.
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Symbol(String),
    Negate(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExpressionError {
    #[error("expression is empty")]
    Empty,
    #[error("unexpected character '{found}' at offset {offset}")]
    UnexpectedCharacter { found: char, offset: usize },
    #[error("invalid number '{literal}' at offset {offset}")]
    InvalidNumber { literal: String, offset: usize },
    #[error("unexpected '{found}' at offset {offset}")]
    UnexpectedToken { found: String, offset: usize },
    #[error("expression ended early, expected {expected}")]
    UnexpectedEnd { expected: &'static str },
    #[error("expression nests deeper than {} levels", MAX_DEPTH)]
    TooDeep,
}

/// Failures raised while computing a parsed formula.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArithmeticError {
    #[error("symbol '{0}' has no binding")]
    UnboundSymbol(String),
    #[error("division by zero")]
    DivisionByZero,
}

impl Expr {
    pub fn parse(source: &str) -> Result<Self, ExpressionError> {
        let tokens = tokenize(source)?;
        if tokens.is_empty() {
            return Err(ExpressionError::Empty);
        }

        let mut parser = Parser {
            tokens: &tokens,
            position: 0,
            depth: 0,
        };
        let expr = parser.expression()?;

        match parser.peek() {
            None => Ok(expr),
            Some(token) => Err(ExpressionError::UnexpectedToken {
                found: token.kind.to_string(),
                offset: token.offset,
            }),
        }
    }

    /// Every symbol the formula reads.
    pub fn symbols(&self) -> BTreeSet<&str> {
        let mut symbols = BTreeSet::new();
        self.collect_symbols(&mut symbols);
        symbols
    }

    fn collect_symbols<'a>(&'a self, symbols: &mut BTreeSet<&'a str>) {
        match self {
            Expr::Number(_) => {}
            Expr::Symbol(name) => {
                symbols.insert(name.as_str());
            }
            Expr::Negate(inner) => inner.collect_symbols(symbols),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.collect_symbols(symbols);
                rhs.collect_symbols(symbols);
            }
        }
    }

    pub fn evaluate(&self, bindings: &Bindings) -> Result<f64, ArithmeticError> {
        match self {
            Expr::Number(value) => Ok(*value),
            Expr::Symbol(name) => bindings
                .get(name)
                .copied()
                .ok_or_else(|| ArithmeticError::UnboundSymbol(name.clone())),
            Expr::Negate(inner) => Ok(-inner.evaluate(bindings)?),
            Expr::Binary { op, lhs, rhs } => {
                let lhs = lhs.evaluate(bindings)?;
                let rhs = rhs.evaluate(bindings)?;
                match op {
                    BinaryOp::Add => Ok(lhs + rhs),
                    BinaryOp::Subtract => Ok(lhs - rhs),
                    BinaryOp::Multiply => Ok(lhs * rhs),
                    BinaryOp::Divide if rhs == 0.0 => Err(ArithmeticError::DivisionByZero),
                    BinaryOp::Divide => Ok(lhs / rhs),
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Number(f64),
    Symbol(String),
    Plus,
    Minus,
    Star,
    Slash,
    LeftParen,
    RightParen,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Number(value) => write!(f, "{value}"),
            TokenKind::Symbol(name) => write!(f, "{name}"),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::LeftParen => write!(f, "("),
            TokenKind::RightParen => write!(f, ")"),
        }
    }
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    offset: usize,
}

fn tokenize(source: &str) -> Result<Vec<Token>, ExpressionError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(offset, ch)) = chars.peek() {
        let kind = match ch {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            c if c.is_ascii_digit() || c == '.' => {
                let mut literal = String::new();
                while let Some(&(_, next)) = chars.peek() {
                    if next.is_ascii_digit() || next == '.' {
                        literal.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| ExpressionError::InvalidNumber {
                        literal: literal.clone(),
                        offset,
                    })?;
                tokens.push(Token {
                    kind: TokenKind::Number(value),
                    offset,
                });
                continue;
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut name = String::new();
                while let Some(&(_, next)) = chars.peek() {
                    if next.is_ascii_alphanumeric() || next == '_' {
                        name.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token {
                    kind: TokenKind::Symbol(name),
                    offset,
                });
                continue;
            }
            other => {
                return Err(ExpressionError::UnexpectedCharacter {
                    found: other,
                    offset,
                })
            }
        };

        chars.next();
        tokens.push(Token { kind, offset });
    }

    Ok(tokens)
}

struct Parser<'a> {
    tokens: &'a [Token],
    position: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.position);
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn expression(&mut self) -> Result<Expr, ExpressionError> {
        let mut lhs = self.term()?;
        let mut chained = 0;
        loop {
            let op = match self.peek().map(|token| &token.kind) {
                Some(TokenKind::Plus) => BinaryOp::Add,
                Some(TokenKind::Minus) => BinaryOp::Subtract,
                _ => break,
            };
            self.advance();
            // every operator in a chain adds one level to the left spine
            self.enter()?;
            chained += 1;
            let rhs = self.term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        self.depth -= chained;
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, ExpressionError> {
        let mut lhs = self.unary()?;
        let mut chained = 0;
        loop {
            let op = match self.peek().map(|token| &token.kind) {
                Some(TokenKind::Star) => BinaryOp::Multiply,
                Some(TokenKind::Slash) => BinaryOp::Divide,
                _ => break,
            };
            self.advance();
            self.enter()?;
            chained += 1;
            let rhs = self.unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        self.depth -= chained;
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, ExpressionError> {
        if let Some(TokenKind::Minus) = self.peek().map(|token| &token.kind) {
            self.advance();
            self.enter()?;
            let inner = self.unary();
            self.depth -= 1;
            return Ok(Expr::Negate(Box::new(inner?)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, ExpressionError> {
        let token = self.advance().ok_or(ExpressionError::UnexpectedEnd {
            expected: "a number, symbol or '('",
        })?;

        match &token.kind {
            TokenKind::Number(value) => Ok(Expr::Number(*value)),
            TokenKind::Symbol(name) => Ok(Expr::Symbol(name.clone())),
            TokenKind::LeftParen => {
                self.enter()?;
                let inner = self.expression();
                self.depth -= 1;
                let inner = inner?;
                match self.advance() {
                    Some(Token {
                        kind: TokenKind::RightParen,
                        ..
                    }) => Ok(inner),
                    Some(other) => Err(ExpressionError::UnexpectedToken {
                        found: other.kind.to_string(),
                        offset: other.offset,
                    }),
                    None => Err(ExpressionError::UnexpectedEnd { expected: "')'" }),
                }
            }
            other => Err(ExpressionError::UnexpectedToken {
                found: other.to_string(),
                offset: token.offset,
            }),
        }
    }

    fn enter(&mut self) -> Result<(), ExpressionError> {
        if self.depth >= MAX_DEPTH {
            return Err(ExpressionError::TooDeep);
        }
        self.depth += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bindings(pairs: &[(&str, f64)]) -> Bindings {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect()
    }

    fn eval(source: &str, pairs: &[(&str, f64)]) -> Result<f64, ArithmeticError> {
        Expr::parse(source)
            .expect("expression parses")
            .evaluate(&bindings(pairs))
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        assert_eq!(eval("2 + 3 * 4", &[]), Ok(14.0));
        assert_eq!(eval("(2 + 3) * 4", &[]), Ok(20.0));
    }

    #[test]
    fn same_precedence_operators_associate_left() {
        assert_eq!(eval("10 - 4 - 3", &[]), Ok(3.0));
        assert_eq!(eval("48 / 4 / 2", &[]), Ok(6.0));
    }

    #[test]
    fn unary_minus_applies_to_the_next_operand() {
        assert_eq!(eval("-2 * -3", &[]), Ok(6.0));
        assert_eq!(eval("4 - -X", &[("X", 1.5)]), Ok(5.5));
    }

    #[test]
    fn household_formula_evaluates_with_bindings() {
        let result = eval(
            "(P * 5) + (GV * GF) + ((F_G + F_E + F_D + F_CNG) * FF)",
            &[
                ("P", 2.0),
                ("GV", 35.0),
                ("GF", 1.2),
                ("F_G", 100.0),
                ("F_E", 0.0),
                ("F_D", 0.0),
                ("F_CNG", 0.0),
                ("FF", 1.8),
            ],
        )
        .expect("formula evaluates");
        assert!((result - 232.0).abs() < 1e-9, "got {result}");
    }

    #[test]
    fn symbols_are_collected_once() {
        let expr = Expr::parse("A * (B / 100) * (A * 1.5)").expect("parses");
        let symbols: Vec<&str> = expr.symbols().into_iter().collect();
        assert_eq!(symbols, vec!["A", "B"]);
    }

    #[test]
    fn division_by_zero_is_reported() {
        assert_eq!(
            eval("P / (Q - 1)", &[("P", 3.0), ("Q", 1.0)]),
            Err(ArithmeticError::DivisionByZero)
        );
    }

    #[test]
    fn unbound_symbols_are_reported() {
        assert_eq!(
            eval("P + Z", &[("P", 1.0)]),
            Err(ArithmeticError::UnboundSymbol("Z".to_string()))
        );
    }

    #[test]
    fn malformed_expressions_are_rejected() {
        assert_eq!(Expr::parse("   "), Err(ExpressionError::Empty));
        assert!(matches!(
            Expr::parse("P + "),
            Err(ExpressionError::UnexpectedEnd { .. })
        ));
        assert!(matches!(
            Expr::parse("(P + 1"),
            Err(ExpressionError::UnexpectedEnd { expected: "')'" })
        ));
        assert!(matches!(
            Expr::parse("P 2"),
            Err(ExpressionError::UnexpectedToken { offset: 2, .. })
        ));
        assert!(matches!(
            Expr::parse("P % 2"),
            Err(ExpressionError::UnexpectedCharacter { found: '%', .. })
        ));
        assert!(matches!(
            Expr::parse("1.2.3"),
            Err(ExpressionError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn nesting_is_bounded() {
        let source = format!("{}1{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert_eq!(Expr::parse(&source), Err(ExpressionError::TooDeep));

        let shallow = format!("{}1{}", "(".repeat(8), ")".repeat(8));
        assert_eq!(Expr::parse(&shallow), Ok(Expr::Number(1.0)));
    }

    #[test]
    fn long_operator_chains_are_bounded() {
        let sum = vec!["1"; 200_000].join("+");
        assert_eq!(Expr::parse(&sum), Err(ExpressionError::TooDeep));

        let product = vec!["X"; MAX_DEPTH + 2].join(" * ");
        assert_eq!(Expr::parse(&product), Err(ExpressionError::TooDeep));
    }

    #[test]
    fn chains_within_the_bound_still_evaluate() {
        let sum = vec!["1"; 100].join(" + ");
        assert_eq!(eval(&sum, &[]), Ok(100.0));

        let mixed = vec!["(2 * 3 - 5)"; 100].join(" + ");
        assert_eq!(eval(&mixed, &[]), Ok(100.0));
    }
}
