//! Price expressions
//!
//! A price is stored exactly as the user typed it. It may be a plain number
//! ("12.50", "12,50") or a small arithmetic expression ("4+5*6", "(10-2)/4").
//! The evaluator only understands numeric literals, unary `+`/`-`, the four
//! binary operators and parentheses. Anything else is rejected.

use crate::error::{LedgerError, LedgerResult};

/// Parse a price text into its numeric value
///
/// Empty input yields `0.0`. Commas are treated as decimal points and
/// whitespace anywhere in the text is ignored.
pub fn parse_price(text: &str) -> LedgerResult<f64> {
    let normalized: String = text
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if normalized.is_empty() {
        return Ok(0.0);
    }

    let invalid = || LedgerError::InvalidPrice(text.trim().to_string());

    // Plain numbers take the fast path. Names like "inf" or "nan" are not numbers here.
    if normalized.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return normalized.parse::<f64>().map_err(|_| invalid());
    }

    let tokens = tokenize(&normalized)
        .filter(|tokens| tokens.len() <= MAX_TOKENS)
        .ok_or_else(invalid)?;
    let mut parser = Parser::new(tokens);
    let expr = parser.parse_expr().ok_or_else(invalid)?;
    if parser.pos != parser.tokens.len() {
        return Err(invalid());
    }

    match expr.eval() {
        Some(value) if value.is_finite() => Ok(value),
        _ => Err(invalid()),
    }
}

/// Format a price text with exactly two decimals
pub fn format_price(text: &str) -> LedgerResult<String> {
    Ok(format_amount(parse_price(text)?))
}

/// Format an already-computed amount with exactly two decimals
pub fn format_amount(value: f64) -> String {
    let formatted = format!("{:.2}", value);
    // -0.00 reads as a bug in a ledger
    if formatted == "-0.00" {
        "0.00".to_string()
    } else {
        formatted
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Option<Vec<Token>> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let token = match bytes[i] {
            b'+' => Token::Plus,
            b'-' => Token::Minus,
            b'*' => Token::Star,
            b'/' => Token::Slash,
            b'(' => Token::LParen,
            b')' => Token::RParen,
            b'0'..=b'9' | b'.' => {
                let start = i;
                let mut seen_dot = false;
                let mut seen_digit = false;
                while i < bytes.len() {
                    match bytes[i] {
                        b'0'..=b'9' => seen_digit = true,
                        b'.' if !seen_dot => seen_dot = true,
                        _ => break,
                    }
                    i += 1;
                }
                if !seen_digit {
                    return None;
                }
                // Optional exponent: 1e3, 2.5E-2
                if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
                    let mut j = i + 1;
                    if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
                        j += 1;
                    }
                    let digits_start = j;
                    while j < bytes.len() && bytes[j].is_ascii_digit() {
                        j += 1;
                    }
                    if j == digits_start {
                        return None;
                    }
                    i = j;
                }
                let value = input[start..i].parse::<f64>().ok()?;
                tokens.push(Token::Number(value));
                continue;
            }
            _ => return None,
        };
        tokens.push(token);
        i += 1;
    }

    Some(tokens)
}

/// The only node kinds the evaluator accepts
#[derive(Debug)]
enum Expr {
    Literal(f64),
    Negate(Box<Expr>),
    Binary(Box<Expr>, BinaryOp, Box<Expr>),
}

#[derive(Debug, Clone, Copy)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl Expr {
    fn eval(&self) -> Option<f64> {
        match self {
            Expr::Literal(value) => Some(*value),
            Expr::Negate(inner) => inner.eval().map(|v| -v),
            Expr::Binary(lhs, op, rhs) => {
                let lhs = lhs.eval()?;
                let rhs = rhs.eval()?;
                match op {
                    BinaryOp::Add => Some(lhs + rhs),
                    BinaryOp::Sub => Some(lhs - rhs),
                    BinaryOp::Mul => Some(lhs * rhs),
                    BinaryOp::Div if rhs == 0.0 => None,
                    BinaryOp::Div => Some(lhs / rhs),
                }
            }
        }
    }
}

/// Recursive-descent parser over the token stream
///
/// ```text
/// expr    := term (('+' | '-') term)*
/// term    := unary (('*' | '/') unary)*
/// unary   := ('+' | '-') unary | primary
/// primary := number | '(' expr ')'
/// ```
///
/// Nesting of parentheses and unary signs is bounded by [`MAX_DEPTH`]; the
/// token count by [`MAX_TOKENS`], which also bounds the depth of operator
/// chains.
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

const MAX_DEPTH: usize = 256;
const MAX_TOKENS: usize = 1024;

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn enter(&mut self) -> Option<()> {
        if self.depth >= MAX_DEPTH {
            return None;
        }
        self.depth += 1;
        Some(())
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    fn parse_expr(&mut self) -> Option<Expr> {
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Some(lhs),
            };
            self.pos += 1;
            let rhs = self.parse_term()?;
            lhs = Expr::Binary(Box::new(lhs), op, Box::new(rhs));
        }
    }

    fn parse_term(&mut self) -> Option<Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => return Some(lhs),
            };
            self.pos += 1;
            let rhs = self.parse_unary()?;
            lhs = Expr::Binary(Box::new(lhs), op, Box::new(rhs));
        }
    }

    fn parse_unary(&mut self) -> Option<Expr> {
        let negate = match self.peek()? {
            Token::Plus => false,
            Token::Minus => true,
            _ => return self.parse_primary(),
        };
        self.pos += 1;
        self.enter()?;
        let inner = self.parse_unary()?;
        self.depth -= 1;
        Some(if negate {
            Expr::Negate(Box::new(inner))
        } else {
            inner
        })
    }

    fn parse_primary(&mut self) -> Option<Expr> {
        match self.next()? {
            Token::Number(value) => Some(Expr::Literal(value)),
            Token::LParen => {
                self.enter()?;
                let inner = self.parse_expr()?;
                self.depth -= 1;
                match self.next()? {
                    Token::RParen => Some(inner),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_numbers() {
        assert_eq!(parse_price("12").unwrap(), 12.0);
        assert_eq!(parse_price("  12.5 ").unwrap(), 12.5);
        assert_eq!(parse_price("12,5").unwrap(), 12.5);
        assert_eq!(parse_price(".5").unwrap(), 0.5);
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(parse_price("").unwrap(), 0.0);
        assert_eq!(parse_price("   ").unwrap(), 0.0);
    }

    #[test]
    fn test_precedence() {
        assert_eq!(parse_price("4+5*6").unwrap(), 34.0);
        assert_eq!(parse_price("(4+5)*6").unwrap(), 54.0);
        assert_eq!(parse_price("10/4").unwrap(), 2.5);
        assert_eq!(parse_price("10-4-3").unwrap(), 3.0);
        assert_eq!(parse_price("100/10/5").unwrap(), 2.0);
    }

    #[test]
    fn test_unary_and_spaces() {
        assert_eq!(parse_price("-5").unwrap(), -5.0);
        assert_eq!(parse_price("-(2+3)").unwrap(), -5.0);
        assert_eq!(parse_price("+3 * -2").unwrap(), -6.0);
        assert_eq!(parse_price("1 2 + 3").unwrap(), 15.0);
        assert_eq!(parse_price("2,5*2").unwrap(), 5.0);
    }

    #[test]
    fn test_rejects_anything_else() {
        for text in [
            "abc", "2**3", "7//2", "7%2", "sqrt(4)", "(1+2", "1+2)", "1+", "*3", "inf", "nan",
            "1.2.3", "()", "1e", "2(3)",
        ] {
            let err = parse_price(text).unwrap_err();
            assert!(
                matches!(err, LedgerError::InvalidPrice(_)),
                "expected InvalidPrice for {text:?}"
            );
        }
    }

    #[test]
    fn test_division_by_zero_rejected() {
        assert!(matches!(
            parse_price("5/0"),
            Err(LedgerError::InvalidPrice(_))
        ));
        assert!(matches!(
            parse_price("5/(2-2)"),
            Err(LedgerError::InvalidPrice(_))
        ));
    }

    #[test]
    fn test_deep_nesting_rejected() {
        let parens = format!("{}1{}", "(".repeat(100_000), ")".repeat(100_000));
        assert!(matches!(
            parse_price(&parens),
            Err(LedgerError::InvalidPrice(_))
        ));

        let signs = format!("{}1", "-".repeat(100_000));
        assert!(matches!(
            parse_price(&signs),
            Err(LedgerError::InvalidPrice(_))
        ));

        let chain = format!("{}1", "1+".repeat(100_000));
        assert!(matches!(
            parse_price(&chain),
            Err(LedgerError::InvalidPrice(_))
        ));

        let too_deep = format!("{}1{}", "(".repeat(300), ")".repeat(300));
        assert!(parse_price(&too_deep).is_err());

        let nested = format!("{}1{}", "(".repeat(50), ")".repeat(50));
        assert_eq!(parse_price(&nested).unwrap(), 1.0);
        assert_eq!(parse_price("--+-2").unwrap(), -2.0);
    }

    #[test]
    fn test_exponent_literal() {
        assert_eq!(parse_price("1e2+1").unwrap(), 101.0);
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price("10/4").unwrap(), "2.50");
        assert_eq!(format_price("").unwrap(), "0.00");
        assert_eq!(format_price("3,333").unwrap(), "3.33");
        assert!(format_price("abc").is_err());
    }

    #[test]
    fn test_format_amount_no_negative_zero() {
        assert_eq!(format_amount(-0.001), "0.00");
        assert_eq!(format_amount(-1.5), "-1.50");
    }
}
