//! A small arithmetic and boolean expression evaluator.
//!
//! Supports numbers, `true`/`false`, `+ - * / %`, comparisons
//! (`== = != < <= > >=`), `&& || !` and parentheses. Booleans evaluate to
//! 1 or 0 so every successful result is a number. Anything else, including
//! bare words and division by zero, yields `None`.

use crate::traits::ExpressionEngine;

#[derive(Debug, Clone, Copy, Default)]
pub struct BasicExpressionEngine;

impl ExpressionEngine for BasicExpressionEngine {
    fn evaluate(&self, expression: &str) -> Option<f64> {
        let tokens = tokenize(expression)?;
        if tokens.is_empty() {
            return None;
        }
        let mut parser = Parser {
            tokens,
            pos: 0,
            depth: 0,
        };
        let value = parser.or()?;
        if parser.pos != parser.tokens.len() {
            return None;
        }
        value.is_finite().then_some(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Num(f64),
    Op(&'static str),
    Open,
    Close,
}

const OPERATORS: [&str; 15] = [
    "&&", "||", "==", "!=", "<=", ">=", "<", ">", "=", "!", "+", "-", "*", "/", "%",
];

fn tokenize(input: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut rest = input.trim_start();
    while !rest.is_empty() {
        let c = rest.chars().next()?;
        if c == '(' {
            tokens.push(Token::Open);
            rest = &rest[1..];
        } else if c == ')' {
            tokens.push(Token::Close);
            rest = &rest[1..];
        } else if c.is_ascii_digit() || c == '.' {
            let end = rest
                .find(|ch: char| !(ch.is_ascii_digit() || ch == '.'))
                .unwrap_or(rest.len());
            tokens.push(Token::Num(rest[..end].parse().ok()?));
            rest = &rest[end..];
        } else if c.is_ascii_alphabetic() {
            let end = rest
                .find(|ch: char| !ch.is_ascii_alphanumeric())
                .unwrap_or(rest.len());
            let word = &rest[..end];
            if word.eq_ignore_ascii_case("true") {
                tokens.push(Token::Num(1.0));
            } else if word.eq_ignore_ascii_case("false") {
                tokens.push(Token::Num(0.0));
            } else {
                return None;
            }
            rest = &rest[end..];
        } else {
            let op = OPERATORS.iter().find(|op| rest.starts_with(**op))?;
            tokens.push(Token::Op(*op));
            rest = &rest[op.len()..];
        }
        rest = rest.trim_start();
    }
    Some(tokens)
}

/// Nesting limit for parentheses and prefix operators.
const MAX_DEPTH: usize = 256;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

fn truthy(value: f64) -> bool {
    value != 0.0
}

fn bool_value(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

impl Parser {
    fn peek_op(&self) -> Option<&'static str> {
        match self.tokens.get(self.pos) {
            Some(Token::Op(op)) => Some(*op),
            _ => None,
        }
    }

    fn eat(&mut self, ops: &[&str]) -> Option<&'static str> {
        let op = self.peek_op().filter(|op| ops.contains(op))?;
        self.pos += 1;
        Some(op)
    }

    fn or(&mut self) -> Option<f64> {
        let mut left = self.and()?;
        while self.eat(&["||"]).is_some() {
            let right = self.and()?;
            left = bool_value(truthy(left) || truthy(right));
        }
        Some(left)
    }

    fn and(&mut self) -> Option<f64> {
        let mut left = self.comparison()?;
        while self.eat(&["&&"]).is_some() {
            let right = self.comparison()?;
            left = bool_value(truthy(left) && truthy(right));
        }
        Some(left)
    }

    fn comparison(&mut self) -> Option<f64> {
        let left = self.additive()?;
        let Some(op) = self.eat(&["==", "=", "!=", "<", "<=", ">", ">="]) else {
            return Some(left);
        };
        let right = self.additive()?;
        let result = match op {
            "==" | "=" => left == right,
            "!=" => left != right,
            "<" => left < right,
            "<=" => left <= right,
            ">" => left > right,
            _ => left >= right,
        };
        Some(bool_value(result))
    }

    fn additive(&mut self) -> Option<f64> {
        let mut left = self.multiplicative()?;
        while let Some(op) = self.eat(&["+", "-"]) {
            let right = self.multiplicative()?;
            left = if op == "+" { left + right } else { left - right };
        }
        Some(left)
    }

    fn multiplicative(&mut self) -> Option<f64> {
        let mut left = self.unary()?;
        while let Some(op) = self.eat(&["*", "/", "%"]) {
            let right = self.unary()?;
            if op != "*" && right == 0.0 {
                return None;
            }
            left = match op {
                "*" => left * right,
                "/" => left / right,
                _ => left % right,
            };
        }
        Some(left)
    }

    // Every nested parenthesis or prefix operator passes through here.
    fn unary(&mut self) -> Option<f64> {
        if self.depth >= MAX_DEPTH {
            return None;
        }
        self.depth += 1;
        let value = match self.eat(&["-", "!"]) {
            Some("-") => self.unary().map(|v| -v),
            Some(_) => self.unary().map(|v| bool_value(!truthy(v))),
            None => self.primary(),
        };
        self.depth -= 1;
        value
    }

    fn primary(&mut self) -> Option<f64> {
        match *self.tokens.get(self.pos)? {
            Token::Num(n) => {
                self.pos += 1;
                Some(n)
            }
            Token::Open => {
                self.pos += 1;
                let value = self.or()?;
                match self.tokens.get(self.pos) {
                    Some(Token::Close) => {
                        self.pos += 1;
                        Some(value)
                    }
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

    fn eval(s: &str) -> Option<f64> {
        BasicExpressionEngine.evaluate(s)
    }

    #[test]
    fn arithmetic_respects_precedence() {
        assert_eq!(eval("2-1"), Some(1.0));
        assert_eq!(eval("1 + 2 * 3"), Some(7.0));
        assert_eq!(eval("(1 + 2) * 3"), Some(9.0));
        assert_eq!(eval("-4 + 10 % 4"), Some(-2.0));
    }

    #[test]
    fn comparisons_and_logic_yield_one_or_zero() {
        assert_eq!(eval("3 > 2"), Some(1.0));
        assert_eq!(eval("3 <= 2"), Some(0.0));
        assert_eq!(eval("1 = 1 && !(2 != 2)"), Some(1.0));
        assert_eq!(eval("false || 0"), Some(0.0));
        assert_eq!(eval("TRUE"), Some(1.0));
    }

    #[test]
    fn non_expressions_are_none() {
        assert_eq!(eval("not-an-expr"), None);
        assert_eq!(eval("My Shop"), None);
        assert_eq!(eval(""), None);
        assert_eq!(eval("1 +"), None);
        assert_eq!(eval("(1"), None);
        assert_eq!(eval("5 / 0"), None);
    }

    #[test]
    fn deep_nesting_is_rejected_not_overflowed() {
        let nested = format!("{}1{}", "(".repeat(200_000), ")".repeat(200_000));
        assert_eq!(eval(&nested), None);
        assert_eq!(eval(&format!("{}1", "-".repeat(200_000))), None);
        assert_eq!(eval(&format!("{}1", "!".repeat(200_000))), None);

        let shallow = format!("{}1{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(eval(&shallow), Some(1.0));
        assert_eq!(eval("--1"), Some(1.0));
    }
}
