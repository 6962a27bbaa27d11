//! Calculator tool
//!
//! Evaluates arithmetic over numbers, `+ - * /` and parentheses with a small
//! recursive-descent parser. Anything outside that grammar is rejected; the
//! input never reaches a general-purpose evaluator.

use async_trait::async_trait;

use crate::tools::tool::{Tool, ToolError};

/// Restricted arithmetic calculator
#[derive(Debug, Clone, Copy, Default)]
pub struct Calculator;

#[async_trait]
impl Tool for Calculator {
    fn name(&self) -> &str {
        "Calculator"
    }

    fn description(&self) -> &str {
        "Useful for answering math questions. Input should be a valid mathematical expression string."
    }

    async fn run(&self, input: &str) -> Result<String, ToolError> {
        let value = evaluate(input)?;
        Ok(format_number(value))
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

fn tokenize(input: &str) -> Result<Vec<Token>, ToolError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(pos, c)) = chars.peek() {
        let token = match c {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '0'..='9' | '.' => {
                let mut end = pos;
                while let Some(&(i, d)) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        end = i + d.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let literal = &input[pos..end];
                let value = literal.parse::<f64>().map_err(|_| {
                    ToolError::InvalidInput(format!("invalid number '{}'", literal))
                })?;
                tokens.push(Token::Number(value));
                continue;
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            other => {
                return Err(ToolError::InvalidInput(format!(
                    "unexpected character '{}' at position {}",
                    other, pos
                )))
            }
        };
        tokens.push(token);
        chars.next();
    }

    Ok(tokens)
}

/// Deepest parenthesis nesting accepted before the input is rejected.
const MAX_DEPTH: usize = 256;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.peek();
        self.pos += 1;
        token
    }

    fn expr(&mut self) -> Result<f64, ToolError> {
        let mut value = self.term()?;
        while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = if op == Token::Plus {
                value + rhs
            } else {
                value - rhs
            };
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, ToolError> {
        let mut value = self.unary()?;
        while let Some(op @ (Token::Star | Token::Slash)) = self.peek() {
            self.pos += 1;
            let rhs = self.unary()?;
            if op == Token::Star {
                value *= rhs;
            } else {
                if rhs == 0.0 {
                    return Err(ToolError::ExecutionFailed("division by zero".to_string()));
                }
                value /= rhs;
            }
        }
        Ok(value)
    }

    fn unary(&mut self) -> Result<f64, ToolError> {
        let mut negate = false;
        while let Some(sign @ (Token::Plus | Token::Minus)) = self.peek() {
            self.pos += 1;
            if sign == Token::Minus {
                negate = !negate;
            }
        }
        let value = self.atom()?;
        Ok(if negate { -value } else { value })
    }

    fn atom(&mut self) -> Result<f64, ToolError> {
        match self.next() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::LParen) => {
                if self.depth >= MAX_DEPTH {
                    return Err(ToolError::InvalidInput(
                        "expression nested too deeply".to_string(),
                    ));
                }
                self.depth += 1;
                let value = self.expr()?;
                self.depth -= 1;
                match self.next() {
                    Some(Token::RParen) => Ok(value),
                    _ => Err(ToolError::InvalidInput("expected ')'".to_string())),
                }
            }
            Some(other) => Err(ToolError::InvalidInput(format!(
                "unexpected token {:?}",
                other
            ))),
            None => Err(ToolError::InvalidInput(
                "unexpected end of expression".to_string(),
            )),
        }
    }
}

/// Evaluate an arithmetic expression
pub fn evaluate(input: &str) -> Result<f64, ToolError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ToolError::InvalidInput("empty expression".to_string()));
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;

    if let Some(extra) = parser.peek() {
        return Err(ToolError::InvalidInput(format!(
            "unexpected trailing token {:?}",
            extra
        )));
    }
    if !value.is_finite() {
        return Err(ToolError::ExecutionFailed("result is not finite".to_string()));
    }

    Ok(value)
}

/// Render integral values without a fractional part
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
