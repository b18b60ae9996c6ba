//! a module turns a String expression into a symbolic expression
//!
//! Parsing happens in two passes: a nom lexer cuts the text into tokens, then a recursive
//! descent parser builds the `Expr` tree with the usual precedence
//!
//! ```text
//!                  precedence ladder
//!                |  sum      | + -  (left assoc)  |
//!                |  product  | * /  (left assoc)  |
//!                |  unary    | leading + -        |
//!                |  power    | ^    (right assoc) |
//!                |  primary  | number, variable,  |
//!                |           | ( sum )            |
//! ```
//!
//! The lexer is shared with the text normalizer, which renders token streams back into
//! canonical text with `render_tokens`.
use crate::symbolic::symbolic_engine::{Expr, Symbol, format_number};
use nom::{
    IResult, Parser,
    branch::alt,
    character::complete::{alpha1, char, digit1, multispace0, one_of},
    combinator::{map, map_res, opt, recognize},
    sequence::{pair, preceded},
};
use std::fmt;
/// lexical unit of a math string
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    /// lowercased run of ASCII letters, single letters are variables
    Word(String),
    /// one of + - * / ^ =
    Op(char),
    LParen,
    RParen,
    /// "and", "&", ";" or "," between equations
    Conjunction,
}

impl Token {
    pub fn is_variable(&self) -> bool {
        matches!(self, Token::Word(w) if w.len() == 1)
    }

    /// a word of two or more letters, i.e. not a variable
    pub fn is_long_word(&self) -> bool {
        matches!(self, Token::Word(w) if w.len() > 1)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Number(value) => write!(f, "{}", format_number(*value)),
            Token::Word(word) => write!(f, "{}", word),
            Token::Op(op) => write!(f, "{}", op),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Conjunction => write!(f, "and"),
        }
    }
}

//___________________________________LEXER____________________________________

fn parse_number(input: &str) -> IResult<&str, Token> {
    let digits = recognize(pair(digit1, opt(pair(char('.'), digit1))));
    let mut parser = map_res(digits, |s: &str| s.parse::<f64>().map(Token::Number));
    parser.parse(input)
}

fn parse_word(input: &str) -> IResult<&str, Token> {
    let mut parser = map(alpha1, |s: &str| {
        let word = s.to_lowercase();
        if word == "and" {
            Token::Conjunction
        } else {
            Token::Word(word)
        }
    });
    parser.parse(input)
}

fn parse_punctuation(input: &str) -> IResult<&str, Token> {
    let mut parser = map(one_of("+-*/^=()&;,"), |c| match c {
        '(' => Token::LParen,
        ')' => Token::RParen,
        '&' | ';' | ',' => Token::Conjunction,
        op => Token::Op(op),
    });
    parser.parse(input)
}

fn parse_token(input: &str) -> IResult<&str, Token> {
    preceded(multispace0, alt((parse_number, parse_word, parse_punctuation))).parse(input)
}

/// Cuts `input` into tokens. Fails on the first character no token starts with.
pub fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut rest = input;
    loop {
        let trimmed = rest.trim_start();
        if trimmed.is_empty() {
            break;
        }
        match parse_token(trimmed) {
            Ok((remaining, token)) => {
                tokens.push(token);
                rest = remaining;
            }
            Err(_) => {
                let offending = trimmed.chars().next().unwrap_or(' ');
                return Err(format!(
                    "unexpected character '{}' in '{}'",
                    offending, input
                ));
            }
        }
    }
    Ok(tokens)
}

/// Makes juxtaposition explicit: `2x`, `x2`, `2(x+1)`, `(x+1)(x-1)`, `x(x+1)` and `xy` get a
/// `*` between the two operands.
pub fn insert_implicit_multiplication(tokens: Vec<Token>) -> Vec<Token> {
    let mut result: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens {
        if let Some(prev) = result.last() {
            let prev_operand =
                matches!(prev, Token::Number(_) | Token::RParen) || prev.is_variable();
            let implicit = (prev_operand && (token.is_variable() || token == Token::LParen))
                || ((prev.is_variable() || *prev == Token::RParen)
                    && matches!(token, Token::Number(_)));
            if implicit {
                result.push(Token::Op('*'));
            }
        }
        result.push(token);
    }
    result
}

/// Renders tokens as canonical text: binary operators spaced (`2 * x + 5 = 13`), powers,
/// brackets and signs glued to their operands (`-(x + 1)^2`).
pub fn render_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    let mut prev: Option<&Token> = None;
    let mut prev_unary = false;
    for token in tokens {
        let unary = matches!(token, Token::Op('+') | Token::Op('-'))
            && matches!(
                prev,
                None | Some(Token::Op(_)) | Some(Token::LParen) | Some(Token::Conjunction)
            );
        let binary = matches!(token, Token::Op(c) if *c != '^') && !unary;
        let prev_binary = matches!(prev, Some(Token::Op(c)) if *c != '^') && !prev_unary;
        let space = match (prev, token) {
            (None, _) => false,
            (_, Token::Conjunction) | (Some(Token::Conjunction), _) => true,
            _ if binary || prev_binary => true,
            (Some(Token::Op(_)), _) | (_, Token::Op(_)) => false,
            (Some(Token::LParen), _) | (_, Token::RParen) | (_, Token::LParen) => false,
            _ => true,
        };
        if space {
            out.push(' ');
        }
        out.push_str(&token.to_string());
        prev = Some(token);
        prev_unary = unary;
    }
    out
}

//___________________________________PARSER____________________________________

struct ExprParser {
    tokens: Vec<Token>,
    pos: usize,
}

impl ExprParser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn parse_sum(&mut self) -> Result<Expr, String> {
        let mut lhs = self.parse_product()?;
        loop {
            match self.peek() {
                Some(Token::Op('+')) => {
                    self.pos += 1;
                    lhs = lhs + self.parse_product()?;
                }
                Some(Token::Op('-')) => {
                    self.pos += 1;
                    lhs = lhs - self.parse_product()?;
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn parse_product(&mut self) -> Result<Expr, String> {
        let mut lhs = self.parse_unary()?;
        loop {
            match self.peek() {
                Some(Token::Op('*')) => {
                    self.pos += 1;
                    lhs = lhs * self.parse_unary()?;
                }
                Some(Token::Op('/')) => {
                    self.pos += 1;
                    lhs = lhs / self.parse_unary()?;
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, String> {
        match self.peek() {
            Some(Token::Op('-')) => {
                self.pos += 1;
                match self.parse_unary()? {
                    Expr::Const(value) => Ok(Expr::Const(-value)),
                    operand => Ok(-operand),
                }
            }
            Some(Token::Op('+')) => {
                self.pos += 1;
                self.parse_unary()
            }
            _ => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> Result<Expr, String> {
        let base = self.parse_primary()?;
        if self.peek() == Some(&Token::Op('^')) {
            self.pos += 1;
            let exponent = self.parse_unary()?;
            return Ok(base.pow(exponent));
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Expr, String> {
        match self.next() {
            Some(Token::Number(value)) => Ok(Expr::Const(value)),
            Some(Token::Word(word)) if word.len() == 1 => Ok(Expr::Var(Symbol::new(&word))),
            Some(Token::Word(word)) => Err(format!("unknown word '{}'", word)),
            Some(Token::LParen) => {
                let inner = self.parse_sum()?;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err("unbalanced brackets".to_string()),
                }
            }
            Some(token) => Err(format!("unexpected token '{}'", token)),
            None => Err("unexpected end of expression".to_string()),
        }
    }
}

/// Parses a single expression (no `=`, no conjunctions) into an `Expr`.
pub fn parse_expression_func(input: &str) -> Result<Expr, String> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err("empty expression".to_string());
    }
    let mut parser = ExprParser {
        tokens: insert_implicit_multiplication(tokens),
        pos: 0,
    };
    let expr = parser.parse_sum().map_err(|e| format!("{} in '{}'", e, input.trim()))?;
    if let Some(token) = parser.peek() {
        return Err(format!("unexpected token '{}' in '{}'", token, input.trim()));
    }
    Ok(expr)
}
