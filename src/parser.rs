//! # parser.rs
//!
//! Converts a sequence of lexemes into an [`AstNode`] tree with a
//! shunting-yard parser.
//!
//! Precedence, lowest first: `+ -`, `* /`, unary `+ -`, `^`.
//! `^` is right-associative. Function names must be followed by `(` and take
//! exactly one argument.
//!
//! A value directly followed by a name, a function call or `(` is an implicit
//! product with the precedence of `*`: `2pi`, `3(1+i)`, `2sin(x)`. Two number
//! literals in a row (`2 3`) are an error.
//!
//! Every failure is an [`EvalError::SyntaxError`] whose message names the
//! offending lexeme and its byte range in the normalized input.

use crate::astnode::AstNode;
use crate::error::{EvalError, Result};
use crate::functions::FunctionKind;
use crate::lexer::{self, Lexeme, IMAGINARY_UNIT};
use crate::operators::{BinaryOperatorKind, UnaryOperatorKind, UNARY_PRECEDENCE};

use num_complex::Complex;

macro_rules! lexeme_name_with_range {
    ($lexeme: expr) => {
        format!("{name} at {start}..{end}", name=$lexeme.text(), start=$lexeme.start(), end=$lexeme.end())
    };
}

macro_rules! syntax_error {
    ($($arg:tt)*) => {
        EvalError::SyntaxError(format!($($arg)*))
    };
}

/// Classified lexeme.
#[derive(Debug, Clone, PartialEq)]
enum Token {
    /// Real or imaginary literal.
    Number(Complex<f64>),

    /// Variable or constant name.
    Identifier(String),

    /// `+ - * / ^`; unary or binary is decided by the parser.
    Operator,

    /// Built-in function name.
    Function(FunctionKind),

    LParen,
    RParen,
}

impl Token {
    /// Attempts to parse a string as a real number.
    fn parse_real(s: &str) -> Option<Complex<f64>> {
        s.parse::<f64>().ok().map(|re| Complex::new(re, 0.0))
    }

    /// Attempts to parse a numeric string with a trailing imaginary unit.
    fn parse_imaginary(s: &str) -> Option<Complex<f64>> {
        let num_part = s.strip_suffix(IMAGINARY_UNIT)?;
        num_part.parse::<f64>().ok().map(|im| Complex::new(0.0, im))
    }

    fn is_identifier(s: &str) -> bool {
        let mut chars = s.chars();
        matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_alphanumeric() || c == '_')
    }

    /// Converts a lexeme into a corresponding `Token`.
    ///
    /// Function names that are not in `functions` are rejected.
    fn from(lexeme: &Lexeme, functions: &[FunctionKind]) -> Result<Self> {
        let text = lexeme.text();

        if text.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
            return Self::parse_real(text)
                .or_else(|| Self::parse_imaginary(text))
                .map(Token::Number)
                .ok_or_else(|| syntax_error!("invalid number {}", lexeme_name_with_range!(lexeme)));
        }

        if let Some(kind) = FunctionKind::from(text) {
            return if functions.contains(&kind) {
                Ok(Token::Function(kind))
            } else {
                Err(syntax_error!("disabled function {}", lexeme_name_with_range!(lexeme)))
            };
        }

        if Self::is_identifier(text) {
            return Ok(Token::Identifier(text.to_string()));
        }

        if UnaryOperatorKind::from(text).is_some() || BinaryOperatorKind::from(text).is_some() {
            return Ok(Token::Operator);
        }

        match text {
            "(" => Ok(Token::LParen),
            ")" => Ok(Token::RParen),
            "," => Err(syntax_error!("functions take a single argument, unexpected {}", lexeme_name_with_range!(lexeme))),
            _ => Err(syntax_error!("unknown character {}", lexeme_name_with_range!(lexeme))),
        }
    }
}

/// Entry on the operator stack.
#[derive(Debug, Clone)]
enum Pending {
    UnaryOperator(UnaryOperatorKind),
    BinaryOperator(BinaryOperatorKind),
    Function(FunctionKind),
    LParen(Lexeme),
}

impl Pending {
    /// Precedence used to decide whether a new binary operator pops this entry.
    fn precedence(&self) -> Option<u8> {
        match self {
            Self::UnaryOperator(_) => Some(UNARY_PRECEDENCE),
            Self::BinaryOperator(kind) => Some(kind.info().precedence),
            Self::Function(_) | Self::LParen(_) => None,
        }
    }
}

/// Normalizes display glyphs, splits `input` into lexemes and parses them.
///
/// # Examples
///
/// ```
/// use complexcalc::functions::FunctionKind;
/// use complexcalc::parser::parse;
///
/// let ast = parse("2 × (x + 1)", FunctionKind::ALL).unwrap();
/// assert_eq!(ast.to_string(), "2 * (x + 1)");
/// ```
pub fn parse(input: &str, functions: &[FunctionKind]) -> Result<AstNode> {
    let normalized = lexer::normalize(input);
    let lexemes = lexer::from(&normalized);
    AstNode::from(&lexemes, functions)
}

/// AstNode impl `from` and its helper impls
impl AstNode {
    /// Parses a slice of lexemes into an AST node.
    ///
    /// # Parameters
    /// - `lexemes`: Slice of lexemes representing the expression.
    /// - `functions`: Built-in functions the expression may call.
    ///
    /// # Returns
    /// - `Ok(AstNode)` representing the root of the parsed AST.
    /// - `Err(EvalError::SyntaxError)` on unbalanced parentheses, missing
    ///   operands, unknown names, or input left over after a complete expression.
    pub fn from(lexemes: &[Lexeme], functions: &[FunctionKind]) -> Result<Self> {
        if lexemes.is_empty() {
            return Err(syntax_error!("empty expression"));
        }

        let mut ast_nodes: Vec<Self> = Vec::new();
        let mut token_stack: Vec<Pending> = Vec::new();
        // whether the previous token finished a value; decides unary vs binary operators
        let mut prev_is_value = false;
        let mut lexemes = lexemes.iter().peekable();

        while let Some(lexeme) = lexemes.next() {
            let token = Token::from(lexeme, functions)?;
            let next_is_lparen = lexemes.peek().is_some_and(|l| l.text() == "(");

            if prev_is_value {
                match &token {
                    Token::Number(_) => {
                        return Err(syntax_error!("unexpected {}", lexeme_name_with_range!(lexeme)));
                    },
                    Token::Identifier(_) | Token::Function(_) | Token::LParen => {
                        // implicit product; ex) 2pi, 3(1+i), 2sin(x)
                        Self::push_binary_operator(&mut ast_nodes, &mut token_stack, BinaryOperatorKind::Mul)?;
                        prev_is_value = false;
                    },
                    Token::Operator | Token::RParen => {},
                }
            }

            match token {
                Token::Number(val) => {
                    ast_nodes.push(Self::Number(val));
                    prev_is_value = true;
                },
                Token::Identifier(_) if next_is_lparen => {
                    return Err(syntax_error!("unknown function {}", lexeme_name_with_range!(lexeme)));
                },
                Token::Identifier(name) => {
                    ast_nodes.push(Self::Identifier(name));
                    prev_is_value = true;
                },
                Token::Operator => {
                    match prev_is_value {
                        true => Self::parse_in_binary_operator(&mut ast_nodes, &mut token_stack, lexeme)?,
                        false => Self::parse_in_unary_operator(&mut token_stack, lexeme)?,
                    };
                    prev_is_value = false;
                },
                Token::Function(kind) => {
                    if !next_is_lparen {
                        return Err(syntax_error!("expected ( after {}", lexeme_name_with_range!(lexeme)));
                    }
                    token_stack.push(Pending::Function(kind));
                    prev_is_value = false;
                },
                Token::LParen => {
                    token_stack.push(Pending::LParen(lexeme.clone()));
                    prev_is_value = false; // an operator right after `(` is unary; ex) cos(-x)
                },
                Token::RParen => {
                    if !prev_is_value {
                        return Err(syntax_error!("missing operand before {}", lexeme_name_with_range!(lexeme)));
                    }
                    Self::parse_in_right_paren(&mut ast_nodes, &mut token_stack, lexeme)?;
                    prev_is_value = true; // an operator right after `)` is binary; ex) (x+2)/(x-3)
                },
            }
        }

        if !prev_is_value {
            return Err(syntax_error!("missing operand at end of input"));
        }

        while let Some(pending) = token_stack.pop() {
            match pending {
                Pending::LParen(lexeme) => {
                    return Err(syntax_error!("missing ) for {}", lexeme_name_with_range!(lexeme)));
                },
                other => Self::reduce(&mut ast_nodes, other)?,
            }
        }

        let ret = ast_nodes.pop()
            .ok_or_else(|| syntax_error!("no expression"))?;

        if !ast_nodes.is_empty() {
            return Err(syntax_error!("unconsumed input after {}", ret));
        }
        Ok(ret)
    }

    /// Pops tokens until the matching `(`, then closes a pending function call.
    fn parse_in_right_paren(
        ast_nodes: &mut Vec<Self>,
        token_stack: &mut Vec<Pending>,
        lexeme: &Lexeme,
    ) -> Result<()> {
        loop {
            match token_stack.pop() {
                Some(Pending::LParen(_)) => break,
                Some(other) => Self::reduce(ast_nodes, other)?,
                None => return Err(syntax_error!("unmatched {}", lexeme_name_with_range!(lexeme))),
            }
        }

        // ex) `sin(x + 2)`: after `(x + 2)` the call itself is reduced
        if let Some(Pending::Function(kind)) = token_stack.last().cloned() {
            token_stack.pop();
            Self::reduce(ast_nodes, Pending::Function(kind))?;
        }

        Ok(())
    }

    /// Pushes a prefix operator; `*`, `/` and `^` have no unary form.
    fn parse_in_unary_operator(
        token_stack: &mut Vec<Pending>,
        lexeme: &Lexeme,
    ) -> Result<()> {
        match UnaryOperatorKind::from(lexeme.text()) {
            Some(kind) => {
                token_stack.push(Pending::UnaryOperator(kind));
                Ok(())
            },
            None => Err(syntax_error!("missing operand before {}", lexeme_name_with_range!(lexeme))),
        }
    }

    /// Resolves operator precedence and pushes a binary operator onto the stack.
    ///
    /// Left-associative operators pop entries of equal or higher precedence,
    /// right-associative ones only strictly higher. Pending unary operators
    /// take part with [`UNARY_PRECEDENCE`].
    fn parse_in_binary_operator(
        ast_nodes: &mut Vec<Self>,
        token_stack: &mut Vec<Pending>,
        lexeme: &Lexeme,
    ) -> Result<()> {
        let oper_kind = BinaryOperatorKind::from(lexeme.text())
            .ok_or_else(|| syntax_error!("unknown binary operator {}", lexeme_name_with_range!(lexeme)))?;
        Self::push_binary_operator(ast_nodes, token_stack, oper_kind)
    }

    /// Pops entries that bind at least as tightly as `oper_kind`, then pushes it.
    fn push_binary_operator(
        ast_nodes: &mut Vec<Self>,
        token_stack: &mut Vec<Pending>,
        oper_kind: BinaryOperatorKind,
    ) -> Result<()> {
        let oper_info = oper_kind.info();

        while let Some(top_prec) = token_stack.last().and_then(Pending::precedence) {
            let pops = if oper_info.is_left_assoc {
                top_prec >= oper_info.precedence
            } else {
                top_prec > oper_info.precedence
            };
            if !pops {
                break;
            }
            if let Some(top) = token_stack.pop() {
                Self::reduce(ast_nodes, top)?;
            }
        }
        token_stack.push(Pending::BinaryOperator(oper_kind));
        Ok(())
    }

    /// Builds a node for `pending` from the operands on top of `stack`.
    fn reduce(stack: &mut Vec<Self>, pending: Pending) -> Result<()> {
        match pending {
            Pending::UnaryOperator(kind) => {
                let expr = stack.pop()
                    .ok_or_else(|| syntax_error!("missing operand for unary {}", kind))?;
                stack.push(Self::UnaryOperator { kind, expr: Box::new(expr) });
            },
            Pending::BinaryOperator(kind) => {
                let right = stack.pop()
                    .ok_or_else(|| syntax_error!("missing right operand for {}", kind))?;
                let left = stack.pop()
                    .ok_or_else(|| syntax_error!("missing left operand for {}", kind))?;
                stack.push(Self::BinaryOperator { kind, left: Box::new(left), right: Box::new(right) });
            },
            Pending::Function(kind) => {
                let arg = stack.pop()
                    .ok_or_else(|| syntax_error!("missing argument for {}", kind))?;
                stack.push(arg.call(kind));
            },
            Pending::LParen(lexeme) => {
                return Err(syntax_error!("missing ) for {}", lexeme_name_with_range!(lexeme)));
            },
        }
        Ok(())
    }
}
