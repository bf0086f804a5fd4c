//! lexer.rs
//!
//! This module provides a simple lexical analyzer (lexer) for calculator input.
//! It splits an input string into a sequence of `Lexeme`s, each representing a
//! continuous piece of text with its corresponding position in the string.
//!
//! Before splitting, display glyphs produced by calculator keypads are
//! normalized to their canonical spelling by [`normalize`]. This is a pure text
//! substitution and is not part of the grammar.
//!
//! The lexer handles identifiers, numeric literals (including decimal, scientific
//! notation, and imaginary literals such as `2i`), and single-character operators
//! or punctuation.

use phf::Map;
use phf_macros::phf_map;
use std::ops::Range;

/// Constant char representing an imaginary unit
pub const IMAGINARY_UNIT: char = 'i';

/// Display glyph used by keypads for the modulus function.
const MODULUS_GLYPH: &str = "|z|";

/// Map of single-character display glyphs to their canonical text.
static GLYPHS: Map<char, &'static str> = phf_map! {
    '×' => "*",
    '÷' => "/",
    'π' => "pi",
    '√' => "sqrt",
};

/// Replaces display glyphs (`× ÷ π √ |z|`) with `* / pi sqrt abs`.
///
/// # Examples
///
/// ```
/// use complexcalc::lexer::normalize;
///
/// assert_eq!(normalize("2×π÷|z|(3+4i)"), "2*pi/abs(3+4i)");
/// ```
pub fn normalize(input: &str) -> String {
    let input = input.replace(MODULUS_GLYPH, "abs");
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match GLYPHS.get(&ch) {
            Some(text) => out.push_str(text),
            None => out.push(ch),
        }
    }
    out
}

/// Represents a single lexeme extracted from the input string.
///
/// A `Lexeme` stores a text slice and its span (start..end byte indices) within
/// the normalized input string.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    text: String,
    span: Range<usize>,
}

impl Lexeme {
    /// Create a new `Lexeme`.
    ///
    /// # Argument
    ///
    /// * `text` - The slice of text corresponding to the lexeme.
    /// * `span` - The range of the lexeme in the original input string.
    pub fn new(text: &str, span: Range<usize>) -> Self {
        Self {
            text: text.to_string(),
            span
        }
    }

    /// Returns the text slice of the lexeme.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the start index of the lexeme in the input string.
    pub fn start(&self) -> usize {
        self.span.start
    }

    /// Returns the end index of the lexeme in the input string.
    pub fn end(&self) -> usize {
        self.span.end
    }

    /// Returns the span of the lexeme in the input string.
    pub fn span(&self) -> &Range<usize> {
        &self.span
    }
}

impl std::fmt::Display for Lexeme
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{name} at {start}..{end}", name=self.text, start=self.span.start, end=self.span.end)
    }
}

/// Type alias for a collection of lexemes.
pub type Lexemes = Vec<Lexeme>;

type CharIter<'a> = std::iter::Peekable<std::str::CharIndices<'a>>;

/// Parses an identifier starting at `start_idx`.
///
/// An identifier is a sequence of alphanumeric characters or underscores.
///
/// # Returns
///
/// The ending index of the identifier.
fn parse_ident(start_idx: usize, chars: &mut CharIter) -> usize
{
    let mut end = start_idx + 1;
    while let Some(&(idx, ch)) = chars.peek() {
        if ch.is_alphanumeric() || ch == '_' {
            chars.next();
            end = idx + ch.len_utf8();
        } else {
            break;
        }
    }

    end
}

/// Returns true if the characters after an `e` form an exponent (`e5`, `e-3`, `E+2`).
fn exponent_follows(chars: &CharIter) -> bool
{
    let mut ahead = chars.clone();
    ahead.next(); // the `e` itself
    match ahead.next() {
        Some((_, d)) if d.is_ascii_digit() => true,
        Some((_, '+' | '-')) => matches!(ahead.next(), Some((_, d)) if d.is_ascii_digit()),
        _ => false,
    }
}

/// Parses a numeric literal starting at `start_idx`.
///
/// Supports integers, decimals, scientific notation, and a trailing imaginary
/// unit. An `e` is only taken as an exponent marker when digits follow it, so
/// `2e` stays a number followed by the constant `e`.
///
/// # Returns
///
/// The ending index of the numeric literal.
fn parse_number(start_idx: usize, chars: &mut CharIter) -> usize
{
    let mut end = start_idx + 1;
    let mut seen_e = false;

    while let Some(&(idx, ch)) = chars.peek() {
        match ch {
            d if d.is_ascii_digit() || (d == '.' && !seen_e) => {
                chars.next();
                end = idx + 1;
            },
            'e' | 'E' if !seen_e && exponent_follows(chars) => {
                seen_e = true;
                chars.next();
                end = idx + 1;
                if let Some(&(sign_idx, '+' | '-')) = chars.peek() {
                    chars.next();
                    end = sign_idx + 1;
                }
            },
            IMAGINARY_UNIT => {
                // imaginary unit means the end of number token
                chars.next();
                end = idx + ch.len_utf8();
                break;
            },
            _ => break,
        }
    }

    end
}

/// Splits the input string into a sequence of `Lexeme`s.
///
/// The input is expected to be normalized already (see [`normalize`]).
///
/// # Returns
///
/// A vector of lexemes representing identifiers, numbers, and single-character tokens.
pub fn from(input: &str) -> Lexemes {
    let mut lexemes = Lexemes::default();
    let mut chars = input.char_indices().peekable();

    while let Some((start_idx, ch)) = chars.next() {
        if ch.is_whitespace() {
            continue;
        }

        let end_idx = match ch {
            '0'..='9' | '.' => parse_number(start_idx, &mut chars),
            'a'..='z' | 'A'..='Z' | '_' => parse_ident(start_idx, &mut chars),
            _ => start_idx + ch.len_utf8(),
        };

        lexemes.push(Lexeme::new(&input[start_idx..end_idx], start_idx..end_idx));
    }

    lexemes
}
