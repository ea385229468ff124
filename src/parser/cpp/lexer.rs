use crate::parser::cpp::comment::{parse_block_comment, parse_line_comment};
use crate::parser::identifier;
use nom::branch::alt;
use nom::bytes::complete::{tag, take_while};
use nom::character::complete::{anychar, char, digit1, multispace1, none_of};
use nom::combinator::{map, recognize};
use nom::multi::many0;
use nom::sequence::preceded;
use nom::{IResult, Offset, Parser};
use nom_language::error::VerboseError;

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum TokenKind {
    Ident,
    Number,
    Literal,
    Punct,
}

/// A slice of the tokenized text together with its byte offset in it.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub offset: usize,
}

impl Token<'_> {
    pub fn is(&self, text: &str) -> bool {
        self.text == text
    }

    pub fn is_ident(&self) -> bool {
        self.kind == TokenKind::Ident
    }

    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }
}

// Longest first.
const PUNCTUATORS: [&str; 26] = [
    "<=>", "<<=", ">>=", "...", "->*", "::", "->", ".*", "&&", "||", "++", "--", "<<", ">>",
    "<=", ">=", "==", "!=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=",
];

fn skip_trivia(input: &str) -> IResult<&str, (), VerboseError<&str>> {
    map(
        many0(alt((multispace1, parse_line_comment, parse_block_comment))),
        |_| (),
    )
    .parse(input)
}

fn number(input: &str) -> IResult<&str, &str, VerboseError<&str>> {
    recognize((
        digit1,
        take_while(|c: char| c.is_alphanumeric() || c == '.' || c == '\'' || c == '_'),
    ))
    .parse(input)
}

pub(crate) fn string_literal(input: &str) -> IResult<&str, &str, VerboseError<&str>> {
    recognize((
        char('"'),
        many0(alt((preceded(char('\\'), anychar), none_of("\\\"\n")))),
        char('"'),
    ))
    .parse(input)
}

pub(crate) fn char_literal(input: &str) -> IResult<&str, &str, VerboseError<&str>> {
    recognize((
        char('\''),
        many0(alt((preceded(char('\\'), anychar), none_of("\\'\n")))),
        char('\''),
    ))
    .parse(input)
}

fn punctuator(input: &str) -> IResult<&str, &str, VerboseError<&str>> {
    for op in PUNCTUATORS {
        if let Ok(parsed) = tag::<_, _, VerboseError<&str>>(op).parse(input) {
            return Ok(parsed);
        }
    }

    recognize(anychar).parse(input)
}

fn token(input: &str) -> IResult<&str, (TokenKind, &str), VerboseError<&str>> {
    alt((
        map(identifier, |t| (TokenKind::Ident, t)),
        map(number, |t| (TokenKind::Number, t)),
        map(alt((string_literal, char_literal)), |t| (TokenKind::Literal, t)),
        map(punctuator, |t| (TokenKind::Punct, t)),
    ))
    .parse(input)
}

/// Splits C++ text into tokens, dropping whitespace and comments.
///
/// Never fails: a character that starts no other token becomes a
/// one-character punctuation token.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = input;

    loop {
        if let Ok((i, _)) = skip_trivia(rest) {
            rest = i;
        }

        match token(rest) {
            Ok((i, (kind, text))) => {
                tokens.push(Token {
                    kind,
                    text,
                    offset: input.offset(text),
                });
                rest = i;
            }
            Err(_) => return tokens,
        }
    }
}

/// Index of the token closing the bracket opened at `open`.
pub fn matching_close(tokens: &[Token], open: usize) -> Option<usize> {
    let (opening, closing) = match tokens.get(open)?.text {
        "(" => ("(", ")"),
        "[" => ("[", "]"),
        "{" => ("{", "}"),
        _ => return None,
    };

    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        if token.is(opening) {
            depth += 1;
        } else if token.is(closing) {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }

    None
}
