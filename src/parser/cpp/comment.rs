use crate::parser::cpp::lexer::{char_literal, string_literal};
use nom::branch::alt;
use nom::bytes::complete::{tag, take_until};
use nom::character::complete::not_line_ending;
use nom::combinator::recognize;
use nom::sequence::preceded;
use nom::{IResult, Parser};
use nom_language::error::VerboseError;

/// Parses comments that start with // or ///, up to the line ending.
pub fn parse_line_comment(input: &str) -> IResult<&str, &str, VerboseError<&str>> {
    recognize(preceded(tag("//"), not_line_ending)).parse(input)
}

pub fn parse_block_comment(input: &str) -> IResult<&str, &str, VerboseError<&str>> {
    recognize((tag("/*"), take_until("*/"), tag("*/"))).parse(input)
}

/// Removes `//` and `/* */` comments, leaving string and character literals alone.
///
/// A block comment is replaced by a single space so that the tokens around
/// it stay apart; running this twice yields the same text as running it once.
pub fn strip_comments(input: &str) -> String {
    let mut stripped = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(c) = rest.chars().next() {
        if let Ok((i, _)) = parse_line_comment(rest) {
            rest = i;
            continue;
        }

        if let Ok((i, _)) = parse_block_comment(rest) {
            stripped.push(' ');
            rest = i;
            continue;
        }

        if let Ok((i, literal)) = alt((string_literal, char_literal)).parse(rest) {
            stripped.push_str(literal);
            rest = i;
            continue;
        }

        stripped.push(c);
        rest = &rest[c.len_utf8()..];
    }

    stripped
}
