use nom::bytes::complete::{tag, take_while};
use nom::character::complete::{multispace0, satisfy};
use nom::combinator::{not, recognize};
use nom::error::ParseError;
use nom::sequence::{delimited, terminated};
use nom::{IResult, Parser};
use nom_language::error::VerboseError;

pub mod cpp;

pub fn ws<'a, O, E: ParseError<&'a str>, F>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
{
    delimited(multispace0, inner, multispace0)
}

pub(crate) fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

pub fn identifier(i: &str) -> IResult<&str, &str, VerboseError<&str>> {
    recognize((satisfy(is_ident_start), take_while(is_ident_char))).parse(i)
}

/// Matches `word` unless it is only the start of a longer identifier.
pub fn keyword<'a>(
    word: &'static str,
) -> impl Parser<&'a str, Output = &'a str, Error = VerboseError<&'a str>> {
    terminated(tag(word), not(satisfy(is_ident_char)))
}
