use nom::IResult;
use nom_language::error::VerboseError;

/// Implemented by the pieces of C++ source that can be parsed from text on their own.
pub trait Parsable<'a>: Sized {
    fn parse(input: &'a str) -> IResult<&'a str, Self, VerboseError<&'a str>>;
}
