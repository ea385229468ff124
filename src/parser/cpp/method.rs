use crate::parser::cpp::lexer::{Token, matching_close, tokenize};
use crate::parser::{is_ident_char, keyword, ws};
use crate::types::Parsable;
use nom::branch::alt;
use nom::bytes::complete::{is_not, tag};
use nom::character::complete::{char, multispace0};
use nom::combinator::{eof, map, opt, recognize};
use nom::error::{ContextError, ErrorKind, ParseError};
use nom::multi::many0;
use nom::sequence::{delimited, preceded, terminated};
use nom::{IResult, Parser};
use nom_language::error::VerboseError;

/// Specifiers that belong to the in-class declaration only and are left out
/// of an out-of-line definition.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum FunctionSpecifier {
    Virtual,
    Static,
    Explicit,
    Inline,
    Override,
    Final,
}

impl FunctionSpecifier {
    fn from_prefix_keyword(word: &str) -> Option<Self> {
        match word {
            "virtual" => Some(FunctionSpecifier::Virtual),
            "static" => Some(FunctionSpecifier::Static),
            "explicit" => Some(FunctionSpecifier::Explicit),
            "inline" => Some(FunctionSpecifier::Inline),
            _ => None,
        }
    }
}

#[derive(Debug, Eq, PartialEq, Clone)]
pub struct CppMethodParam<'a> {
    /// Parameter declaration without its default argument.
    pub text: &'a str,
    pub name: Option<&'a str>,
}

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum MemberKind {
    Constructor,
    Destructor,
    Assignment,
    Conversion,
    Method,
}

/// A member function declaration split into its parts.
#[derive(Debug, Eq, PartialEq, Clone, Default)]
pub struct Declarator<'a> {
    /// Return type and remaining specifiers in front of the name.
    pub prefix: &'a str,
    pub name: String,
    pub params: Vec<CppMethodParam<'a>>,
    /// Qualifiers after the parameter list (`const`, `&&`, `noexcept`, `-> T`).
    pub suffix: Vec<&'a str>,
    pub specifiers: Vec<FunctionSpecifier>,
}

impl Declarator<'_> {
    pub fn kind(&self, class_name: &str) -> MemberKind {
        if self.name == class_name {
            return MemberKind::Constructor;
        }

        if self.name.strip_prefix('~') == Some(class_name) {
            return MemberKind::Destructor;
        }

        if self.name.starts_with("operator=") {
            return MemberKind::Assignment;
        }

        match self.name.strip_prefix("operator ") {
            Some(target) => {
                let word = target.split(|c: char| !is_ident_char(c)).next();
                match word {
                    Some("new" | "delete" | "co_await") => MemberKind::Method,
                    _ => MemberKind::Conversion,
                }
            }
            None => MemberKind::Method,
        }
    }
}

impl<'a> Parsable<'a> for Declarator<'a> {
    fn parse(input: &'a str) -> IResult<&'a str, Self, VerboseError<&'a str>> {
        parse_declarator(input)
    }
}

// Words that take a parenthesized argument inside a return type.
const TYPE_OPERATORS: [&str; 7] = [
    "decltype",
    "sizeof",
    "alignof",
    "alignas",
    "noexcept",
    "__attribute__",
    "__declspec",
];

const FUNDAMENTAL_TYPES: [&str; 16] = [
    "void", "bool", "char", "wchar_t", "char8_t", "char16_t", "char32_t", "short", "int", "long",
    "float", "double", "signed", "unsigned", "auto", "const",
];

const NOT_A_NAME: [&str; 10] = [
    "volatile", "return", "throw", "new", "delete", "if", "while", "for", "switch", "typename",
];

fn can_name_member(word: &str) -> bool {
    !FUNDAMENTAL_TYPES.contains(&word) && !NOT_A_NAME.contains(&word)
}

fn reject<'a>(input: &'a str, context: &'static str) -> nom::Err<VerboseError<&'a str>> {
    nom::Err::Error(VerboseError::add_context(
        input,
        context,
        VerboseError::from_error_kind(input, ErrorKind::Verify),
    ))
}

/// `operator` names run up to their parameter list; `operator()` owns one pair of parens.
fn locate_operator(tokens: &[Token], at: usize) -> Option<(usize, usize, usize)> {
    let mut end = at + 1;
    if tokens.get(end)?.is("(") && tokens.get(end + 1)?.is(")") {
        end += 2;
    }

    while !tokens.get(end)?.is("(") {
        end += 1;
    }

    (end > at + 1).then_some((at, end, end))
}

/// Token range of the member name and the index of the `(` opening its parameters.
fn locate_name(tokens: &[Token]) -> Option<(usize, usize, usize)> {
    let mut angle = 0usize;
    let mut i = 0;

    while let Some(token) = tokens.get(i) {
        match token.text {
            "<" => angle += 1,
            ">" => angle = angle.saturating_sub(1),
            ">>" => angle = angle.saturating_sub(2),
            "operator" if angle == 0 => return locate_operator(tokens, i),
            "(" if angle == 0 => {
                let name = tokens.get(i.checked_sub(1)?)?;
                if TYPE_OPERATORS.contains(&name.text) {
                    i = matching_close(tokens, i)? + 1;
                    continue;
                }

                if !name.is_ident() || !can_name_member(name.text) {
                    return None;
                }

                let start = if i >= 2 && tokens[i - 2].is("~") { i - 2 } else { i - 1 };
                return Some((start, i, i));
            }
            _ => {}
        }
        i += 1;
    }

    None
}

fn member_name(tokens: &[Token]) -> String {
    let mut name = String::new();
    for token in tokens {
        if token.is_ident() && !name.is_empty() && name != "~" {
            name.push(' ');
        }
        name.push_str(token.text);
    }

    name
}

fn span<'a>(input: &'a str, tokens: &[Token<'a>]) -> &'a str {
    match (tokens.first(), tokens.last()) {
        (Some(first), Some(last)) => &input[first.offset..last.end()],
        _ => "",
    }
}

fn parse_prefix<'a>(input: &'a str, tokens: &[Token<'a>]) -> (&'a str, Vec<FunctionSpecifier>) {
    let specifiers: Vec<FunctionSpecifier> = tokens
        .iter()
        .map_while(|t| FunctionSpecifier::from_prefix_keyword(t.text))
        .collect();

    (span(input, &tokens[specifiers.len()..]), specifiers)
}

fn split_top_level<'t, 'a>(tokens: &'t [Token<'a>], separator: &str) -> Vec<&'t [Token<'a>]> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, token) in tokens.iter().enumerate() {
        match token.text {
            "(" | "[" | "{" | "<" => depth += 1,
            ")" | "]" | "}" | ">" => depth = depth.saturating_sub(1),
            ">>" => depth = depth.saturating_sub(2),
            text if text == separator && depth == 0 => {
                parts.push(&tokens[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    parts.push(&tokens[start..]);
    parts
}

fn parse_param<'a>(input: &'a str, tokens: &[Token<'a>]) -> CppMethodParam<'a> {
    // default arguments only belong to the declaration
    let declaration = split_top_level(tokens, "=")[0];

    let name = match declaration {
        [.., before, last]
            if last.is_ident()
                && can_name_member(last.text)
                && !matches!(before.text, "::" | "const" | "volatile" | "struct" | "class" | "enum" | "typename") =>
        {
            Some(last.text)
        }
        _ => None,
    };

    CppMethodParam {
        text: span(input, declaration),
        name,
    }
}

pub fn parse_method_params<'a>(input: &'a str, tokens: &[Token<'a>]) -> Vec<CppMethodParam<'a>> {
    split_top_level(tokens, ",")
        .into_iter()
        .filter(|param| !param.is_empty())
        .map(|param| parse_param(input, param))
        .collect()
}

fn paren_group(input: &str) -> IResult<&str, &str, VerboseError<&str>> {
    recognize(delimited(
        char('('),
        many0(alt((is_not("()"), paren_group))),
        char(')'),
    ))
    .parse(input)
}

/// `-> type`, running up to a trailing `override`/`final`.
fn parse_trailing_return(input: &str) -> IResult<&str, &str, VerboseError<&str>> {
    let (rest, _) = (tag("->"), multispace0).parse(input)?;

    let end = tokenize(rest)
        .iter()
        .find(|t| t.is("override") || t.is("final"))
        .map_or(rest.len(), |t| t.offset);
    let consumed = input.len() - rest.len() + end;
    let returned = input[..consumed].trim_end();

    if returned.trim_start_matches("->").trim().is_empty() {
        return Err(reject(input, "trailing return type"));
    }

    Ok((&input[consumed..], returned))
}

enum Qualifier<'a> {
    Keep(&'a str),
    Drop(FunctionSpecifier),
}

fn parse_qualifier(input: &str) -> IResult<&str, Qualifier<'_>, VerboseError<&str>> {
    alt((
        map(keyword("override"), |_| Qualifier::Drop(FunctionSpecifier::Override)),
        map(keyword("final"), |_| Qualifier::Drop(FunctionSpecifier::Final)),
        map(
            recognize((keyword("noexcept"), opt(preceded(multispace0, paren_group)))),
            Qualifier::Keep,
        ),
        map(
            recognize((keyword("throw"), multispace0, paren_group)),
            Qualifier::Keep,
        ),
        map(
            alt((keyword("const"), keyword("volatile"), tag("&&"), tag("&"))),
            Qualifier::Keep,
        ),
        map(parse_trailing_return, Qualifier::Keep),
    ))
    .parse(input)
}

/// Decomposes a member function declaration (without `;`) into prefix, name,
/// parameters and suffix.
///
/// Fails on shapes it does not understand, such as function pointers or
/// unknown text after the parameter list.
pub fn parse_declarator(input: &str) -> IResult<&str, Declarator<'_>, VerboseError<&str>> {
    let tokens = tokenize(input);

    let (name_start, name_end, open) =
        locate_name(&tokens).ok_or_else(|| reject(input, "member name"))?;
    let close = matching_close(&tokens, open).ok_or_else(|| reject(input, "parameter list"))?;

    let (prefix, mut specifiers) = parse_prefix(input, &tokens[..name_start]);
    let name = member_name(&tokens[name_start..name_end]);
    let params = parse_method_params(input, &tokens[open + 1..close]);

    let (input, qualifiers) =
        terminated(many0(ws(parse_qualifier)), eof).parse(&input[tokens[close].end()..])?;

    let mut suffix = Vec::new();
    for qualifier in qualifiers {
        match qualifier {
            Qualifier::Keep(text) => suffix.push(text),
            Qualifier::Drop(specifier) => specifiers.push(specifier),
        }
    }

    Ok((
        input,
        Declarator {
            prefix,
            name,
            params,
            suffix,
            specifiers,
        },
    ))
}
