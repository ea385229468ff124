use crate::parser::cpp::comment::strip_comments;
use crate::parser::cpp::lexer::{Token, tokenize};

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum AccessSpecifier {
    Private,
    Protected,
    Public,
}

impl AccessSpecifier {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "private" => Some(AccessSpecifier::Private),
            "protected" => Some(AccessSpecifier::Protected),
            "public" => Some(AccessSpecifier::Public),
            _ => None,
        }
    }
}

/// Access label (`public:`, ...) starting at `tokens[i]`.
fn access_label(tokens: &[Token], i: usize) -> Option<AccessSpecifier> {
    let specifier = AccessSpecifier::from_keyword(tokens.get(i)?.text)?;
    tokens.get(i + 1)?.is(":").then_some(specifier)
}

/// `class` used as the key of a scoped enum or of a template parameter.
fn is_foreign_class_key(tokens: &[Token], i: usize) -> bool {
    i.checked_sub(1)
        .is_some_and(|prev| matches!(tokens[prev].text, "enum" | "<" | ","))
}

/// The class name is the last identifier of the head, so `class API Widget`
/// yields `Widget`.
fn class_head_name<'a>(head: &[Token<'a>]) -> Option<&'a str> {
    head.iter()
        .take_while(|t| t.is_ident() && !t.is("final"))
        .last()
        .map(|t| t.text)
}

/// Name of the first class declared in `text`.
///
/// Forward declarations count, so `class Foo;` before the real class wins.
pub fn parse_class_name(text: &str) -> Option<&str> {
    let tokens = tokenize(text);

    tokens
        .iter()
        .enumerate()
        .filter(|(i, token)| token.is("class") && !is_foreign_class_key(&tokens, *i))
        .find_map(|(i, _)| class_head_name(&tokens[i + 1..]))
}

/// Finds the span of the first `public:` section in comment-free text.
///
/// The section ends at the next `private:`/`protected:` label or at the brace
/// closing the body it belongs to. Labels and braces of nested bodies are
/// skipped, and further `public:` labels are cut out of the result.
pub fn isolate_public_section(text: &str) -> String {
    let tokens = tokenize(text);

    let Some(label) =
        (0..tokens.len()).find(|i| access_label(&tokens, *i) == Some(AccessSpecifier::Public))
    else {
        return String::new();
    };

    let mut section = String::new();
    let mut start = tokens[label + 1].end();
    let mut end = text.len();
    let mut depth = 0usize;
    let mut i = label + 2;

    while let Some(token) = tokens.get(i) {
        match token.text {
            "{" => depth += 1,
            "}" if depth == 0 => {
                end = token.offset;
                break;
            }
            "}" => depth -= 1,
            _ if depth == 0 => match access_label(&tokens, i) {
                Some(AccessSpecifier::Public) => {
                    section.push_str(&text[start..token.offset]);
                    start = tokens[i + 1].end();
                    i += 2;
                    continue;
                }
                Some(_) => {
                    end = token.offset;
                    break;
                }
                None => {}
            },
            _ => {}
        }
        i += 1;
    }

    section.push_str(&text[start..end]);
    section
}

/// The public section of the header with all comments removed.
pub fn extract_public_section(text: &str) -> String {
    isolate_public_section(&strip_comments(text))
}
