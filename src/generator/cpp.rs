use crate::parser::cpp::method::{CppMethodParam, Declarator, MemberKind};
use crate::types::Parsable;
use std::fmt;
use tracing::debug;

const RETURN_TYPE_PLACEHOLDER: &str = "/*RETURN TYPE*/";
const ASSIGNED_FROM: &str = "other";

/// One block of the generated implementation file.
#[derive(Debug, Eq, PartialEq, Clone)]
pub enum Definition {
    Stub { signature: String, body: Vec<String> },
    /// A declaration that could not be decomposed, kept for manual repair.
    Unparsed(String),
}

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Definition::Stub { signature, body } => {
                writeln!(f, "{signature}")?;
                writeln!(f, "{{")?;
                for line in body {
                    writeln!(f, "{line}")?;
                }
                write!(f, "}}")
            }
            Definition::Unparsed(declaration) => {
                // one line, so the placeholder stays a comment
                let declaration = declaration.split_whitespace().collect::<Vec<_>>().join(" ");
                write!(f, "// TODO: could not generate for: {declaration}")
            }
        }
    }
}

fn render_params(params: &[CppMethodParam], unnamed_first: Option<&str>) -> String {
    let rendered: Vec<String> = params
        .iter()
        .enumerate()
        .map(|(i, param)| match (i, param.name, unnamed_first) {
            (0, None, Some(name)) => format!("{} {name}", param.text),
            _ => param.text.to_string(),
        })
        .collect();

    format!("({})", rendered.join(", "))
}

fn return_type<'a>(declarator: &Declarator<'a>) -> &'a str {
    if declarator.prefix.is_empty() {
        RETURN_TYPE_PLACEHOLDER
    } else {
        declarator.prefix
    }
}

fn self_assignment_body(source: &str) -> Vec<String> {
    vec![
        format!("    if (this == &{source})"),
        "        return *this;".to_string(),
        String::new(),
        "    // TODO: copy/move fields".to_string(),
        String::new(),
        "    return *this;".to_string(),
    ]
}

/// Builds the out-of-line definition of an already decomposed member.
pub fn synthesize(class_name: &str, declarator: &Declarator) -> Definition {
    let kind = declarator.kind(class_name);
    let name = &declarator.name;

    let (head, body) = match kind {
        MemberKind::Constructor | MemberKind::Destructor => (
            format!("{class_name}::{name}{}", render_params(&declarator.params, None)),
            vec![],
        ),
        MemberKind::Assignment => {
            // the guard needs a name to compare against
            let source = match declarator.params.first() {
                Some(CppMethodParam { name: Some(source), .. }) => *source,
                _ => ASSIGNED_FROM,
            };
            (
                format!(
                    "{} {class_name}::{name}{}",
                    return_type(declarator),
                    render_params(&declarator.params, Some(ASSIGNED_FROM))
                ),
                self_assignment_body(source),
            )
        }
        MemberKind::Conversion => (
            format!("{class_name}::{name}{}", render_params(&declarator.params, None)),
            vec!["    // TODO: implement".to_string()],
        ),
        MemberKind::Method => (
            format!(
                "{} {class_name}::{name}{}",
                return_type(declarator),
                render_params(&declarator.params, None)
            ),
            vec!["    // TODO: implement".to_string()],
        ),
    };

    let signature = if declarator.suffix.is_empty() {
        head
    } else {
        format!("{head} {}", declarator.suffix.join(" "))
    };

    Definition::Stub { signature, body }
}

/// Builds the definition for one declaration of the public section.
///
/// A declaration that does not decompose becomes a [`Definition::Unparsed`]
/// placeholder instead of failing the whole file.
pub fn build_method_definition(class_name: &str, declaration: &str) -> Definition {
    match Declarator::parse(declaration) {
        Ok((_, declarator)) => synthesize(class_name, &declarator),
        Err(error) => {
            debug!(declaration, ?error, "could not decompose declaration");
            Definition::Unparsed(declaration.to_string())
        }
    }
}
