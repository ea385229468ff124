use crate::parser::cpp::lexer::{Token, matching_close, tokenize};
use tracing::debug;

/// Trailing `= default`, `= delete` or `= 0` of a member declaration.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum Special {
    Default,
    Delete,
    Pure,
}

impl Special {
    fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "default" => Some(Special::Default),
            "delete" => Some(Special::Delete),
            "0" => Some(Special::Pure),
            _ => None,
        }
    }
}

/// One member function declaration of the public section, without its `;`.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct Declaration<'a> {
    pub text: &'a str,
    pub special: Option<Special>,
}

// Statements that contain parentheses but declare no member function.
const NON_MEMBER_STATEMENTS: [&str; 4] = ["friend", "using", "typedef", "static_assert"];

fn statement_text<'a>(section: &'a str, tokens: &[Token<'a>]) -> &'a str {
    match (tokens.first(), tokens.last()) {
        (Some(first), Some(last)) => &section[first.offset..last.end()],
        _ => "",
    }
}

fn member_declaration<'a>(
    section: &'a str,
    tokens: &[Token<'a>],
    has_params: bool,
) -> Option<Declaration<'a>> {
    let first = tokens.first()?;

    if NON_MEMBER_STATEMENTS.contains(&first.text) {
        debug!(statement = statement_text(section, tokens), "skipping non-member statement");
        return None;
    }

    if !has_params {
        return None;
    }

    let (tokens, special) = match tokens {
        [declarator @ .., assign, marker] if assign.is("=") => match Special::from_keyword(marker.text) {
            Some(special) => (declarator, Some(special)),
            None => (tokens, None),
        },
        _ => (tokens, None),
    };

    Some(Declaration {
        text: statement_text(section, tokens),
        special,
    })
}

/// Splits a public section into member function declarations, in source order.
///
/// Statements end at a `;` outside of any parentheses or braces. Statements
/// without a parameter list (data members, nested types) are dropped, and so
/// are inline definitions: their body is skipped together with a constructor
/// initializer list in front of it.
pub fn split_declarations(section: &str) -> Vec<Declaration<'_>> {
    let tokens = tokenize(section);
    let mut declarations = Vec::new();

    let mut start = 0;
    let mut parens = 0usize;
    let mut has_params = false;
    let mut i = 0;

    while let Some(token) = tokens.get(i) {
        match token.text {
            "(" | "[" => {
                if parens == 0 && token.is("(") {
                    has_params = true;
                }
                parens += 1;
            }
            ")" | "]" => parens = parens.saturating_sub(1),
            "{" if parens == 0 => {
                let Some(close) = matching_close(&tokens, i) else {
                    debug!("unbalanced braces in public section");
                    break;
                };

                let next = tokens.get(close + 1).map(|t| t.text);
                if has_params && !matches!(next, Some(",") | Some("{")) {
                    debug!(
                        definition = statement_text(section, &tokens[start..=close]),
                        "skipping inline definition"
                    );

                    i = close + 1;
                    if next == Some(";") {
                        i += 1;
                    }
                    start = i;
                    has_params = false;
                    continue;
                }

                i = close + 1;
                continue;
            }
            ";" if parens == 0 => {
                declarations.extend(member_declaration(section, &tokens[start..i], has_params));
                start = i + 1;
                has_params = false;
            }
            _ => {}
        }
        i += 1;
    }

    if start < tokens.len() {
        debug!(
            statement = statement_text(section, &tokens[start..]),
            "dropping unterminated statement"
        );
    }

    declarations
}

#[cfg(test)]
mod tests {
    use crate::parser::cpp::member::{Declaration, Special, split_declarations};

    fn texts(section: &str) -> Vec<&str> {
        split_declarations(section).iter().map(|d| d.text).collect()
    }

    #[test]
    fn test_split_keeps_order() {
        let section = r#"
            Widget();
            ~Widget();
            int getValue() const;
            void setValue(int value);
        "#;

        assert_eq!(
            texts(section),
            vec!["Widget()", "~Widget()", "int getValue() const", "void setValue(int value)"]
        );
    }

    #[test]
    fn test_split_drops_fields_and_empty_statements() {
        let section = "int value_; ; static const int limit = 3; void run();";
        assert_eq!(texts(section), vec!["void run()"]);
    }

    #[test]
    fn test_split_field_with_call_initializer_looks_like_function() {
        assert_eq!(texts("Timer timer_ = Timer(5);"), vec!["Timer timer_ = Timer(5)"]);
    }

    #[test]
    fn test_split_strips_special_markers() {
        let section = r#"
            Widget(const Widget&) = default;
            Widget(Widget&&) = delete;
            virtual void draw() const = 0;
            Widget& operator=(const Widget& other);
        "#;

        assert_eq!(
            split_declarations(section),
            vec![
                Declaration { text: "Widget(const Widget&)", special: Some(Special::Default) },
                Declaration { text: "Widget(Widget&&)", special: Some(Special::Delete) },
                Declaration { text: "virtual void draw() const", special: Some(Special::Pure) },
                Declaration { text: "Widget& operator=(const Widget& other)", special: None },
            ]
        );
    }

    #[test]
    fn test_split_keeps_default_arguments() {
        assert_eq!(
            texts("void resize(int w = 0, int h = 0);"),
            vec!["void resize(int w = 0, int h = 0)"]
        );
    }

    #[test]
    fn test_split_skips_inline_definitions() {
        let section = r#"
            int size() const { return size_; }
            void clear() { items_.clear(); };
            Widget(int a, int b) : a_(a), b_{b}, c_{} {}
            void reset();
        "#;

        assert_eq!(texts(section), vec!["void reset()"]);
    }

    #[test]
    fn test_split_skips_nested_types() {
        let section = r#"
            enum class Mode { Fast, Slow };
            struct Options { void apply(); int level; };
            void configure(Options options);
        "#;

        assert_eq!(texts(section), vec!["void configure(Options options)"]);
    }

    #[test]
    fn test_split_ignores_semicolons_inside_parentheses() {
        assert_eq!(
            texts("void each(std::function<void(int)> f = [](int) { ; });"),
            vec!["void each(std::function<void(int)> f = [](int) { ; })"]
        );
    }

    #[test]
    fn test_split_skips_non_member_statements() {
        let section = r#"
            friend bool operator==(const Widget& a, const Widget& b);
            using Callback = void (*)(int);
            typedef void (*Handler)(int);
            static_assert(sizeof(int) == 4);
            void notify();
        "#;

        assert_eq!(texts(section), vec!["void notify()"]);
    }

    #[test]
    fn test_split_drops_unterminated_trailing_statement() {
        assert_eq!(texts("void a(); void b()"), vec!["void a()"]);
    }

    #[test]
    fn test_split_empty_section() {
        assert!(split_declarations("").is_empty());
        assert!(split_declarations("   \n  ").is_empty());
    }
}
