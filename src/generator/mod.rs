use crate::error::GenerateError;
use crate::generator::cpp::{Definition, build_method_definition};
use crate::parser::cpp::class::{extract_public_section, parse_class_name};
use crate::parser::cpp::member::split_declarations;
use std::path::Path;
use tracing::{debug, info};

pub mod cpp;

#[derive(Debug, Clone, Default)]
pub struct GeneratorOptions {
    /// Leave out declarations ending in `= default`, `= delete` or `= 0`
    /// instead of stubbing them like any other member.
    pub skip_special: bool,
}

/// A generated implementation file.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct Generated {
    /// `<stem>.cpp` of the header.
    pub file_name: String,
    pub text: String,
}

fn render_document(include: &str, definitions: &[Definition]) -> String {
    let mut text = format!("#include \"{include}\"\n");
    for definition in definitions {
        text.push('\n');
        text.push_str(&definition.to_string());
        text.push('\n');
    }

    text
}

/// Generates stubs for the public member functions of the class in `header_text`.
///
/// `source_path` only provides the file names; it is never read.
pub fn try_generate(
    source_path: &Path,
    header_text: &str,
    options: &GeneratorOptions,
) -> Result<Generated, GenerateError> {
    let class_name = parse_class_name(header_text).ok_or(GenerateError::NoClassFound)?;

    let section = extract_public_section(header_text);
    let definitions: Vec<Definition> = split_declarations(&section)
        .into_iter()
        .filter(|declaration| match declaration.special {
            Some(special) if options.skip_special => {
                debug!(declaration = declaration.text, ?special, "skipping special member");
                false
            }
            _ => true,
        })
        .map(|declaration| build_method_definition(class_name, declaration.text))
        .collect();

    let include = source_path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    let stem = source_path
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();

    info!(class = class_name, definitions = definitions.len(), "generated stubs");

    Ok(Generated {
        file_name: format!("{stem}.cpp"),
        text: render_document(&include, &definitions),
    })
}

/// Like [`try_generate`], but reports a missing class as `(None, comment)`.
pub fn generate_with(
    options: &GeneratorOptions,
    source_path: &Path,
    header_text: &str,
) -> (Option<String>, String) {
    match try_generate(source_path, header_text, options) {
        Ok(generated) => (Some(generated.file_name), generated.text),
        Err(error) => (None, error.as_comment()),
    }
}

/// Generates with default options: `(Some("<stem>.cpp"), text)`, or
/// `(None, comment)` when the header declares no class.
pub fn generate_cpp_from_hpp(source_path: &Path, header_text: &str) -> (Option<String>, String) {
    generate_with(&GeneratorOptions::default(), source_path, header_text)
}

#[cfg(test)]
mod tests {
    use crate::generator::{GeneratorOptions, generate_cpp_from_hpp, generate_with, try_generate};
    use crate::GenerateError;
    use rand::Rng;
    use std::path::Path;

    const WIDGET: &str = r#"#pragma once

class Widget {
public:
    Widget();
    ~Widget();
    Widget& operator=(const Widget& other);
    int getValue() const;
private:
    int value_;
};
"#;

    fn random_whitespace_string() -> String {
        let mut rng = rand::rng();
        let len = rng.random_range(1..=40);
        " ".repeat(len)
    }

    fn random_newline_string() -> String {
        let mut rng = rand::rng();
        let len = rng.random_range(1..=40);
        "\n".repeat(len)
    }

    #[test]
    fn test_widget() {
        let (name, text) = generate_cpp_from_hpp(Path::new("src/file.hpp"), WIDGET);

        assert_eq!(name.as_deref(), Some("file.cpp"));
        assert_eq!(
            text,
            r#"#include "file.hpp"

Widget::Widget()
{
}

Widget::~Widget()
{
}

Widget& Widget::operator=(const Widget& other)
{
    if (this == &other)
        return *this;

    // TODO: copy/move fields

    return *this;
}

int Widget::getValue() const
{
    // TODO: implement
}
"#
        );
    }

    #[test]
    fn test_no_class() {
        for header in ["", "int add(int a, int b);", "struct Point { int x; };"] {
            let (name, text) = generate_cpp_from_hpp(Path::new("math.hpp"), header);

            assert_eq!(name, None);
            assert_eq!(text, "// No class declaration found.\n");
        }

        assert_eq!(
            try_generate(Path::new("math.hpp"), "", &GeneratorOptions::default()),
            Err(GenerateError::NoClassFound)
        );
    }

    #[test]
    fn test_output_name_follows_header_stem() {
        for (path, expected) in [
            ("widget.hpp", "widget.cpp"),
            ("/home/user/project/include/my.widget.hpp", "my.widget.cpp"),
            ("Widget", "Widget.cpp"),
        ] {
            let (name, _) = generate_cpp_from_hpp(Path::new(path), "class W { public: W(); };");
            assert_eq!(name.as_deref(), Some(expected));
        }
    }

    #[test]
    fn test_include_uses_base_name() {
        let (_, text) = generate_cpp_from_hpp(Path::new("/tmp/a/widget.hpp"), "class W {};");
        assert!(text.starts_with("#include \"widget.hpp\"\n"));
    }

    #[test]
    fn test_empty_public_section() {
        for header in [
            "class Widget { int hidden(); };",
            "class Widget { public: private: void hidden(); };",
            "class Widget { public: int value; };",
        ] {
            let (_, text) = generate_cpp_from_hpp(Path::new("widget.hpp"), header);
            assert_eq!(text, "#include \"widget.hpp\"\n");
        }
    }

    #[test]
    fn test_declaration_order_is_preserved() {
        let header = r#"class Widget {
        public:
            void c();
            void a();
            int value;
            void b();
        };"#;

        let (_, text) = generate_cpp_from_hpp(Path::new("widget.hpp"), header);
        let signatures: Vec<&str> = text.lines().filter(|line| line.contains("Widget::")).collect();

        assert_eq!(
            signatures,
            vec!["void Widget::c()", "void Widget::a()", "void Widget::b()"]
        );
    }

    #[test]
    fn test_special_members_are_stubbed_by_default() {
        let header = "class Widget { public: Widget(const Widget&) = default; void f() = delete; };";

        let (_, text) = generate_cpp_from_hpp(Path::new("widget.hpp"), header);
        assert!(text.contains("Widget::Widget(const Widget&)\n{\n}"));
        assert!(text.contains("void Widget::f()\n{\n    // TODO: implement\n}"));
    }

    #[test]
    fn test_skip_special_members() {
        let header = r#"class Widget {
        public:
            Widget(const Widget&) = default;
            Widget& operator=(Widget&&) = delete;
            virtual void draw() = 0;
            void update();
        };"#;

        let options = GeneratorOptions { skip_special: true };
        let (_, text) = generate_with(&options, Path::new("widget.hpp"), header);

        assert_eq!(
            text,
            "#include \"widget.hpp\"\n\nvoid Widget::update()\n{\n    // TODO: implement\n}\n"
        );
    }

    #[test]
    fn test_unparseable_declaration_does_not_abort() {
        let header = r#"class Widget {
        public:
            void before();
            void (*callback)(int);
            void (*handler(int a,
                           int b))(int);
            void after();
        };"#;

        let (name, text) = generate_cpp_from_hpp(Path::new("widget.hpp"), header);

        assert_eq!(name.as_deref(), Some("widget.cpp"));
        assert_eq!(
            text,
            "#include \"widget.hpp\"\n\
             \n\
             void Widget::before()\n{\n    // TODO: implement\n}\n\
             \n\
             // TODO: could not generate for: void (*callback)(int)\n\
             \n\
             // TODO: could not generate for: void (*handler(int a, int b))(int)\n\
             \n\
             void Widget::after()\n{\n    // TODO: implement\n}\n"
        );

        for line in text.lines() {
            assert!(
                line.is_empty() || line.starts_with("//") || !line.contains("int b"),
                "uncommented line: {line:?}"
            );
        }
    }

    #[test]
    fn test_comments_in_public_section() {
        let header = r#"class Widget {
        public:
            // Creates a widget.
            Widget(); // not ~Widget();
            /* void hidden();
               void alsoHidden(); */
            void shown();
        };"#;

        let (_, text) = generate_cpp_from_hpp(Path::new("widget.hpp"), header);
        assert!(!text.contains("hidden"));
        assert!(!text.contains("alsoHidden"));
        assert!(!text.contains("~Widget"));
        assert!(text.contains("void Widget::shown()"));
    }

    #[test]
    fn test_layout_does_not_matter() {
        for _ in 0..10 {
            let ws = random_whitespace_string();
            let nl = random_newline_string();
            let header = format!(
                "class{ws}Widget{nl}{{{nl}public:{ws}int{ws}getValue({ws}){ws}const{ws};{nl}Widget{ws}({ws}){ws};{nl}}}{ws};"
            );

            let (_, text) = generate_cpp_from_hpp(Path::new("widget.hpp"), &header);
            assert_eq!(
                text,
                "#include \"widget.hpp\"\n\
                 \n\
                 int Widget::getValue() const\n{\n    // TODO: implement\n}\n\
                 \n\
                 Widget::Widget()\n{\n}\n"
            );
        }
    }
}
