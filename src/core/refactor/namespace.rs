//! File-scoped → braced namespace conversion.
//!
//! Recognises the first `namespace Name;` line in a file, rewrites it to
//! `namespace Name` followed by an opening `{` line, and makes sure the file
//! ends with a `}` line. Matching is line-based, not syntax-aware.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NamespaceStyle {
    /// `namespace Name;` scoping the rest of the file.
    FileScoped,
    /// `namespace Name { ... }`.
    Braced,
}

/// A namespace declaration found in a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamespaceDeclaration {
    pub name: String,
    pub style: NamespaceStyle,
    /// Line number (1-indexed).
    pub line: usize,
}

/// Result of converting one file's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// The declaration that was rewritten.
    pub declaration: NamespaceDeclaration,
    /// Full rewritten text.
    pub content: String,
    /// Whether a closing `}` line was added at the end.
    pub closer_appended: bool,
}

// ============================================================================
// Patterns
// ============================================================================

fn file_scoped_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\s*namespace\s+(\w+);").unwrap())
}

/// Any declaration shape, including dotted names, for reporting.
fn any_declaration_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\s*namespace\s+([\w.]+)\s*(;)?").unwrap())
}

// ============================================================================
// Detection
// ============================================================================

/// First convertible file-scoped declaration, if any.
pub fn detect_namespace(text: &str) -> Option<NamespaceDeclaration> {
    text.split_inclusive('\n')
        .enumerate()
        .find_map(|(index, line)| {
            file_scoped_pattern()
                .captures(line)
                .map(|caps| NamespaceDeclaration {
                    name: caps[1].to_string(),
                    style: NamespaceStyle::FileScoped,
                    line: index + 1,
                })
        })
}

/// First declaration of any style, convertible or not.
///
/// Used to explain why a file was left alone: already braced, or a dotted
/// file-scoped name the converter does not rewrite.
pub fn find_declaration(text: &str) -> Option<NamespaceDeclaration> {
    text.split_inclusive('\n')
        .enumerate()
        .find_map(|(index, line)| {
            any_declaration_pattern().captures(line).map(|caps| {
                let style = if caps.get(2).is_some() {
                    NamespaceStyle::FileScoped
                } else {
                    NamespaceStyle::Braced
                };
                NamespaceDeclaration {
                    name: caps[1].to_string(),
                    style,
                    line: index + 1,
                }
            })
        })
}

// ============================================================================
// Conversion
// ============================================================================

/// Convert the first file-scoped declaration in `text` to braced form.
///
/// Returns `None` when there is nothing to convert. Later declarations are
/// left as literal text. The closing brace is appended only when the last
/// output line, trimmed, does not already end with `}`; brace balance inside
/// the body is not checked.
pub fn convert_namespace(text: &str) -> Option<Conversion> {
    let mut output = String::with_capacity(text.len() + 8);
    let mut declaration = None;
    let mut eol = "\n";

    for (index, line) in text.split_inclusive('\n').enumerate() {
        if declaration.is_none() {
            if let Some(caps) = file_scoped_pattern().captures(line) {
                let name = caps[1].to_string();
                if line.ends_with("\r\n") {
                    eol = "\r\n";
                }

                output.push_str("namespace ");
                output.push_str(&name);
                output.push_str(eol);
                output.push('{');
                output.push_str(eol);

                declaration = Some(NamespaceDeclaration {
                    name,
                    style: NamespaceStyle::FileScoped,
                    line: index + 1,
                });
                continue;
            }
        }
        output.push_str(line);
    }

    let declaration = declaration?;

    let last_line = output.split_inclusive('\n').last().unwrap_or("");
    let closer_appended = !last_line.trim().ends_with('}');
    if closer_appended {
        if !output.ends_with('\n') {
            output.push_str(eol);
        }
        output.push('}');
        output.push_str(eol);
    }

    Some(Conversion {
        declaration,
        content: output,
        closer_appended,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(text: &str) -> String {
        convert_namespace(text)
            .map(|c| c.content)
            .unwrap_or_else(|| text.to_string())
    }

    #[test]
    fn converts_file_scoped_declaration() {
        let input = "using System;\n\nnamespace Foo;\n\npublic class Bar\n{\n    int x;\n}\n";
        let conversion = convert_namespace(input).unwrap();

        assert_eq!(
            conversion.content,
            "using System;\n\nnamespace Foo\n{\n\npublic class Bar\n{\n    int x;\n}\n"
        );
        assert_eq!(conversion.declaration.name, "Foo");
        assert_eq!(conversion.declaration.line, 3);
        assert!(!conversion.closer_appended);
    }

    #[test]
    fn appends_closer_when_last_line_lacks_one() {
        let input = "namespace Foo;\npublic enum Size { Small, Large }\n// trailing note\n";
        let conversion = convert_namespace(input).unwrap();

        assert!(conversion.closer_appended);
        assert_eq!(
            conversion.content,
            "namespace Foo\n{\npublic enum Size { Small, Large }\n// trailing note\n}\n"
        );
    }

    #[test]
    fn single_line_class_body_keeps_heuristic() {
        // Last line already ends with `}` so no closer is added.
        let input = "namespace Foo;\npublic class Bar {}\n";
        let conversion = convert_namespace(input).unwrap();

        assert!(!conversion.closer_appended);
        assert_eq!(conversion.content, "namespace Foo\n{\npublic class Bar {}\n");
    }

    #[test]
    fn exactly_one_closer_added() {
        let input = "namespace Foo;\npublic record Point(int X, int Y);\n";
        let output = convert(input);

        assert_eq!(output.matches('}').count(), 1);
        assert!(output.ends_with("}\n"));
    }

    #[test]
    fn no_declaration_is_a_no_op() {
        let input = "public class Bar {}\n";
        assert!(convert_namespace(input).is_none());
        assert_eq!(convert(input), input);
    }

    #[test]
    fn dotted_names_are_not_converted() {
        let input = "namespace LlmTornado.Chat;\npublic class ChatRequest {}\n";
        assert!(convert_namespace(input).is_none());
    }

    #[test]
    fn only_first_declaration_is_converted() {
        let input = "namespace Foo;\nclass A {}\nnamespace Baz;\nclass B {}\n";
        let conversion = convert_namespace(input).unwrap();

        assert_eq!(conversion.declaration.name, "Foo");
        assert_eq!(
            conversion.content,
            "namespace Foo\n{\nclass A {}\nnamespace Baz;\nclass B {}\n"
        );
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let input = "namespace Foo;\npublic interface IBar\n{\n    void Run();\n}\n// end\n";
        let once = convert(input);
        let twice = convert(&once);

        assert_eq!(once, twice);
        assert!(convert_namespace(&once).is_none());
    }

    #[test]
    fn leading_whitespace_and_trailing_text_are_dropped() {
        let input = "    namespace Foo; // scoped\nint x;\n";
        assert_eq!(convert(input), "namespace Foo\n{\nint x;\n}\n");
    }

    #[test]
    fn declaration_as_last_line_gets_closer() {
        let input = "using System;\nnamespace Foo;\n";
        assert_eq!(convert(input), "using System;\nnamespace Foo\n{\n}\n");
    }

    #[test]
    fn missing_final_newline_puts_closer_on_own_line() {
        let input = "namespace Foo;\nint x;";
        assert_eq!(convert(input), "namespace Foo\n{\nint x;\n}\n");
    }

    #[test]
    fn crlf_files_keep_crlf() {
        let input = "namespace Foo;\r\nint x;\r\n";
        assert_eq!(convert(input), "namespace Foo\r\n{\r\nint x;\r\n}\r\n");
    }

    #[test]
    fn trailing_blank_line_counts_as_last_line() {
        let input = "namespace Foo;\nclass A {}\n\n";
        assert_eq!(convert(input), "namespace Foo\n{\nclass A {}\n\n}\n");
    }

    #[test]
    fn detect_namespace_reports_first_match() {
        let decl = detect_namespace("// header\nnamespace Foo;\nnamespace Baz;\n").unwrap();
        assert_eq!(decl.name, "Foo");
        assert_eq!(decl.line, 2);
        assert_eq!(decl.style, NamespaceStyle::FileScoped);
    }

    #[test]
    fn find_declaration_classifies_styles() {
        let braced = find_declaration("using System;\nnamespace LlmTornado\n{\n}\n").unwrap();
        assert_eq!(braced.style, NamespaceStyle::Braced);
        assert_eq!(braced.name, "LlmTornado");

        let dotted = find_declaration("namespace LlmTornado.Chat;\n").unwrap();
        assert_eq!(dotted.style, NamespaceStyle::FileScoped);
        assert_eq!(dotted.name, "LlmTornado.Chat");

        assert!(find_declaration("public class Bar {}\n").is_none());
    }
}
