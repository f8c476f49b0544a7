//! Documentation presence and format checks.
//!
//! Presence is positional: the nearest comment before a function counts as
//! its documentation if it ends at most [`MAX_DOC_GAP`] lines above the
//! function name. Format is structural: a documented function must also
//! describe each named parameter, its return value (unless `void`) and carry
//! at least one `--` annotation line.

use std::collections::HashSet;

use crate::config::LintConfig;
use crate::lexer::{Token, TokenKind};
use crate::parsed::ParsedFile;
use crate::signature::FunctionInfo;
use crate::violation::{Category, Violation, ViolationKind};

/// Largest allowed distance between a comment's last line and the function line.
pub const MAX_DOC_GAP: usize = 3;

/// Prefix of an annotation line inside documentation.
pub const ANNOTATION_MARKER: &str = "--";

/// A comment found before a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocComment {
    /// Comment text. Consecutive line comments are joined with newlines.
    pub text: String,
    pub start_line: usize,
    pub end_line: usize,
}

impl DocComment {
    /// True if the comment ends close enough above `line` to document it.
    pub fn is_within_reach(&self, line: usize) -> bool {
        line.saturating_sub(self.end_line) <= MAX_DOC_GAP
    }
}

/// Find the nearest comment that starts before position (`line`, `column`).
///
/// A run of `//` comments on consecutive lines is returned as one comment.
pub fn doc_comment_for(tokens: &[Token], line: usize, column: usize) -> Option<DocComment> {
    let before = |t: &Token| t.line < line || (t.line == line && t.column < column);

    let index = tokens
        .iter()
        .rposition(|t| t.kind.is_comment() && before(t))?;
    let nearest = &tokens[index];

    if nearest.kind == TokenKind::BlockComment {
        return Some(DocComment {
            text: nearest.text.clone(),
            start_line: nearest.line,
            end_line: nearest.end_line(),
        });
    }

    // Walk back over line comments on directly preceding lines.
    let mut run = vec![nearest];
    let mut expected_line = nearest.line;
    for token in tokens[..index].iter().rev() {
        match token.kind {
            TokenKind::Newline => continue,
            TokenKind::LineComment if token.line + 1 == expected_line => {
                run.push(token);
                expected_line = token.line;
            }
            _ => break,
        }
    }
    run.reverse();

    Some(DocComment {
        text: run
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join("\n"),
        start_line: run[0].line,
        end_line: nearest.line,
    })
}

/// True if some record named `function_name` is documented.
pub fn has_documentation(parsed: &ParsedFile, function_name: &str) -> bool {
    parsed
        .functions()
        .iter()
        .any(|f| f.name == function_name && f.has_documentation)
}

/// True if a record named `function_name` has structurally complete documentation.
pub fn has_proper_format(parsed: &ParsedFile, function_name: &str) -> bool {
    parsed
        .functions()
        .iter()
        .filter(|f| f.name == function_name)
        .any(is_properly_formatted)
}

/// Format rule for a single record.
pub fn is_properly_formatted(func: &FunctionInfo) -> bool {
    let Some(text) = func.documentation_text.as_deref() else {
        return false;
    };
    let lines: Vec<String> = text.lines().map(clean_comment_line).collect();

    let has_description = lines
        .iter()
        .any(|line| is_prose(line) && !is_marker_line(line, func));
    if !has_description {
        return false;
    }

    let params_described = func
        .parameters
        .iter()
        .filter_map(|p| p.name.as_deref())
        .all(|name| lines.iter().any(|line| describes_parameter(line, name)));
    if !params_described {
        return false;
    }

    if !func.returns_void() && !lines.iter().any(|line| describes_return(line)) {
        return false;
    }

    lines.iter().any(|line| is_annotation(line))
}

/// Collapse whitespace runs to one space and trim.
///
/// Qualifier order and pointer placement are left alone: `const char *` and
/// `char const *` stay different.
pub fn normalize_type_string(ty: &str) -> String {
    ty.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Documentation violations for every function in a file.
///
/// Each function name is reported at most once, at its first record. The
/// entry point is exempt.
pub fn check_file(parsed: &ParsedFile, config: &LintConfig) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for func in parsed.functions() {
        if func.name == config.entry_point || !seen.insert(func.name.as_str()) {
            continue;
        }

        if !has_documentation(parsed, &func.name) {
            violations.push(Violation::new(
                ViolationKind::MissingDocumentation,
                config.strictness.missing_doc_severity(),
                Category::Documentation,
                parsed.path(),
                func.line_number,
                format!("function '{}' has no documentation", func.name),
            ));
        } else if config.check_format && !has_proper_format(parsed, &func.name) {
            violations.push(Violation::new(
                ViolationKind::ImproperDocumentationFormat,
                config.strictness.format_severity(),
                Category::Documentation,
                parsed.path(),
                func.line_number,
                format!(
                    "documentation for '{}' is missing {}",
                    func.name,
                    missing_pieces(func).join(", ")
                ),
            ));
        }
    }

    violations
}

/// Human-readable list of what a record's documentation lacks.
fn missing_pieces(func: &FunctionInfo) -> Vec<String> {
    let text = func.documentation_text.as_deref().unwrap_or_default();
    let lines: Vec<String> = text.lines().map(clean_comment_line).collect();
    let mut missing = Vec::new();

    if !lines.iter().any(|l| is_prose(l) && !is_marker_line(l, func)) {
        missing.push("a description".to_string());
    }
    for name in func.parameters.iter().filter_map(|p| p.name.as_deref()) {
        if !lines.iter().any(|l| describes_parameter(l, name)) {
            missing.push(format!("parameter `{}`", name));
        }
    }
    if !func.returns_void() && !lines.iter().any(|l| describes_return(l)) {
        missing.push("a return value description".to_string());
    }
    if !lines.iter().any(|l| is_annotation(l)) {
        missing.push(format!("a `{}` annotation", ANNOTATION_MARKER));
    }

    missing
}

/// Strip comment delimiters and leading `*` gutters from one line.
fn clean_comment_line(line: &str) -> String {
    let mut s = line.trim();
    for opener in ["/**", "/*!", "/*", "///", "//!", "//"] {
        if let Some(rest) = s.strip_prefix(opener) {
            s = rest;
            break;
        }
    }
    s = s.trim_end();
    if let Some(rest) = s.strip_suffix("*/") {
        s = rest;
    }
    s = s.trim();
    // Gutter `*`, but not a `**` emphasis run.
    if let Some(rest) = s.strip_prefix('*') {
        if !rest.starts_with('*') {
            s = rest;
        }
    }
    s.trim().to_string()
}

fn is_prose(line: &str) -> bool {
    line.chars().any(|c| c.is_alphanumeric())
}

fn is_marker_line(line: &str, func: &FunctionInfo) -> bool {
    is_annotation(line)
        || describes_return(line)
        || line.starts_with('@')
        || line.starts_with('\\')
        || func
            .parameters
            .iter()
            .filter_map(|p| p.name.as_deref())
            .any(|name| line.starts_with(&format!("`{}`", name)))
}

/// `` `name` - text``, `@param name text` or `\param name text`.
fn describes_parameter(line: &str, name: &str) -> bool {
    let quoted = format!("`{}`", name);
    if let Some(pos) = line.find(&quoted) {
        return has_trailing_text(&line[pos + quoted.len()..]);
    }

    for tag in ["@param", "\\param"] {
        if let Some(rest) = line.strip_prefix(tag) {
            // `@param[in] name`
            let rest = rest
                .trim_start_matches(|c: char| c == '[' || c.is_alphabetic() || c == ']')
                .trim_start();
            if let Some(after) = rest.strip_prefix(name) {
                if after.is_empty() || after.starts_with(|c: char| !(c.is_alphanumeric() || c == '_')) {
                    return has_trailing_text(after);
                }
            }
        }
    }

    false
}

fn describes_return(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.starts_with("return")
        || lower.starts_with("@return")
        || lower.starts_with("\\return")
        || lower.contains("`return`")
}

fn is_annotation(line: &str) -> bool {
    line.strip_prefix(ANNOTATION_MARKER)
        .is_some_and(has_trailing_text)
}

fn has_trailing_text(rest: &str) -> bool {
    rest.trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '-' | ':' | '='))
        .chars()
        .any(|c| c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Strictness;
    use crate::lexer::scan;
    use crate::violation::Severity;

    fn parse(source: &str) -> ParsedFile {
        ParsedFile::from_source("test.c", source)
    }

    fn source_with_comment_ending_at(end_line: usize, function_line: usize) -> String {
        // Comment spans lines end_line-2 ..= end_line.
        let mut source = String::new();
        for _ in 1..end_line - 2 {
            source.push('\n');
        }
        source.push_str("/* Adds.\n * more\n */\n");
        for _ in end_line + 1..function_line {
            source.push('\n');
        }
        source.push_str("int add(int a, int b);\n");
        source
    }

    #[test]
    fn test_block_comment_end_line() {
        let tokens = scan(&source_with_comment_ending_at(12, 15));
        let doc = doc_comment_for(&tokens, 15, 5).unwrap();
        assert_eq!(doc.start_line, 10);
        assert_eq!(doc.end_line, 12);
    }

    #[test]
    fn test_proximity_boundary_is_inclusive() {
        let parsed = parse(&source_with_comment_ending_at(12, 15));
        assert_eq!(parsed.functions()[0].line_number, 15);
        assert!(has_documentation(&parsed, "add"));
    }

    #[test]
    fn test_proximity_one_past_boundary() {
        let parsed = parse(&source_with_comment_ending_at(11, 15));
        assert_eq!(parsed.functions()[0].line_number, 15);
        assert!(!has_documentation(&parsed, "add"));
    }

    #[test]
    fn test_trailing_comment_is_not_documentation() {
        let parsed = parse("int add(int a, int b); /* trailing */\n");
        assert!(!has_documentation(&parsed, "add"));
    }

    #[test]
    fn test_same_line_leading_comment_counts() {
        let parsed = parse("/* Adds. */ int add(int a, int b);\n");
        assert!(has_documentation(&parsed, "add"));
    }

    #[test]
    fn test_line_comment_run_is_merged() {
        let source = "// Adds two numbers.\n// `a` - left\n// `b` - right\nint add(int a, int b);\n";
        let tokens = scan(source);
        let doc = doc_comment_for(&tokens, 4, 5).unwrap();
        assert_eq!(doc.start_line, 1);
        assert_eq!(doc.end_line, 3);
        assert_eq!(doc.text.lines().count(), 3);
    }

    #[test]
    fn test_no_comment_means_undocumented() {
        let parsed = parse("int add(int a, int b);\n");
        assert!(!has_documentation(&parsed, "add"));
        assert!(!has_proper_format(&parsed, "add"));
    }

    #[test]
    fn test_proper_format_accepted() {
        let source = r#"
/**
 * Adds two integers.
 *
 * `a` - the left operand
 * `b` - the right operand
 *
 * Returns the sum.
 *
 * -- Overflow wraps like the underlying int.
 */
int add(int a, int b);
"#;
        let parsed = parse(source);
        assert!(has_documentation(&parsed, "add"));
        assert!(has_proper_format(&parsed, "add"));
    }

    #[test]
    fn test_missing_second_parameter_rejected() {
        let source = r#"
/**
 * Adds two integers.
 * `a` - the left operand
 * Returns the sum.
 * -- Overflow wraps.
 */
int add(int a, int b);
"#;
        let parsed = parse(source);
        assert!(has_documentation(&parsed, "add"));
        assert!(!has_proper_format(&parsed, "add"));
    }

    #[test]
    fn test_missing_return_rejected_unless_void() {
        let doc = "/* Resets state.\n * `s` - the state\n * -- Not thread safe.\n */\n";
        let non_void = parse(&format!("{}int reset(struct state *s);\n", doc));
        assert!(!has_proper_format(&non_void, "reset"));

        let void = parse(&format!("{}void reset(struct state *s);\n", doc));
        assert!(has_proper_format(&void, "reset"));
    }

    #[test]
    fn test_missing_annotation_rejected() {
        let source = "/* Resets state.\n * `s` - the state\n */\nvoid reset(struct state *s);\n";
        assert!(!has_proper_format(&parse(source), "reset"));
    }

    #[test]
    fn test_marker_without_description_rejected() {
        let source = "/* Resets state.\n * `s`\n * -- Not thread safe.\n */\nvoid reset(struct state *s);\n";
        assert!(!has_proper_format(&parse(source), "reset"));
    }

    #[test]
    fn test_description_required() {
        let source = "/* `s` - the state\n * -- Not thread safe.\n */\nvoid reset(struct state *s);\n";
        assert!(!has_proper_format(&parse(source), "reset"));
    }

    #[test]
    fn test_doxygen_param_markers_accepted() {
        let source = "/**\n * Copies bytes.\n * @param dst destination\n * @param[in] src source\n * @return bytes copied\n * -- Regions must not overlap.\n */\nint copy(char *dst, const char *src);\n";
        assert!(has_proper_format(&parse(source), "copy"));
    }

    #[test]
    fn test_unnamed_parameters_are_not_required() {
        let source = "/* Adds.\n * Returns the sum.\n * -- Pure.\n */\nint add(int, int);\n";
        assert!(has_proper_format(&parse(source), "add"));
    }

    #[test]
    fn test_normalize_type_string() {
        assert_eq!(normalize_type_string("  unsigned   long\tint "), "unsigned long int");
        assert_eq!(normalize_type_string("char *"), "char *");
        assert_ne!(normalize_type_string("const char *"), normalize_type_string("char const *"));
    }

    #[test]
    fn test_check_file_reports_missing_docs() {
        let parsed = parse("int undocumented(void);\n/* Doc. */\nint documented(void);\nint main(void) { return 0; }\n");
        let violations = check_file(&parsed, &LintConfig::default());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::MissingDocumentation);
        assert_eq!(violations[0].line, 1);
        assert_eq!(violations[0].severity, Severity::Error);
    }

    #[test]
    fn test_check_file_reports_each_name_once() {
        let parsed = parse("int f(void);\n\n\n\n\nint f(void) { return 0; }\n");
        let violations = check_file(&parsed, &LintConfig::default());
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn test_check_file_format_is_opt_in() {
        let parsed = parse("/* Doc. */\nint f(int x);\n");
        assert!(check_file(&parsed, &LintConfig::default()).is_empty());

        let strict = LintConfig::default()
            .with_format_check(true)
            .with_strictness(Strictness::Strict);
        let violations = check_file(&parsed, &strict);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::ImproperDocumentationFormat);
        assert_eq!(violations[0].severity, Severity::Error);
        assert!(violations[0].message.contains("parameter `x`"));
    }

    #[test]
    fn test_lenient_downgrades_format() {
        let parsed = parse("/* Doc. */\nint f(int x);\n");
        let lenient = LintConfig::default()
            .with_format_check(true)
            .with_strictness(Strictness::Lenient);
        let violations = check_file(&parsed, &lenient);
        assert_eq!(violations[0].severity, Severity::Info);
    }
}
