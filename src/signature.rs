//! Function signature extraction from a token stream.
//!
//! Walks the significant tokens once, tracking brace depth, and records every
//! top-level `type name(params)` that is followed directly by `{` or `;`.
//! Anything that does not fit the pattern is skipped: the extractor prefers
//! missing a function over inventing one.

use serde::Serialize;
use smallvec::SmallVec;

use crate::docs::doc_comment_for;
use crate::lexer::{Token, TokenKind};

/// Qualifiers that are recorded as flags rather than as part of the type.
const STORAGE_QUALIFIERS: &[&str] = &["static", "extern", "inline", "__inline", "__inline__"];

/// Keywords that can never start a function signature.
const NON_SIGNATURE_KEYWORDS: &[&str] = &[
    "typedef", "return", "if", "else", "while", "for", "do", "switch", "case", "default",
    "goto", "break", "continue", "sizeof",
];

/// A single parameter of a function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    /// Type text, normalized to single spaces.
    #[serde(rename = "type")]
    pub ty: String,
    /// Parameter name, absent for bare-type prototypes like `int add(int, int);`.
    pub name: Option<String>,
}

/// A top-level function declaration or definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionInfo {
    pub name: String,
    pub return_type: String,
    pub parameters: SmallVec<[Parameter; 4]>,
    /// 1-indexed line of the function name.
    pub line_number: usize,
    /// 1-indexed column of the function name.
    pub column: usize,
    pub is_static: bool,
    /// Followed by a body (`{`) rather than `;`.
    pub is_definition: bool,
    pub has_documentation: bool,
    pub documentation_text: Option<String>,
}

impl FunctionInfo {
    /// Number of parameters, with `(void)` counting as zero.
    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    /// True if the function returns nothing.
    pub fn returns_void(&self) -> bool {
        self.return_type == "void"
    }

    /// `ret name(type name, ...)` rendering for messages.
    pub fn signature(&self) -> String {
        let params: Vec<String> = self
            .parameters
            .iter()
            .map(|p| match &p.name {
                Some(name) if p.ty.contains("(*") => p.ty.replacen("(*", &format!("(*{}", name), 1),
                Some(name) if p.ty.ends_with('*') => format!("{}{}", p.ty, name),
                Some(name) => format!("{} {}", p.ty, name),
                None => p.ty.clone(),
            })
            .collect();
        let params = if params.is_empty() {
            "void".to_string()
        } else {
            params.join(", ")
        };
        format!("{} {}({})", self.return_type, self.name, params)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Brace {
    /// A body, initializer or aggregate: contents are not top level.
    Block,
    /// `extern "C" { ... }`: contents stay top level.
    Linkage,
}

/// Extract function records from a full token stream.
///
/// Comments in `tokens` are used to attach documentation; they are otherwise
/// ignored.
pub fn extract(tokens: &[Token]) -> Vec<FunctionInfo> {
    let significant: Vec<&Token> = tokens.iter().filter(|t| t.kind.is_significant()).collect();

    let mut functions = Vec::new();
    let mut braces: Vec<Brace> = Vec::new();
    let mut stmt_start = 0;
    let mut i = 0;

    while i < significant.len() {
        let token = significant[i];
        let top_level = !braces.contains(&Brace::Block);

        if token.is_symbol("{") {
            let linkage = top_level
                && i >= 2
                && significant[i - 1].kind == TokenKind::StringLiteral
                && significant[i - 2].is_keyword("extern");
            braces.push(if linkage { Brace::Linkage } else { Brace::Block });
            if linkage {
                stmt_start = i + 1;
            }
        } else if token.is_symbol("}") {
            braces.pop();
            if !braces.contains(&Brace::Block) {
                stmt_start = i + 1;
            }
        } else if token.is_symbol(";") && top_level {
            stmt_start = i + 1;
        } else if token.is_symbol("(") && top_level && i > stmt_start {
            if let Some((mut info, close)) = match_signature(&significant, stmt_start, i) {
                if let Some(doc) = doc_comment_for(tokens, info.line_number, info.column)
                    .filter(|doc| doc.is_within_reach(info.line_number))
                {
                    info.has_documentation = true;
                    info.documentation_text = Some(doc.text);
                }
                functions.push(info);
                // Resume at the terminator so braces/semicolons are tracked.
                i = close + 1;
                continue;
            }
        }

        i += 1;
    }

    functions
}

/// Try to read a signature whose `(` sits at `open`.
///
/// Returns the record and the index of the matching `)`.
fn match_signature(
    tokens: &[&Token],
    stmt_start: usize,
    open: usize,
) -> Option<(FunctionInfo, usize)> {
    let name_token = tokens[open - 1];
    if name_token.kind != TokenKind::Identifier {
        return None;
    }

    let prefix = &tokens[stmt_start..open - 1];
    if prefix.is_empty() {
        return None;
    }
    if prefix
        .first()
        .is_some_and(|t| t.kind == TokenKind::Keyword && NON_SIGNATURE_KEYWORDS.contains(&t.text.as_str()))
    {
        return None;
    }

    let close = matching_paren(tokens, open)?;
    let terminator = tokens.get(close + 1)?;
    let is_definition = if terminator.is_symbol("{") {
        true
    } else if terminator.is_symbol(";") {
        false
    } else {
        return None;
    };

    let mut is_static = false;
    let mut type_tokens: Vec<&Token> = Vec::with_capacity(prefix.len());
    for (index, &token) in prefix.iter().enumerate() {
        match token.kind {
            // `extern "C" int f(void);`
            TokenKind::StringLiteral if index > 0 && prefix[index - 1].is_keyword("extern") => {}
            TokenKind::Keyword if STORAGE_QUALIFIERS.contains(&token.text.as_str()) => {
                is_static |= token.text == "static";
            }
            TokenKind::Identifier if STORAGE_QUALIFIERS.contains(&token.text.as_str()) => {}
            TokenKind::Keyword | TokenKind::Identifier => type_tokens.push(token),
            TokenKind::Operator if token.text == "*" || token.text == "&" => type_tokens.push(token),
            _ => return None,
        }
    }
    if type_tokens.is_empty() {
        return None;
    }

    let info = FunctionInfo {
        name: name_token.text.clone(),
        return_type: join_tokens(&type_tokens),
        parameters: parse_parameters(&tokens[open + 1..close]),
        line_number: name_token.line,
        column: name_token.column,
        is_static,
        is_definition,
        has_documentation: false,
        documentation_text: None,
    };

    Some((info, close))
}

/// Index of the `)` matching the `(` at `open`, if any.
fn matching_paren(tokens: &[&Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, token) in tokens[open..].iter().enumerate() {
        if token.is_symbol("(") {
            depth += 1;
        } else if token.is_symbol(")") {
            depth -= 1;
            if depth == 0 {
                return Some(open + offset);
            }
        } else if token.is_symbol("{") || token.is_symbol("}") || token.is_symbol(";") {
            // A parameter list never contains these.
            return None;
        }
    }
    None
}

/// Split the tokens between a signature's parentheses into parameters.
fn parse_parameters(tokens: &[&Token]) -> SmallVec<[Parameter; 4]> {
    let mut chunks: Vec<&[&Token]> = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, token) in tokens.iter().enumerate() {
        if token.is_symbol("(") || token.is_symbol("[") {
            depth += 1;
        } else if token.is_symbol(")") || token.is_symbol("]") {
            depth = depth.saturating_sub(1);
        } else if token.is_symbol(",") && depth == 0 {
            chunks.push(&tokens[start..i]);
            start = i + 1;
        }
    }
    if start < tokens.len() {
        chunks.push(&tokens[start..]);
    }

    if chunks.len() == 1 && chunks[0].len() == 1 && chunks[0][0].is_keyword("void") {
        return SmallVec::new();
    }

    chunks
        .into_iter()
        .filter(|chunk| !chunk.is_empty())
        .map(parse_parameter)
        .collect()
}

fn parse_parameter(chunk: &[&Token]) -> Parameter {
    // Function pointer: `ret (*name)(args)`
    if let Some(pos) = chunk
        .windows(3)
        .position(|w| w[0].is_symbol("(") && w[1].is_symbol("*") && w[2].kind == TokenKind::Identifier)
    {
        let name = chunk[pos + 2].text.clone();
        let without_name: Vec<&Token> = chunk
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != pos + 2)
            .map(|(_, t)| *t)
            .collect();
        return Parameter {
            ty: join_tokens(&without_name),
            name: Some(name),
        };
    }

    // Array: `type name[N]`
    if let Some(bracket) = chunk.iter().position(|t| t.is_symbol("[")) {
        if bracket >= 2 && chunk[bracket - 1].kind == TokenKind::Identifier {
            let mut ty: Vec<&Token> = chunk[..bracket - 1].to_vec();
            ty.extend_from_slice(&chunk[bracket..]);
            return Parameter {
                ty: join_tokens(&ty),
                name: Some(chunk[bracket - 1].text.clone()),
            };
        }
    }

    match chunk.split_last() {
        // `struct tag` alone is a type, not a named parameter.
        Some((last, rest))
            if last.kind == TokenKind::Identifier
                && rest.last().is_some_and(|t| !is_tag_keyword(t)) =>
        {
            Parameter {
                ty: join_tokens(rest),
                name: Some(last.text.clone()),
            }
        }
        _ => Parameter {
            ty: join_tokens(chunk),
            name: None,
        },
    }
}

fn is_tag_keyword(token: &Token) -> bool {
    token.is_keyword("struct") || token.is_keyword("enum") || token.is_keyword("union")
}

/// Render tokens as type text: `char *`, `int (*)(int)`, `const char *const`.
pub(crate) fn join_tokens(tokens: &[&Token]) -> String {
    let mut out = String::new();
    let mut prev: Option<&str> = None;

    for token in tokens {
        let text = token.text.as_str();
        if let Some(prev) = prev {
            if needs_space(prev, text) {
                out.push(' ');
            }
        }
        out.push_str(text);
        prev = Some(text);
    }

    out
}

fn needs_space(prev: &str, next: &str) -> bool {
    if matches!(prev, "(" | "[" | "*" | "&" | ".") {
        return false;
    }
    if matches!(next, ")" | "[" | "]" | "," | ".") {
        return false;
    }
    !(prev == ")" && next == "(")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::scan;

    fn functions(source: &str) -> Vec<FunctionInfo> {
        extract(&scan(source))
    }

    fn names(source: &str) -> Vec<String> {
        functions(source).into_iter().map(|f| f.name).collect()
    }

    #[test]
    fn test_definition_and_declaration() {
        let funcs = functions("int add(int a, int b);\nint add(int a, int b) { return a + b; }\n");
        assert_eq!(funcs.len(), 2);
        assert!(!funcs[0].is_definition);
        assert!(funcs[1].is_definition);
        assert_eq!(funcs[1].return_type, "int");
        assert_eq!(funcs[1].line_number, 2);
        assert_eq!(funcs[1].parameters.len(), 2);
        assert_eq!(funcs[1].parameters[0].ty, "int");
        assert_eq!(funcs[1].parameters[0].name.as_deref(), Some("a"));
    }

    #[test]
    fn test_calls_inside_bodies_are_ignored() {
        let source = r#"
void run(void) {
    int x = compute(1, 2);
    helper(x);
    if (x) { other(); }
}
"#;
        assert_eq!(names(source), ["run"]);
    }

    #[test]
    fn test_top_level_initializer_is_not_a_function() {
        assert!(names("int x = compute(3);\nstatic int table[] = { f(1), 2 };\n").is_empty());
    }

    #[test]
    fn test_static_flag_excluded_from_return_type() {
        let funcs = functions("static unsigned long hash(const char *s) { return 0; }");
        assert_eq!(funcs.len(), 1);
        assert!(funcs[0].is_static);
        assert_eq!(funcs[0].return_type, "unsigned long");
        assert_eq!(funcs[0].parameters[0].ty, "const char *");
        assert_eq!(funcs[0].parameters[0].name.as_deref(), Some("s"));
    }

    #[test]
    fn test_extern_and_inline_are_not_part_of_type() {
        let funcs = functions("extern int count(void);\ninline int twice(int v) { return v * 2; }");
        assert_eq!(funcs[0].return_type, "int");
        assert!(!funcs[0].is_static);
        assert_eq!(funcs[1].return_type, "int");
    }

    #[test]
    fn test_pointer_return_type() {
        let funcs = functions("char *dup_string(const char *src);\nstruct node **children(struct node *n);");
        assert_eq!(funcs[0].return_type, "char *");
        assert_eq!(funcs[1].return_type, "struct node **");
        assert_eq!(funcs[1].parameters[0].ty, "struct node *");
    }

    #[test]
    fn test_void_and_empty_parameter_lists() {
        let funcs = functions("int a(void);\nint b();\nvoid *c(void *p);");
        assert_eq!(funcs[0].parameter_count(), 0);
        assert_eq!(funcs[1].parameter_count(), 0);
        assert_eq!(funcs[2].parameter_count(), 1);
        assert_eq!(funcs[2].parameters[0].ty, "void *");
    }

    #[test]
    fn test_unnamed_parameters() {
        let funcs = functions("int add(int, int);\nvoid take(size_t);");
        assert_eq!(funcs[0].parameters.len(), 2);
        assert!(funcs[0].parameters.iter().all(|p| p.name.is_none()));
        assert_eq!(funcs[1].parameters[0].ty, "size_t");
        assert!(funcs[1].parameters[0].name.is_none());
    }

    #[test]
    fn test_function_pointer_parameter_is_one_parameter() {
        let funcs = functions("void sort(void *base, int (*compare)(const void *, const void *), int n);");
        let params = &funcs[0].parameters;
        assert_eq!(params.len(), 3);
        assert_eq!(params[1].name.as_deref(), Some("compare"));
        assert_eq!(params[1].ty, "int (*)(const void *, const void *)");
        assert_eq!(params[2].name.as_deref(), Some("n"));
    }

    #[test]
    fn test_array_and_variadic_parameters() {
        let funcs = functions("int sum(int values[], int n);\nint log_msg(const char *fmt, ...);");
        assert_eq!(funcs[0].parameters[0].name.as_deref(), Some("values"));
        assert_eq!(funcs[0].parameters[0].ty, "int[]");
        let variadic = &funcs[1].parameters[1];
        assert_eq!(variadic.ty, "...");
        assert!(variadic.name.is_none());
    }

    #[test]
    fn test_extern_c_block_is_transparent() {
        let source = "#ifdef __cplusplus\nextern \"C\" {\n#endif\nint api_init(void);\n#ifdef __cplusplus\n}\n#endif\n";
        assert_eq!(names(source), ["api_init"]);
    }

    #[test]
    fn test_per_declaration_linkage_spec() {
        let funcs = functions("extern \"C\" int foo(void);\nextern \"C\" static char *bar(int n) { return 0; }\n");
        assert_eq!(funcs.len(), 2);
        assert_eq!(funcs[0].name, "foo");
        assert_eq!(funcs[0].return_type, "int");
        assert!(!funcs[0].is_definition);
        assert_eq!(funcs[1].return_type, "char *");
        assert!(funcs[1].is_static);
    }

    #[test]
    fn test_stray_string_in_prefix_is_rejected() {
        assert!(functions("\"x\" int foo(void);").is_empty());
    }

    #[test]
    fn test_struct_members_and_typedefs_are_skipped() {
        let source = r#"
typedef int (*handler_t)(int);
typedef void callback(int);
struct ops {
    int (*open)(const char *path);
    void close(int fd);
};
int after(void);
"#;
        assert_eq!(names(source), ["after"]);
    }

    #[test]
    fn test_macro_invocations_without_type_are_skipped() {
        assert_eq!(names("DEFINE_THING(foo)\nTEST(bar) { }\nint real(void);"), ["real"]);
    }

    #[test]
    fn test_multiline_signature() {
        let funcs = functions("static int\nparse_args(int argc,\n           char **argv)\n{\n}\n");
        assert_eq!(funcs.len(), 1);
        assert_eq!(funcs[0].line_number, 2);
        assert_eq!(funcs[0].parameters[1].ty, "char **");
    }

    #[test]
    fn test_duplicate_names_are_kept() {
        let source = "#ifdef A\nint f(void);\n#else\nint f(void);\n#endif\n";
        assert_eq!(names(source), ["f", "f"]);
    }

    #[test]
    fn test_unbalanced_input_does_not_panic() {
        let _ = functions("int broken(int a, { } ) ; }}} int x(");
        let _ = functions(")))(((");
        let _ = functions("");
    }

    #[test]
    fn test_documentation_attached() {
        let source = "/* Adds numbers. */\nint add(int a, int b);\n\n\n\n\n/* far away */\n\n\n\n\nint sub(int a, int b);";
        let funcs = functions(source);
        assert!(funcs[0].has_documentation);
        assert_eq!(funcs[0].documentation_text.as_deref(), Some("/* Adds numbers. */"));
        assert!(!funcs[1].has_documentation);
    }

    #[test]
    fn test_signature_rendering() {
        let funcs = functions("char *copy(char *dst, const char *src, size_t n);\nint none(void);");
        assert_eq!(funcs[0].signature(), "char * copy(char *dst, const char *src, size_t n)");
        assert_eq!(funcs[1].signature(), "int none(void)");
    }
}
