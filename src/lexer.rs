//! Lexical scanner for C-family source text.
//!
//! Turns raw source into a flat [`Token`] stream in strict source order.
//! Unlike a compiler front end, the scanner keeps comments, newlines and
//! preprocessor lines as tokens: the documentation checks need to know where
//! comments sit relative to function signatures.
//!
//! Scanning never fails. Anything the scanner cannot classify becomes an
//! [`TokenKind::Unknown`] token and scanning continues; unterminated comments
//! and literals close at end of input.

use std::fmt;

use serde::Serialize;

/// Classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenKind {
    Identifier,
    Keyword,
    Number,
    StringLiteral,
    CharLiteral,
    LineComment,
    BlockComment,
    /// A whole `#...` line, up to but excluding the newline.
    Preprocessor,
    Operator,
    Punctuation,
    Newline,
    Eof,
    Unknown,
}

impl TokenKind {
    /// Comments of either form.
    pub fn is_comment(self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::BlockComment)
    }

    /// Tokens that carry program structure (no comments, newlines,
    /// preprocessor lines or end-of-file).
    pub fn is_significant(self) -> bool {
        !matches!(
            self,
            TokenKind::LineComment
                | TokenKind::BlockComment
                | TokenKind::Preprocessor
                | TokenKind::Newline
                | TokenKind::Eof
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Keyword => "keyword",
            TokenKind::Number => "number",
            TokenKind::StringLiteral => "string-literal",
            TokenKind::CharLiteral => "char-literal",
            TokenKind::LineComment => "line-comment",
            TokenKind::BlockComment => "block-comment",
            TokenKind::Preprocessor => "preprocessor-directive",
            TokenKind::Operator => "operator",
            TokenKind::Punctuation => "punctuation",
            TokenKind::Newline => "newline",
            TokenKind::Eof => "end-of-file",
            TokenKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// A classified lexeme with its 1-based starting position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Exact source text. Block comments keep their embedded newlines.
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            column,
        }
    }

    /// Line of the token's last character.
    ///
    /// Only block comments (and literals continued with a backslash) span
    /// lines, so this is the start line plus the embedded newline count.
    pub fn end_line(&self) -> usize {
        self.line + bytecount::count(self.text.as_bytes(), b'\n')
    }

    /// True for an operator or punctuation token with exactly this text.
    pub fn is_symbol(&self, symbol: &str) -> bool {
        matches!(self.kind, TokenKind::Operator | TokenKind::Punctuation) && self.text == symbol
    }

    /// True for a keyword token with exactly this text.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == keyword
    }
}

/// C keywords (C89 through C11). Tagging only; lexing never depends on them.
const KEYWORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef",
    "union", "unsigned", "void", "volatile", "while", "_Alignas", "_Alignof", "_Atomic",
    "_Bool", "_Complex", "_Generic", "_Imaginary", "_Noreturn", "_Static_assert",
    "_Thread_local",
];

/// Two-character operators, checked before single characters.
const TWO_CHAR_OPERATORS: &[&str] = &[
    "==", "!=", "<=", ">=", "&&", "||", "++", "--", "<<", ">>", "+=", "-=", "*=", "/=", "%=",
    "&=", "|=", "^=", "->",
];

const OPERATOR_CHARS: &str = "+-*/%=<>!&|^~?:.#";
const PUNCTUATION_CHARS: &str = "(){}[];,";

/// Returns true if `word` is a C keyword.
pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

/// Scan source text into tokens.
///
/// The result always ends with a single [`TokenKind::Eof`] token.
///
/// # Examples
///
/// ```
/// use doclint::lexer::{scan, TokenKind};
///
/// let tokens = scan("a->b");
/// let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
/// assert_eq!(
///     kinds,
///     [TokenKind::Identifier, TokenKind::Operator, TokenKind::Identifier, TokenKind::Eof]
/// );
/// assert_eq!(tokens[1].text, "->");
/// ```
pub fn scan(source: &str) -> Vec<Token> {
    Lexer::new(source).tokenize()
}

/// Single-pass scanner state.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    /// No token other than whitespace has been seen on the current line.
    at_line_start: bool,
}

impl Lexer {
    /// Create a lexer over the given source.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            at_line_start: true,
        }
    }

    /// Tokenize the entire input.
    pub fn tokenize(mut self) -> Vec<Token> {
        // Roughly one token per five characters of C.
        let mut tokens = Vec::with_capacity(self.input.len() / 5 + 1);

        while let Some(ch) = self.peek() {
            if ch == '\n' {
                tokens.push(Token::new(TokenKind::Newline, "\n", self.line, self.column));
                self.advance();
                self.at_line_start = true;
                continue;
            }

            if ch.is_whitespace() {
                self.advance();
                continue;
            }

            let token = self.next_token(ch);
            // A leading comment does not end the line's directive position.
            if !token.kind.is_comment() {
                self.at_line_start = false;
            }
            tokens.push(token);
        }

        tokens.push(Token::new(TokenKind::Eof, "", self.line, self.column));
        tokens
    }

    /// Scan one token starting at `ch`, which has not been consumed yet.
    fn next_token(&mut self, ch: char) -> Token {
        let next = self.peek_ahead(1);

        match ch {
            '/' if next == Some('/') => self.line_comment(),
            '/' if next == Some('*') => self.block_comment(),
            '#' if self.at_line_start => self.preprocessor_line(),
            '"' => self.quoted(TokenKind::StringLiteral, '"'),
            '\'' => self.quoted(TokenKind::CharLiteral, '\''),
            '0'..='9' => self.number(),
            '.' if next.is_some_and(|c| c.is_ascii_digit()) => self.number(),
            'a'..='z' | 'A'..='Z' | '_' => self.identifier_or_keyword(),
            _ => self.operator_or_punctuation(ch),
        }
    }

    /// `//` through end of line, newline excluded.
    fn line_comment(&mut self) -> Token {
        let (line, column) = self.current_location();
        let text = self.take_while(|c| c != '\n');
        Token::new(TokenKind::LineComment, text, line, column)
    }

    /// `/*` through the first `*/`, or through end of input.
    fn block_comment(&mut self) -> Token {
        let (line, column) = self.current_location();
        let mut text = String::new();
        self.push_advance(&mut text); // '/'
        self.push_advance(&mut text); // '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.push_advance(&mut text);
                self.push_advance(&mut text);
                break;
            }
            self.push_advance(&mut text);
        }

        Token::new(TokenKind::BlockComment, text, line, column)
    }

    /// A directive line. Backslash continuations are not folded.
    fn preprocessor_line(&mut self) -> Token {
        let (line, column) = self.current_location();
        let text = self.take_while(|c| c != '\n');
        Token::new(TokenKind::Preprocessor, text.trim_end().to_string(), line, column)
    }

    /// String or char literal including both quotes.
    ///
    /// Closes at the matching quote, before an unescaped newline, or at end of
    /// input, whichever comes first.
    fn quoted(&mut self, kind: TokenKind, quote: char) -> Token {
        let (line, column) = self.current_location();
        let mut text = String::new();
        self.push_advance(&mut text);

        while let Some(ch) = self.peek() {
            match ch {
                '\\' => {
                    self.push_advance(&mut text);
                    if !self.is_at_end() {
                        self.push_advance(&mut text);
                    }
                }
                '\n' => break,
                c if c == quote => {
                    self.push_advance(&mut text);
                    break;
                }
                _ => self.push_advance(&mut text),
            }
        }

        Token::new(kind, text, line, column)
    }

    /// Hex or decimal number, with optional integer/float suffix letters.
    fn number(&mut self) -> Token {
        let (line, column) = self.current_location();
        let mut text = String::new();

        let is_hex = self.peek() == Some('0')
            && matches!(self.peek_ahead(1), Some('x') | Some('X'))
            && self.peek_ahead(2).is_some_and(|c| c.is_ascii_hexdigit());

        if is_hex {
            self.push_advance(&mut text);
            self.push_advance(&mut text);
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.push_advance(&mut text);
            }
        } else {
            let mut seen_dot = false;
            while let Some(ch) = self.peek() {
                if ch.is_ascii_digit() {
                    self.push_advance(&mut text);
                } else if ch == '.' && !seen_dot {
                    seen_dot = true;
                    self.push_advance(&mut text);
                } else {
                    break;
                }
            }

            // Exponent only when it is well formed: e[+-]?digit
            if matches!(self.peek(), Some('e') | Some('E')) {
                let first = self.peek_ahead(1);
                let well_formed = match first {
                    Some(c) if c.is_ascii_digit() => true,
                    Some('+') | Some('-') => self.peek_ahead(2).is_some_and(|c| c.is_ascii_digit()),
                    _ => false,
                };
                if well_formed {
                    self.push_advance(&mut text);
                    if matches!(self.peek(), Some('+') | Some('-')) {
                        self.push_advance(&mut text);
                    }
                    while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                        self.push_advance(&mut text);
                    }
                }
            }
        }

        while matches!(self.peek(), Some('u' | 'U' | 'l' | 'L' | 'f' | 'F')) {
            self.push_advance(&mut text);
        }

        Token::new(TokenKind::Number, text, line, column)
    }

    fn identifier_or_keyword(&mut self) -> Token {
        let (line, column) = self.current_location();
        let text = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let kind = if is_keyword(&text) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        Token::new(kind, text, line, column)
    }

    fn operator_or_punctuation(&mut self, ch: char) -> Token {
        let (line, column) = self.current_location();

        if let Some(next) = self.peek_ahead(1) {
            let pair: String = [ch, next].iter().collect();
            if TWO_CHAR_OPERATORS.contains(&pair.as_str()) {
                self.advance();
                self.advance();
                return Token::new(TokenKind::Operator, pair, line, column);
            }
        }

        self.advance();
        let kind = if OPERATOR_CHARS.contains(ch) {
            TokenKind::Operator
        } else if PUNCTUATION_CHARS.contains(ch) {
            TokenKind::Punctuation
        } else {
            TokenKind::Unknown
        };
        Token::new(kind, ch.to_string(), line, column)
    }

    /// Consume characters while `pred` holds and return them.
    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut text = String::new();
        while self.peek().is_some_and(&pred) {
            self.push_advance(&mut text);
        }
        text
    }

    /// Consume the current character into `text`.
    fn push_advance(&mut self, text: &mut String) {
        if let Some(ch) = self.advance() {
            text.push(ch);
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> (usize, usize) {
        (self.line, self.column)
    }
}
