//! A C++-flavoured tokeniser.
//!
//! Classifies comments, keywords, operators, identifiers, numeric and
//! string literals, brackets, punctuation, and preprocessor directives.
//! Block comments and line-continued directives span lines within a
//! single `read_next_token` call; callers slice the returned span per
//! line as needed.

use quill_document::CharCursor;

use crate::style::{catppuccin, Colour};
use crate::tokeniser::Tokeniser;

/// Scanner for C and C++ source.
#[derive(Debug, Default, Clone, Copy)]
pub struct CppTokeniser;

impl CppTokeniser {
    pub const ERROR: usize = 0;
    pub const COMMENT: usize = 1;
    pub const KEYWORD: usize = 2;
    pub const OPERATOR: usize = 3;
    pub const IDENTIFIER: usize = 4;
    pub const INTEGER: usize = 5;
    pub const FLOAT: usize = 6;
    pub const STRING: usize = 7;
    pub const BRACKET: usize = 8;
    pub const PUNCTUATION: usize = 9;
    pub const PREPROCESSOR: usize = 10;

    const TYPE_COUNT: usize = 11;
}

impl Tokeniser for CppTokeniser {
    fn read_next_token(&self, cursor: &mut CharCursor<'_>) -> usize {
        cursor.skip_whitespace();
        let Some(first) = cursor.peek() else {
            return Self::ERROR;
        };
        match first {
            '0'..='9' => read_number(cursor),
            '.' => {
                let mut ahead = cursor.clone();
                ahead.next();
                if ahead.peek().is_some_and(|c| c.is_ascii_digit()) {
                    read_number(cursor)
                } else {
                    cursor.next();
                    Self::PUNCTUATION
                }
            }
            '"' | '\'' => {
                skip_quoted(cursor, first);
                Self::STRING
            }
            '/' => {
                cursor.next();
                match cursor.peek() {
                    Some('/') => {
                        cursor.skip_to_end_of_line();
                        Self::COMMENT
                    }
                    Some('*') => {
                        cursor.next();
                        skip_block_comment(cursor);
                        Self::COMMENT
                    }
                    Some('=') => {
                        cursor.next();
                        Self::OPERATOR
                    }
                    _ => Self::OPERATOR,
                }
            }
            '#' => {
                read_preprocessor(cursor);
                Self::PREPROCESSOR
            }
            '{' | '}' | '(' | ')' | '[' | ']' => {
                cursor.next();
                Self::BRACKET
            }
            ';' | ',' => {
                cursor.next();
                Self::PUNCTUATION
            }
            ':' => {
                cursor.next();
                if cursor.peek() == Some(':') {
                    cursor.next();
                    Self::OPERATOR
                } else {
                    Self::PUNCTUATION
                }
            }
            '+' | '-' | '*' | '%' | '=' | '!' | '&' | '|' | '^' | '<' | '>' | '~' | '?' => {
                read_operator(cursor, first)
            }
            c if is_identifier_start(c) => read_identifier(cursor),
            _ => {
                cursor.next();
                Self::ERROR
            }
        }
    }

    fn token_type_count(&self) -> usize {
        Self::TYPE_COUNT
    }

    fn default_colour_for_type(&self, token_type: usize) -> Colour {
        match token_type {
            Self::COMMENT => catppuccin::OVERLAY,
            Self::KEYWORD => catppuccin::MAUVE,
            Self::OPERATOR => catppuccin::TEAL,
            Self::IDENTIFIER => catppuccin::TEXT,
            Self::INTEGER | Self::FLOAT => catppuccin::PEACH,
            Self::STRING => catppuccin::GREEN,
            Self::BRACKET => catppuccin::YELLOW,
            Self::PUNCTUATION => catppuccin::SAPPHIRE,
            Self::PREPROCESSOR => catppuccin::BLUE,
            _ => catppuccin::RED,
        }
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_identifier_body(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn read_identifier(cursor: &mut CharCursor<'_>) -> usize {
    let mut word = String::new();
    while cursor.peek().is_some_and(is_identifier_body) {
        if let Some(c) = cursor.next() {
            word.push(c);
        }
    }
    if is_reserved_keyword(&word) {
        CppTokeniser::KEYWORD
    } else {
        CppTokeniser::IDENTIFIER
    }
}

fn read_operator(cursor: &mut CharCursor<'_>, first: char) -> usize {
    cursor.next();
    match (first, cursor.peek()) {
        ('+', Some('+')) | ('-', Some('-')) | ('&', Some('&')) | ('|', Some('|')) => {
            cursor.next();
        }
        ('-', Some('>')) => {
            cursor.next();
        }
        ('<', Some('<')) | ('>', Some('>')) => {
            cursor.next();
            if cursor.peek() == Some('=') {
                cursor.next();
            }
        }
        (_, Some('=')) if first != '~' && first != '?' => {
            cursor.next();
        }
        _ => {}
    }
    CppTokeniser::OPERATOR
}

fn read_number(cursor: &mut CharCursor<'_>) -> usize {
    if cursor.peek() == Some('0') {
        let mut ahead = cursor.clone();
        ahead.next();
        match ahead.peek() {
            Some('x' | 'X') => {
                cursor.skip(2);
                while cursor.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                    cursor.next();
                }
                skip_integer_suffix(cursor);
                return CppTokeniser::INTEGER;
            }
            Some(c) if c.is_digit(8) => {
                cursor.skip(1);
                while cursor.peek().is_some_and(|c| c.is_digit(8)) {
                    cursor.next();
                }
                skip_integer_suffix(cursor);
                return CppTokeniser::INTEGER;
            }
            _ => {}
        }
    }
    let mut is_float = false;
    while cursor.peek().is_some_and(|c| c.is_ascii_digit()) {
        cursor.next();
    }
    if cursor.peek() == Some('.') {
        is_float = true;
        cursor.next();
        while cursor.peek().is_some_and(|c| c.is_ascii_digit()) {
            cursor.next();
        }
    }
    if matches!(cursor.peek(), Some('e' | 'E')) && exponent_follows(cursor) {
        is_float = true;
        cursor.next();
        if matches!(cursor.peek(), Some('+' | '-')) {
            cursor.next();
        }
        while cursor.peek().is_some_and(|c| c.is_ascii_digit()) {
            cursor.next();
        }
    }
    if matches!(cursor.peek(), Some('f' | 'F')) {
        cursor.next();
        is_float = true;
    } else if !is_float {
        skip_integer_suffix(cursor);
    }
    if is_float {
        CppTokeniser::FLOAT
    } else {
        CppTokeniser::INTEGER
    }
}

/// True when the cursor rests on `e`/`E` introducing a real exponent
/// (optionally signed, at least one digit) rather than a suffix.
fn exponent_follows(cursor: &CharCursor<'_>) -> bool {
    let mut ahead = cursor.clone();
    ahead.next();
    if matches!(ahead.peek(), Some('+' | '-')) {
        ahead.next();
    }
    ahead.peek().is_some_and(|c| c.is_ascii_digit())
}

fn skip_integer_suffix(cursor: &mut CharCursor<'_>) {
    while matches!(cursor.peek(), Some('u' | 'U' | 'l' | 'L')) {
        cursor.next();
    }
}

/// Consumes a quoted literal, honouring backslash escapes. An
/// unterminated literal runs to end of input.
fn skip_quoted(cursor: &mut CharCursor<'_>, quote: char) {
    cursor.next();
    while let Some(c) = cursor.next() {
        if c == quote {
            break;
        }
        if c == '\\' {
            cursor.next();
        }
    }
}

fn skip_block_comment(cursor: &mut CharCursor<'_>) {
    let mut prev = ' ';
    while let Some(c) = cursor.next() {
        if prev == '*' && c == '/' {
            break;
        }
        prev = c;
    }
}

/// Consumes a `#` directive through its end of line, following
/// backslash-newline continuations onto the next line.
fn read_preprocessor(cursor: &mut CharCursor<'_>) {
    cursor.next();
    while let Some(c) = cursor.peek() {
        match c {
            '\\' => {
                cursor.next();
                if matches!(cursor.peek(), Some('\n' | '\r')) {
                    skip_line_terminator(cursor);
                }
            }
            '\n' | '\r' => {
                skip_line_terminator(cursor);
                break;
            }
            _ => {
                cursor.next();
            }
        }
    }
}

fn skip_line_terminator(cursor: &mut CharCursor<'_>) {
    if cursor.next() == Some('\r') && cursor.peek() == Some('\n') {
        cursor.next();
    }
}

fn is_reserved_keyword(word: &str) -> bool {
    // Each bucket is sorted for binary search.
    let bucket: &[&str] = match word.len() {
        2 => &["do", "if", "or"],
        3 => &["and", "asm", "for", "int", "new", "not", "try", "xor"],
        4 => &[
            "auto", "bool", "case", "char", "else", "enum", "goto", "long", "this", "true", "void",
        ],
        5 => &[
            "break", "catch", "class", "compl", "const", "false", "float", "short", "throw",
            "union", "using", "while",
        ],
        6 => &[
            "bitand", "bitor", "delete", "double", "export", "extern", "friend", "inline",
            "not_eq", "public", "return", "signed", "sizeof", "static", "struct", "switch",
            "typeid",
        ],
        7 => &[
            "alignas", "alignof", "and_eq", "char8_t", "concept", "default", "mutable", "nullptr",
            "private", "typedef", "virtual", "wchar_t", "xor_eq",
        ],
        8 => &[
            "char16_t", "char32_t", "co_await", "co_yield", "continue", "decltype", "explicit",
            "noexcept", "operator", "register", "requires", "template", "typename", "unsigned",
            "volatile",
        ],
        9 => &[
            "co_return", "consteval", "constexpr", "constinit", "namespace", "protected",
        ],
        10 => &["const_cast"],
        11 => &["static_cast"],
        12 => &["dynamic_cast", "thread_local"],
        13 => &["static_assert"],
        16 => &["reinterpret_cast"],
        _ => return false,
    };
    bucket.binary_search(&word).is_ok()
}
