use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::Chars;
use lazy_static::lazy_static;
use thiserror::Error;
use tracing::{debug, trace, warn};
use crate::util;

#[cfg(test)]
mod tests;

lazy_static! {
    static ref DEFAULT_KEYWORDS: HashMap<&'static str, TokenType> = HashMap::from([
        ("lit", TokenType::Lit),
        ("say", TokenType::Say),
        ("vibe", TokenType::Vibe),
        ("yap", TokenType::Yap),
        ("spill", TokenType::Spill),
        ("if", TokenType::If),
        ("else", TokenType::Else),

        // Reserved, no grammar production yet
        ("bet", TokenType::Bet),
        ("cap", TokenType::Cap),
        ("nocap", TokenType::Nocap),
        ("squad", TokenType::Squad),
        ("fam", TokenType::Fam),
        ("yes", TokenType::Yes),
        ("jawn", TokenType::Jawn),
    ]);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenPos {
    pub line: i32,
    pub column: i32,
}

impl TokenPos {
    pub fn new(line: i32, column: i32) -> TokenPos {
        TokenPos { line, column }
    }

    pub fn begin() -> TokenPos {
        TokenPos::new(1, 1)
    }
}

impl Display for TokenPos {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[line {} column {}]", self.line, self.column)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenType {
    ParenthesisLeft, ParenthesisRight,
    BracketLeft, BracketRight,
    Comma, Semicolon, Colon,

    Assign, Equal,
    NotEqual,
    Greater, GreaterEqual,
    Less, LessEqual,

    Plus, Minus,
    Multiply, Divide,

    Identifier,
    Number,
    String,

    // Keywords
    Lit, Say, Vibe, Yap, Spill,
    If, Else,
    Bet, Cap, Nocap, Squad, Fam, Yes, Jawn,

    // EOF
    Eof,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    token_type: TokenType,
    source: String,
    start: TokenPos, end: TokenPos,
}

impl Token {
    pub fn new(token_type: TokenType, source: String, start: TokenPos, end: TokenPos) -> Token {
        Token {
            token_type, source,
            start, end
        }
    }

    pub fn eof(pos: TokenPos) -> Token {
        Token::new(TokenType::Eof, String::new(), pos, pos)
    }

    pub fn token_type(&self) -> TokenType { self.token_type }
    pub fn source(&self) -> &str { &self.source }
    pub fn start(&self) -> &TokenPos { &self.start }
    pub fn end(&self) -> &TokenPos { &self.end }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.token_type {
            TokenType::Eof => f.write_str("Eof"),
            TokenType::String => write!(f, "`\"{}\"`", self.source),
            _ => write!(f, "`{}`", self.source),
        }
    }
}

/// Maps reserved words to their token types. Lookups are case-insensitive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeywordTable {
    keywords: HashMap<String, TokenType>,
}

impl KeywordTable {
    pub fn new<I, S>(keywords: I) -> KeywordTable
    where
        I: IntoIterator<Item = (S, TokenType)>,
        S: AsRef<str>,
    {
        KeywordTable {
            keywords: keywords.into_iter()
                .map(|(word, token_type)| (word.as_ref().to_lowercase(), token_type))
                .collect(),
        }
    }

    pub fn lookup(&self, word: &str) -> Option<TokenType> {
        self.keywords.get(&word.to_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

impl Default for KeywordTable {
    fn default() -> Self {
        KeywordTable::new(DEFAULT_KEYWORDS.iter().map(|(word, token_type)| (*word, *token_type)))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LexerOptions {
    /// Report characters that do not start any token instead of dropping them silently.
    pub strict: bool,
}

/// Problems found while scanning. These are collected, never raised; scanning
/// always runs to the end of the input.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LexerDiagnostic {
    #[error("{pos} Unterminated string: \"{text}\"")]
    UnterminatedString {
        pos: TokenPos,
        text: String,
    },
    #[error("{0} Unexpected character '{1}'")]
    UnexpectedCharacter(TokenPos, char),
}

pub struct Lexer<'source> {
    input: &'source str,
    keywords: KeywordTable,
    options: LexerOptions,

    chars: Chars<'source>,
    peek_1: Option<char>,
    peek_2: Option<char>,

    start_index: usize,
    current_index: usize,

    start_pos: TokenPos,
    current_pos: TokenPos,

    diagnostics: Vec<LexerDiagnostic>,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str) -> Lexer<'source> {
        Lexer::with_config(source, KeywordTable::default(), LexerOptions::default())
    }

    pub fn with_config(source: &'source str, keywords: KeywordTable, options: LexerOptions) -> Lexer<'source> {
        Lexer {
            input: source,
            keywords,
            options,

            chars: source.chars(),
            peek_1: None,
            peek_2: None,

            start_index: 0,
            current_index: 0,

            start_pos: TokenPos::begin(),
            current_pos: TokenPos::begin(),

            diagnostics: Vec::new(),
        }
    }

    /// Scans the whole input. The returned sequence always ends with exactly one `Eof` token.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            let token = self.scan_token();
            let eof = token.token_type() == TokenType::Eof;
            tokens.push(token);

            if eof {
                break;
            }
        }

        debug!(tokens = tokens.len(), diagnostics = self.diagnostics.len(), "tokenized source");
        tokens
    }

    pub fn diagnostics(&self) -> &[LexerDiagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<LexerDiagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn scan_token(&mut self) -> Token {
        loop {
            self.skip_whitespace_and_comments();
            self.start_index = self.current_index;
            self.start_pos = self.current_pos;

            let c = match self.consume() {
                Some(c) => c,
                None => return self.make_token(TokenType::Eof),
            };

            return match c {
                '(' => self.make_token(TokenType::ParenthesisLeft),
                ')' => self.make_token(TokenType::ParenthesisRight),
                '{' => self.make_token(TokenType::BracketLeft),
                '}' => self.make_token(TokenType::BracketRight),
                ',' => self.make_token(TokenType::Comma),
                ';' => self.make_token(TokenType::Semicolon),
                ':' => self.make_token(TokenType::Colon),

                '=' => if self.expect('=') { self.make_token(TokenType::Equal) } else {
                    self.make_token(TokenType::Assign)
                },
                '!' => if self.expect('=') { self.make_token(TokenType::NotEqual) } else {
                    self.unknown_character(c);
                    continue;
                },
                '>' => if self.expect('=') { self.make_token(TokenType::GreaterEqual) } else {
                    self.make_token(TokenType::Greater)
                },
                '<' => if self.expect('=') { self.make_token(TokenType::LessEqual) } else {
                    self.make_token(TokenType::Less)
                },

                '+' => self.make_token(TokenType::Plus),
                '-' => self.make_token(TokenType::Minus),
                '*' => self.make_token(TokenType::Multiply),
                '/' => self.make_token(TokenType::Divide), // `//` never gets here

                '"' => self.scan_string(),
                c if util::is_numeric(c) => self.scan_number(),
                c if util::is_identifier_start(c) => self.scan_identifier(),

                _ => {
                    self.unknown_character(c);
                    continue;
                },
            };
        }
    }

    fn scan_string(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if c == '"' {
                break;
            }

            self.consume();
        }

        // Don't add leading and trailing '"' characters to token
        let text = self.input[(self.start_index + 1)..self.current_index].to_owned();

        if self.is_eof() {
            let diagnostic = LexerDiagnostic::UnterminatedString { pos: self.start_pos, text: text.clone() };
            warn!("{}", diagnostic);
            self.diagnostics.push(diagnostic);
        } else {
            self.consume(); // the trailing '"'
        }

        Token {
            token_type: TokenType::String,
            source: text,
            start: self.start_pos, end: self.current_pos,
        }
    }

    fn scan_number(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if !util::is_numeric(c) {
                break;
            }

            self.consume();
        }

        self.make_token(TokenType::Number)
    }

    fn scan_identifier(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if !util::is_identifier_part(c) {
                break;
            }

            self.consume();
        }

        let name = &self.input[self.start_index..self.current_index];
        let token_type = self.keywords.lookup(name).unwrap_or(TokenType::Identifier);

        Token { source: name.to_owned(), token_type, start: self.start_pos, end: self.current_pos }
    }

    fn unknown_character(&mut self, c: char) {
        if self.options.strict {
            let diagnostic = LexerDiagnostic::UnexpectedCharacter(self.start_pos, c);
            warn!("{}", diagnostic);
            self.diagnostics.push(diagnostic);
        } else {
            trace!(pos = %self.start_pos, character = ?c, "skipping unknown character");
        }
    }

    fn make_token(&self, token_type: TokenType) -> Token {
        Token {
            token_type,
            source: self.input[self.start_index..self.current_index].to_owned(),

            start: self.start_pos, end: self.current_pos,
        }
    }

    fn consume(&mut self) -> Option<char> {
        let c = if let Some(c) = self.peek_1.take() {
            self.peek_1 = self.peek_2.take();
            c
        } else {
            self.chars.next()?
        };

        self.current_index += c.len_utf8();

        if c == '\n' {
            self.current_pos.line += 1;
            self.current_pos.column = 1;
        } else {
            self.current_pos.column += 1;
        }

        Some(c)
    }

    fn peek(&mut self) -> Option<char> {
        if self.peek_1.is_none() {
            self.peek_1 = self.chars.next();
        }

        self.peek_1
    }

    fn peek_next(&mut self) -> Option<char> {
        self.peek()?;

        if self.peek_2.is_none() {
            self.peek_2 = self.chars.next();
        }

        self.peek_2
    }

    fn expect(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.consume();
            true
        } else {
            false
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(c) = self.peek() {
            if util::is_blank(c) || c == '\n' {
                self.consume();
            } else if c == '/' && self.peek_next() == Some('/') {
                self.skip_line();
            } else {
                return;
            }
        }
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.consume() {
            if c == '\n' {
                return;
            }
        }
    }

    fn is_eof(&mut self) -> bool {
        self.peek().is_none()
    }
}

/// Scans `source` with the default keyword table and options.
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).tokenize()
}
