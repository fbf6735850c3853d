//! Lossless Java lexer.
//!
//! Every byte of the input ends up in exactly one token, so concatenating the token
//! texts reproduces the input. Whitespace runs never extend past a line break.

use crate::syntax_kind::SyntaxKind;
use crate::TextRange;
use text_size::TextSize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub range: TextRange,
}

impl Token {
    pub fn text<'a>(&self, input: &'a str) -> &'a str {
        &input[self.range]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub range: TextRange,
}

pub fn lex(input: &str) -> Vec<Token> {
    lex_with_errors(input).0
}

pub fn lex_with_errors(input: &str) -> (Vec<Token>, Vec<LexError>) {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token() {
        tokens.push(token);
    }
    (tokens, lexer.errors)
}

pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            errors: Vec::new(),
        }
    }

    pub fn next_token(&mut self) -> Option<Token> {
        let start = self.pos;
        let c = self.peek()?;

        let kind = match c {
            ' ' | '\t' | '\x0C' | '\n' | '\r' => self.lex_whitespace(),
            '/' if self.peek_nth(1) == Some('/') => self.lex_line_comment(),
            '/' if self.peek_nth(1) == Some('*') => self.lex_block_comment(),
            '"' => self.lex_quoted('"', SyntaxKind::StringLiteral, "unterminated string literal"),
            '\'' => self.lex_quoted('\'', SyntaxKind::CharLiteral, "unterminated character literal"),
            '0'..='9' => self.lex_number(),
            '.' if self.peek_nth(1).map_or(false, |c| c.is_ascii_digit()) => self.lex_number(),
            c if is_ident_start(c) => self.lex_identifier(),
            _ => self.lex_punctuation(),
        };

        Some(Token {
            kind,
            range: TextRange::new(offset(start), offset(self.pos)),
        })
    }

    fn lex_whitespace(&mut self) -> SyntaxKind {
        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' | '\x0C' => self.bump(),
                '\n' => {
                    self.bump();
                    break;
                }
                '\r' => {
                    self.bump();
                    if self.peek() == Some('\n') {
                        self.bump();
                    }
                    break;
                }
                _ => break,
            }
        }
        SyntaxKind::Whitespace
    }

    fn lex_line_comment(&mut self) -> SyntaxKind {
        while let Some(c) = self.peek() {
            if c == '\n' || c == '\r' {
                break;
            }
            self.bump();
        }
        SyntaxKind::LineComment
    }

    fn lex_block_comment(&mut self) -> SyntaxKind {
        let start = self.pos;
        let is_doc = self.rest().starts_with("/**") && !self.rest().starts_with("/**/");
        self.pos += 2;
        loop {
            if self.rest().starts_with("*/") {
                self.pos += 2;
                break;
            }
            if self.peek().is_none() {
                self.error(start, "unterminated block comment");
                break;
            }
            self.bump();
        }
        if is_doc {
            SyntaxKind::DocComment
        } else {
            SyntaxKind::BlockComment
        }
    }

    /// String and character literals. An unterminated literal stops at the end of the
    /// line and keeps its literal kind.
    fn lex_quoted(&mut self, quote: char, kind: SyntaxKind, message: &str) -> SyntaxKind {
        let start = self.pos;
        self.bump();
        loop {
            match self.peek() {
                Some(c) if c == quote => {
                    self.bump();
                    break;
                }
                Some('\\') => {
                    self.bump();
                    if matches!(self.peek(), Some(c) if c != '\n' && c != '\r') {
                        self.bump();
                    }
                }
                Some('\n') | Some('\r') | None => {
                    self.error(start, message);
                    break;
                }
                Some(_) => self.bump(),
            }
        }
        kind
    }

    fn lex_number(&mut self) -> SyntaxKind {
        let mut is_floating = false;

        if self.peek() == Some('0') && matches!(self.peek_nth(1), Some('x' | 'X' | 'b' | 'B')) {
            self.pos += 2;
            while self
                .peek()
                .map_or(false, |c| c.is_ascii_hexdigit() || c == '_')
            {
                self.bump();
            }
        } else {
            self.eat_digits();
            if self.peek() == Some('.') && self.peek_nth(1).map_or(true, |c| c.is_ascii_digit() || !is_ident_start(c)) {
                is_floating = true;
                self.bump();
                self.eat_digits();
            }
            if matches!(self.peek(), Some('e' | 'E')) {
                is_floating = true;
                self.bump();
                if matches!(self.peek(), Some('+' | '-')) {
                    self.bump();
                }
                self.eat_digits();
            }
        }

        match self.peek() {
            Some('l' | 'L') => {
                self.bump();
                SyntaxKind::LongLiteral
            }
            Some('f' | 'F') => {
                self.bump();
                SyntaxKind::FloatLiteral
            }
            Some('d' | 'D') => {
                self.bump();
                SyntaxKind::DoubleLiteral
            }
            _ if is_floating => SyntaxKind::DoubleLiteral,
            _ => SyntaxKind::IntLiteral,
        }
    }

    fn eat_digits(&mut self) {
        while self.peek().map_or(false, |c| c.is_ascii_digit() || c == '_') {
            self.bump();
        }
    }

    fn lex_identifier(&mut self) -> SyntaxKind {
        let start = self.pos;
        while self.peek().map_or(false, is_ident_continue) {
            self.bump();
        }
        SyntaxKind::from_keyword(&self.input[start..self.pos]).unwrap_or(SyntaxKind::Identifier)
    }

    fn lex_punctuation(&mut self) -> SyntaxKind {
        const OPERATORS: &[(&str, SyntaxKind)] = &[
            (">>>=", SyntaxKind::UnsignedRightShiftEq),
            (">>>", SyntaxKind::UnsignedRightShift),
            (">>=", SyntaxKind::RightShiftEq),
            ("<<=", SyntaxKind::LeftShiftEq),
            ("...", SyntaxKind::Ellipsis),
            (">>", SyntaxKind::RightShift),
            ("<<", SyntaxKind::LeftShift),
            (">=", SyntaxKind::GreaterEq),
            ("<=", SyntaxKind::LessEq),
            ("==", SyntaxKind::EqEq),
            ("!=", SyntaxKind::BangEq),
            ("->", SyntaxKind::Arrow),
            ("::", SyntaxKind::DoubleColon),
            ("++", SyntaxKind::PlusPlus),
            ("--", SyntaxKind::MinusMinus),
            ("&&", SyntaxKind::AmpAmp),
            ("||", SyntaxKind::PipePipe),
            ("+=", SyntaxKind::PlusEq),
            ("-=", SyntaxKind::MinusEq),
            ("*=", SyntaxKind::StarEq),
            ("/=", SyntaxKind::SlashEq),
            ("%=", SyntaxKind::PercentEq),
            ("&=", SyntaxKind::AmpEq),
            ("|=", SyntaxKind::PipeEq),
            ("^=", SyntaxKind::CaretEq),
            ("(", SyntaxKind::LParen),
            (")", SyntaxKind::RParen),
            ("{", SyntaxKind::LBrace),
            ("}", SyntaxKind::RBrace),
            ("[", SyntaxKind::LBracket),
            ("]", SyntaxKind::RBracket),
            (";", SyntaxKind::Semicolon),
            (",", SyntaxKind::Comma),
            (".", SyntaxKind::Dot),
            ("@", SyntaxKind::At),
            ("?", SyntaxKind::Question),
            (":", SyntaxKind::Colon),
            ("=", SyntaxKind::Eq),
            ("!", SyntaxKind::Bang),
            ("~", SyntaxKind::Tilde),
            ("<", SyntaxKind::Less),
            (">", SyntaxKind::Greater),
            ("+", SyntaxKind::Plus),
            ("-", SyntaxKind::Minus),
            ("*", SyntaxKind::Star),
            ("/", SyntaxKind::Slash),
            ("%", SyntaxKind::Percent),
            ("&", SyntaxKind::Amp),
            ("|", SyntaxKind::Pipe),
            ("^", SyntaxKind::Caret),
        ];

        for (text, kind) in OPERATORS {
            if self.rest().starts_with(text) {
                self.pos += text.len();
                return *kind;
            }
        }

        let start = self.pos;
        self.bump();
        self.error(start, "unexpected character");
        SyntaxKind::Error
    }

    fn error(&mut self, start: usize, message: &str) {
        self.errors.push(LexError {
            message: message.to_string(),
            range: TextRange::new(offset(start), offset(self.pos)),
        });
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }
}

fn offset(pos: usize) -> TextSize {
    TextSize::from(pos as u32)
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
