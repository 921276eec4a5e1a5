// ABOUTME: Character stream to token stream, including string-terminator escape handling

use crate::ast::{Token, TokenKind};
use crate::error::NyxError;

pub struct Lexer {
    chars: Vec<char>,
    start: usize,
    current: usize,
    line: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer {
            chars: source.chars().collect(),
            start: 0,
            current: 0,
            line: 1,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, NyxError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            self.start = self.current;
            if self.is_at_end() {
                tokens.push(Token::new(TokenKind::Eof, "", self.line));
                break;
            }
            tokens.push(self.next_token()?);
        }
        Ok(tokens)
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.chars.len()
    }

    fn peek(&self) -> char {
        *self.chars.get(self.current).unwrap_or(&'\0')
    }

    fn peek_next(&self) -> char {
        *self.chars.get(self.current + 1).unwrap_or(&'\0')
    }

    fn advance(&mut self) -> char {
        let c = self.peek();
        self.current += 1;
        c
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.peek() != expected {
            return false;
        }
        self.current += 1;
        true
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                ' ' | '\t' | '\r' => {
                    self.current += 1;
                }
                '\n' => {
                    self.line += 1;
                    self.current += 1;
                }
                '/' if self.peek_next() == '/' => {
                    while !self.is_at_end() && self.peek() != '\n' {
                        self.current += 1;
                    }
                }
                _ => break,
            }
        }
    }

    fn make(&self, kind: TokenKind) -> Token {
        let lexeme: String = self.chars[self.start..self.current].iter().collect();
        Token::new(kind, lexeme, self.line)
    }

    fn next_token(&mut self) -> Result<Token, NyxError> {
        let c = self.advance();

        if c == '_' || c.is_alphabetic() {
            return Ok(self.identifier_or_keyword());
        }
        if c.is_ascii_digit() {
            return Ok(self.number());
        }
        if c == '"' {
            return self.string();
        }
        if c == '@' {
            return self.typedef_pseudo_identifier();
        }

        let kind = match c {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            ':' => TokenKind::Colon,
            '.' => TokenKind::Dot,
            '+' => {
                if self.match_char('+') {
                    TokenKind::PlusPlus
                } else {
                    TokenKind::Plus
                }
            }
            '-' => {
                if self.match_char('-') {
                    TokenKind::MinusMinus
                } else {
                    TokenKind::Minus
                }
            }
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '!' => {
                if self.match_char('=') {
                    TokenKind::BangEqual
                } else {
                    TokenKind::Bang
                }
            }
            '=' => {
                if self.match_char('=') {
                    TokenKind::EqualEqual
                } else {
                    TokenKind::Equal
                }
            }
            '<' => {
                if self.match_char('=') {
                    TokenKind::LessEqual
                } else {
                    TokenKind::Less
                }
            }
            '>' => {
                if self.match_char('=') {
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::Greater
                }
            }
            other => {
                return Err(NyxError::parser(
                    format!("Unexpected character '{other}'."),
                    self.line,
                ))
            }
        };
        Ok(self.make(kind))
    }

    fn identifier_or_keyword(&mut self) -> Token {
        while self.peek() == '_' || self.peek().is_alphanumeric() {
            self.current += 1;
        }
        let text: String = self.chars[self.start..self.current].iter().collect();
        let kind = match text.as_str() {
            "auto" => TokenKind::Auto,
            "output" => TokenKind::Output,
            "put" => TokenKind::Put,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "not" => TokenKind::Not,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "for" => TokenKind::For,
            "break" => TokenKind::Break,
            "continue" => TokenKind::Continue,
            "len" => TokenKind::Len,
            "func" => TokenKind::Func,
            "return" => TokenKind::Return,
            "import" => TokenKind::Import,
            "as" => TokenKind::As,
            _ => TokenKind::Identifier,
        };
        Token::new(kind, text, self.line)
    }

    /// `@Typedef` is matched greedily only when not followed by another
    /// identifier character.
    fn typedef_pseudo_identifier(&mut self) -> Result<Token, NyxError> {
        let rest = "Typedef";
        for expected in rest.chars() {
            if self.peek() != expected {
                return Err(NyxError::parser(
                    "Unexpected character '@'.".to_string(),
                    self.line,
                ));
            }
            self.current += 1;
        }
        if self.peek() == '_' || self.peek().is_alphanumeric() {
            return Err(NyxError::parser(
                "Unexpected character '@'.".to_string(),
                self.line,
            ));
        }
        Ok(self.make(TokenKind::Typedef))
    }

    fn number(&mut self) -> Token {
        while self.peek().is_ascii_digit() {
            self.current += 1;
        }
        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.current += 1;
            while self.peek().is_ascii_digit() {
                self.current += 1;
            }
        }
        self.make(TokenKind::Number)
    }

    /// Scans until the next unescaped `"`. Only `\"` and `\\` are resolved
    /// here (so the terminator isn't mistaken); every other backslash
    /// sequence is preserved verbatim in the lexeme and resolved later at
    /// `output`/`put` emission time.
    fn string(&mut self) -> Result<Token, NyxError> {
        let start_line = self.line;
        let mut value = String::new();
        loop {
            if self.is_at_end() {
                return Err(NyxError::parser("Unterminated string.", start_line));
            }
            let c = self.advance();
            if c == '"' {
                break;
            }
            if c == '\n' {
                self.line += 1;
            }
            if c == '\\' && !self.is_at_end() {
                let next = self.peek();
                if next == '"' {
                    value.push('"');
                    self.current += 1;
                    continue;
                }
                if next == '\\' {
                    value.push('\\');
                    self.current += 1;
                    continue;
                }
                value.push('\\');
                continue;
            }
            value.push(c);
        }
        Ok(Token::new(TokenKind::String, value, start_line))
    }
}
