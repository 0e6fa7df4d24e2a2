use crate::lexeme::Lexeme;
use crate::span::{Span, Spanned};

/// Byte-based lexer for the bitwise expression language.
///
/// Whitespace separates tokens and is otherwise ignored. Unrecognized
/// characters become `Lexeme::Unknown` tokens; the parser turns them into
/// errors with a span pointing back into the input.
pub struct Lexer<'src> {
    source: &'src [u8],
    pos: usize,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source: source.as_bytes(),
            pos: 0,
        }
    }

    pub fn tokenize(mut self) -> Vec<Spanned<Lexeme>> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token();
            let is_eof = tok.node == Lexeme::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        tokens
    }

    fn next_token(&mut self) -> Spanned<Lexeme> {
        while self.pos < self.source.len() && self.source[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }

        if self.pos >= self.source.len() {
            return self.make_token(Lexeme::Eof, self.pos, self.pos);
        }

        let start = self.pos;
        let ch = self.source[self.pos];

        if ch.is_ascii_alphabetic() {
            return self.scan_ident();
        }

        if ch.is_ascii_digit()
            || (ch == b'-' && self.peek_at(1).is_some_and(|b| b.is_ascii_digit()))
        {
            return self.scan_number();
        }

        self.pos += 1;
        let token = match ch {
            b'~' => Lexeme::Tilde,
            b'&' => Lexeme::Amp,
            b'|' => Lexeme::Pipe,
            b'^' => Lexeme::Caret,
            b'(' => Lexeme::LParen,
            b')' => Lexeme::RParen,
            b'<' => {
                if self.peek() == Some(b'<') {
                    self.pos += 1;
                    Lexeme::Shl
                } else {
                    Lexeme::Unknown('<')
                }
            }
            b'>' => {
                if self.peek() == Some(b'>') {
                    self.pos += 1;
                    Lexeme::Shr
                } else {
                    Lexeme::Unknown('>')
                }
            }
            _ => Lexeme::Unknown(ch as char),
        };
        self.make_token(token, start, self.pos)
    }

    fn scan_ident(&mut self) -> Spanned<Lexeme> {
        let start = self.pos;
        while self.pos < self.source.len() && is_ident_continue(self.source[self.pos]) {
            self.pos += 1;
        }
        let text = std::str::from_utf8(&self.source[start..self.pos])
            .unwrap_or_default()
            .to_string();
        self.make_token(Lexeme::Ident(text), start, self.pos)
    }

    /// Scan a decimal or `0x`-prefixed hexadecimal integer, with an
    /// optional leading `-` and an optional trailing `u`, so the printed
    /// form of a folded constant lexes back to the same value.
    ///
    /// Digit accumulation wraps at 64 bits, so an over-long literal keeps
    /// the low 64 bits of its two's-complement value.
    fn scan_number(&mut self) -> Spanned<Lexeme> {
        let start = self.pos;
        let mut value: i64 = 0;

        let negative = self.source[self.pos] == b'-';
        if negative {
            self.pos += 1;
        }

        if self.source[self.pos] == b'0'
            && matches!(self.peek_at(1), Some(b'x') | Some(b'X'))
            && self.peek_at(2).is_some_and(|b| b.is_ascii_hexdigit())
        {
            self.pos += 2;
            while self.pos < self.source.len() && self.source[self.pos].is_ascii_hexdigit() {
                let digit = hex_digit(self.source[self.pos]);
                value = value.wrapping_mul(16).wrapping_add(digit as i64);
                self.pos += 1;
            }
        } else {
            while self.pos < self.source.len() && self.source[self.pos].is_ascii_digit() {
                let digit = (self.source[self.pos] - b'0') as i64;
                value = value.wrapping_mul(10).wrapping_add(digit);
                self.pos += 1;
            }
        }

        if negative {
            value = value.wrapping_neg();
        }
        if self.peek() == Some(b'u') && !self.peek_at(1).is_some_and(is_ident_continue) {
            self.pos += 1;
        }

        self.make_token(Lexeme::Integer(value), start, self.pos)
    }

    fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    fn make_token(&self, token: Lexeme, start: usize, end: usize) -> Spanned<Lexeme> {
        Spanned::new(token, Span::new(start as u32, end as u32))
    }
}

fn is_ident_continue(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || ch == b'_'
}

fn hex_digit(ch: u8) -> u8 {
    match ch {
        b'0'..=b'9' => ch - b'0',
        b'a'..=b'f' => ch - b'a' + 10,
        _ => ch - b'A' + 10,
    }
}
