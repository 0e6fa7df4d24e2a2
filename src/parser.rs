use crate::error::Error;
use crate::expr::{Expr, ExprKind};
use crate::lexeme::Lexeme;
use crate::lexer::Lexer;
use crate::span::Spanned;

const MAX_NESTING_DEPTH: u32 = 256;

/// Recursive-descent parser for the bitwise expression language.
///
/// Precedence, loosest first: `|`, `^`, `&`, `<< >>`. Shifts do not chain;
/// `a << 1 << 2` is a parse error. The n-ary operators collect as many
/// operands as the input offers, so `a | b | c` becomes a single OR node
/// with three children.
struct Parser<'src> {
    tokens: Vec<Spanned<Lexeme>>,
    pos: usize,
    source: &'src str,
    depth: u32,
}

/// Parse an expression string into a tree. Empty input parses as the
/// integer zero.
pub fn parse(source: &str) -> Result<Expr, Error> {
    let tokens = Lexer::new(source).tokenize();
    let mut parser = Parser {
        tokens,
        pos: 0,
        source,
        depth: 0,
    };

    if *parser.peek() == Lexeme::Eof {
        return Ok(Expr::integer(0));
    }

    let tree = match parser.parse_or() {
        Some(tree) => tree,
        None => return Err(parser.error_at_current()),
    };
    if *parser.peek() != Lexeme::Eof {
        return Err(parser.error_at_current());
    }
    Ok(tree)
}

impl Parser<'_> {
    fn peek(&self) -> &Lexeme {
        &self.tokens[self.pos].node
    }

    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn error_at_current(&self) -> Error {
        let tok = &self.tokens[self.pos];
        Error::Parse {
            token: tok.node.text(),
            span: tok.span,
            source: self.source.to_string(),
        }
    }

    fn parse_or(&mut self) -> Option<Expr> {
        let mut operands = Vec::new();
        while *self.peek() != Lexeme::Eof {
            operands.push(self.parse_xor()?);
            if *self.peek() == Lexeme::Pipe {
                self.advance();
            } else {
                break;
            }
        }
        collapse(operands, ExprKind::Or)
    }

    fn parse_xor(&mut self) -> Option<Expr> {
        let mut operands = Vec::new();
        while *self.peek() != Lexeme::Eof {
            operands.push(self.parse_and()?);
            if *self.peek() == Lexeme::Caret {
                self.advance();
            } else {
                break;
            }
        }
        collapse(operands, ExprKind::Xor)
    }

    fn parse_and(&mut self) -> Option<Expr> {
        let mut operands = Vec::new();
        while *self.peek() != Lexeme::Eof {
            operands.push(self.parse_shift()?);
            if *self.peek() == Lexeme::Amp {
                self.advance();
            } else {
                break;
            }
        }
        collapse(operands, ExprKind::And)
    }

    fn parse_shift(&mut self) -> Option<Expr> {
        let lhs = self.parse_terminal()?;
        let kind = match self.peek() {
            Lexeme::Shl => ExprKind::Shl as fn(Box<Expr>, Box<Expr>) -> ExprKind,
            Lexeme::Shr => ExprKind::Shr,
            _ => return Some(lhs),
        };
        self.advance();
        let rhs = self.parse_terminal()?;
        Some(Expr::new(kind(Box::new(lhs), Box::new(rhs))))
    }

    fn parse_terminal(&mut self) -> Option<Expr> {
        match self.peek().clone() {
            Lexeme::Integer(value) => {
                self.advance();
                Some(Expr::integer(value))
            }
            Lexeme::Ident(name) => {
                self.advance();
                Some(Expr::new(ExprKind::Ident(name)))
            }
            Lexeme::Tilde => {
                self.advance();
                self.enter_nesting()?;
                let inner = self.parse_terminal();
                self.depth -= 1;
                Some(Expr::new(ExprKind::Not(Box::new(inner?))))
            }
            Lexeme::LParen => {
                self.advance();
                self.enter_nesting()?;
                let inner = self.parse_or();
                self.depth -= 1;
                let inner = inner?;
                if *self.peek() != Lexeme::RParen {
                    return None;
                }
                self.advance();
                Some(inner)
            }
            _ => None,
        }
    }

    fn enter_nesting(&mut self) -> Option<()> {
        if self.depth >= MAX_NESTING_DEPTH {
            return None;
        }
        self.depth += 1;
        Some(())
    }
}

fn collapse(mut operands: Vec<Expr>, kind: fn(Vec<Expr>) -> ExprKind) -> Option<Expr> {
    match operands.len() {
        0 => None,
        1 => operands.pop(),
        _ => Some(Expr::new(kind(operands))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(source: &str) -> String {
        parse(source).expect("should parse").render(false)
    }

    #[test]
    fn test_precedence() {
        assert_eq!(text("a | b ^ c & d"), "a | (b ^ (c & d))");
        assert_eq!(text("a & b ^ c | d"), "((a & b) ^ c) | d");
    }

    #[test]
    fn test_nary_collection() {
        let tree = parse("a | b | c").expect("should parse");
        match tree.kind {
            ExprKind::Or(children) => assert_eq!(children.len(), 3),
            other => panic!("expected OR node, got {:?}", other),
        }
    }

    #[test]
    fn test_parens_override_precedence() {
        assert_eq!(text("(a | b) & c"), "(a | b) & c");
    }

    #[test]
    fn test_shift_binds_tighter_than_and() {
        assert_eq!(text("a << 1 & b"), "(a << 1u) & b");
    }

    #[test]
    fn test_negation_of_terminal_only() {
        assert_eq!(text("~a & b"), "~a & b");
        assert_eq!(text("~(a & b)"), "~(a & b)");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(text(""), "0u");
    }

    #[test]
    fn test_chained_shift_rejected() {
        assert!(parse("a << 1 << 2").is_err());
    }

    #[test]
    fn test_trailing_operator_before_eof_is_dropped() {
        // The n-ary loops stop quietly at end of input, so a dangling
        // operator with nothing after it leaves the collected operands.
        assert_eq!(text("a |"), "a");
    }

    #[test]
    fn test_missing_operand() {
        assert!(parse("& b").is_err());
        assert!(parse("a | | b").is_err());
    }

    #[test]
    fn test_unbalanced_paren() {
        assert!(parse("(a | b").is_err());
        assert!(parse("a | b)").is_err());
    }

    #[test]
    fn test_unknown_character() {
        let err = parse("a + b").unwrap_err();
        assert_eq!(err.to_string(), "error at token '+'");
    }
}
