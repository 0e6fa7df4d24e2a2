use crate::error::Error;
use crate::symtable::SymbolTable;

/// Macro expansions that nest deeper than this abort the run. Legitimate
/// templates stay in the single digits; anything deeper is a reference
/// cycle.
const MAX_EXPANSION_DEPTH: usize = 64;

/// The template language interpreter.
///
/// A template is plain text interleaved with `{%...%}` control spans.
/// A span holding `if`, `elif`, `else` or `endif` drives conditional
/// output; any other span is a macro reference that is replaced by the
/// symbol's expansion, which is itself interpreted. The newline directly
/// after a conditional directive is swallowed so the directives can sit
/// on lines of their own without leaving holes in the output. Macro
/// references keep their newlines.
pub struct Interpreter<'a> {
    symbols: &'a SymbolTable<'a>,
}

/// One level of pending input. Macro expansions are pushed on top of the
/// text that referenced them and are consumed first.
struct Frame {
    text: String,
    pos: usize,
}

/// The condition state of one open `if`.
///
/// `Active` branches print. `Pending` branches did not match yet, so a
/// following `elif` or `else` may still fire. `Dead` branches are past
/// their match (or sit inside a non-printing parent) and stay quiet to
/// the `endif`.
#[derive(Clone, Copy, PartialEq, Eq)]
enum BranchState {
    Active,
    Pending,
    Dead,
}

struct Level {
    state: BranchState,
    seen_else: bool,
}

enum Directive {
    If(String),
    Elif(String),
    Else,
    Endif,
    Macro(String),
}

impl<'a> Interpreter<'a> {
    pub fn new(symbols: &'a SymbolTable<'a>) -> Interpreter<'a> {
        Interpreter { symbols }
    }

    /// Expand a template to its final text.
    pub fn expand(&self, template: &str) -> Result<String, Error> {
        let mut out = String::new();
        let mut frames = vec![Frame {
            text: template.to_string(),
            pos: 0,
        }];
        let mut if_stack: Vec<Level> = Vec::new();

        loop {
            pop_exhausted(&mut frames);
            let Some(frame) = frames.last_mut() else {
                break;
            };
            let printing = if_stack
                .last()
                .map_or(true, |level| level.state == BranchState::Active);

            let rest = &frame.text[frame.pos..];
            let directive = match find_control(rest) {
                None => {
                    if printing {
                        out.push_str(rest);
                    }
                    frame.pos = frame.text.len();
                    continue;
                }
                Some(control) => {
                    if printing {
                        out.push_str(&rest[..control.start]);
                    }
                    let content = &rest[control.content_start..control.content_end];
                    frame.pos += control.end;
                    classify(content)
                }
            };

            match directive {
                Directive::If(expr) => {
                    let condition = self.evaluate(&expr)?;
                    let state = if printing {
                        if condition {
                            BranchState::Active
                        } else {
                            BranchState::Pending
                        }
                    } else {
                        BranchState::Dead
                    };
                    if_stack.push(Level {
                        state,
                        seen_else: false,
                    });
                    skip_newline(&mut frames);
                }
                Directive::Elif(expr) => {
                    let Some(level) = if_stack.last_mut() else {
                        return Err(malformed("unexpected elif"));
                    };
                    if level.seen_else {
                        return Err(malformed("elif after else"));
                    }
                    level.state = if level.state == BranchState::Pending {
                        if self.evaluate(&expr)? {
                            BranchState::Active
                        } else {
                            BranchState::Pending
                        }
                    } else {
                        BranchState::Dead
                    };
                    skip_newline(&mut frames);
                }
                Directive::Else => {
                    let Some(level) = if_stack.last_mut() else {
                        return Err(malformed("unexpected else"));
                    };
                    if level.seen_else {
                        return Err(malformed("else after else"));
                    }
                    level.seen_else = true;
                    level.state = if level.state == BranchState::Pending {
                        BranchState::Active
                    } else {
                        BranchState::Dead
                    };
                    skip_newline(&mut frames);
                }
                Directive::Endif => {
                    if if_stack.pop().is_none() {
                        return Err(malformed("unexpected endif"));
                    }
                    skip_newline(&mut frames);
                }
                Directive::Macro(name) => {
                    if printing {
                        if frames.len() >= MAX_EXPANSION_DEPTH {
                            return Err(malformed("macro expansion too deep"));
                        }
                        let expansion = self.symbols.lookup(&name)?;
                        frames.push(Frame {
                            text: expansion,
                            pos: 0,
                        });
                    }
                }
            }
        }

        if if_stack.is_empty() {
            Ok(out)
        } else {
            Err(malformed("missing endif"))
        }
    }

    /// Evaluate the boolean mini-language of `if`/`elif` directives.
    fn evaluate(&self, expression: &str) -> Result<bool, Error> {
        let mut parser = CondParser {
            tokens: cond_tokenize(expression),
            pos: 0,
            symbols: self.symbols,
        };
        let ret = parser.expression()?;
        if parser.peek() != &CondToken::Eof {
            return Err(malformed("extra characters after expression"));
        }
        Ok(ret)
    }
}

fn malformed(detail: &str) -> Error {
    Error::MalformedConditional {
        detail: detail.to_string(),
    }
}

fn pop_exhausted(frames: &mut Vec<Frame>) {
    while frames
        .last()
        .is_some_and(|frame| frame.pos >= frame.text.len())
    {
        frames.pop();
    }
}

/// Swallow the newline right after a conditional directive, looking past
/// exhausted expansion frames into the enclosing text.
fn skip_newline(frames: &mut Vec<Frame>) {
    pop_exhausted(frames);
    if let Some(frame) = frames.last_mut() {
        if frame.text[frame.pos..].starts_with('\n') {
            frame.pos += 1;
        }
    }
}

struct Control {
    start: usize,
    content_start: usize,
    content_end: usize,
    end: usize,
}

/// Find the first well-formed `{%...%}` span. The content may not contain
/// `%` or `}`, so spans never nest and a stray `{%` falls through as
/// literal text.
fn find_control(text: &str) -> Option<Control> {
    let bytes = text.as_bytes();
    let mut search = 0;
    while let Some(found) = text[search..].find("{%") {
        let start = search + found;
        let content_start = start + 2;
        let mut i = content_start;
        while i < bytes.len() && bytes[i] != b'%' && bytes[i] != b'}' {
            i += 1;
        }
        if text[i..].starts_with("%}") {
            return Some(Control {
                start,
                content_start,
                content_end: i,
                end: i + 2,
            });
        }
        search = start + 2;
    }
    None
}

fn classify(content: &str) -> Directive {
    if content == "else" {
        Directive::Else
    } else if content == "endif" {
        Directive::Endif
    } else if let Some(expr) = content.strip_prefix("elif ") {
        Directive::Elif(expr.trim().to_string())
    } else if let Some(expr) = content.strip_prefix("if") {
        Directive::If(expr.trim().to_string())
    } else {
        Directive::Macro(content.to_string())
    }
}

/// Comparison operators of the conditional mini-language.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum CmpOp {
    Lt,
    Le,
    Eq,
    Ne,
    Ge,
    Gt,
}

impl CmpOp {
    fn holds<T: PartialOrd>(self, a: &T, b: &T) -> bool {
        match self {
            CmpOp::Lt => a < b,
            CmpOp::Le => a <= b,
            CmpOp::Eq => a == b,
            CmpOp::Ne => a != b,
            CmpOp::Ge => a >= b,
            CmpOp::Gt => a > b,
        }
    }
}

#[derive(PartialEq, Eq, Debug)]
enum CondToken {
    /// `$name`, carrying the bare name.
    Id(String),
    /// A bare or quoted word.
    Word(String),
    Op(CmpOp),
    And,
    Or,
    LParen,
    RParen,
    Unknown,
    Eof,
}

fn cond_word_char(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || ch == b'_' || ch == b'-'
}

/// Tokenize a conditional expression. `and`/`or` bind only when followed
/// by a space, so a trailing `and` reads as a word instead.
fn cond_tokenize(source: &str) -> Vec<CondToken> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;
    loop {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= bytes.len() {
            tokens.push(CondToken::Eof);
            return tokens;
        }
        let rest = &source[pos..];
        if bytes[pos] == b'$'
            && bytes
                .get(pos + 1)
                .is_some_and(|b| b.is_ascii_alphabetic())
        {
            let mut end = pos + 2;
            while end < bytes.len() && cond_word_char(bytes[end]) {
                end += 1;
            }
            tokens.push(CondToken::Id(source[pos + 1..end].to_string()));
            pos = end;
            continue;
        }
        let op = if rest.starts_with("<=") {
            Some((CmpOp::Le, 2))
        } else if rest.starts_with(">=") {
            Some((CmpOp::Ge, 2))
        } else if rest.starts_with("==") {
            Some((CmpOp::Eq, 2))
        } else if rest.starts_with("!=") {
            Some((CmpOp::Ne, 2))
        } else if rest.starts_with('<') {
            Some((CmpOp::Lt, 1))
        } else if rest.starts_with('>') {
            Some((CmpOp::Gt, 1))
        } else {
            None
        };
        if let Some((op, len)) = op {
            tokens.push(CondToken::Op(op));
            pos += len;
            continue;
        }
        if rest.starts_with("and ") {
            tokens.push(CondToken::And);
            pos += 3;
            continue;
        }
        if rest.starts_with("or ") {
            tokens.push(CondToken::Or);
            pos += 2;
            continue;
        }
        let quoted = bytes[pos] == b'"';
        let word_start = if quoted { pos + 1 } else { pos };
        let mut end = word_start;
        while end < bytes.len() && cond_word_char(bytes[end]) {
            end += 1;
        }
        if end > word_start {
            tokens.push(CondToken::Word(source[word_start..end].to_string()));
            if quoted && bytes.get(end) == Some(&b'"') {
                end += 1;
            }
            pos = end;
            continue;
        }
        match bytes[pos] {
            b'(' => tokens.push(CondToken::LParen),
            b')' => tokens.push(CondToken::RParen),
            _ => {
                tokens.push(CondToken::Unknown);
                return tokens;
            }
        }
        pos += 1;
    }
}

/// A resolved terminal: either a text value or an undefined symbol.
enum Value {
    Text(String),
    Undefined,
}

struct CondParser<'a, 'p> {
    tokens: Vec<CondToken>,
    pos: usize,
    symbols: &'a SymbolTable<'p>,
}

impl CondParser<'_, '_> {
    fn peek(&self) -> &CondToken {
        self.tokens.get(self.pos).unwrap_or(&CondToken::Eof)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    /// EXPRESSION = TERM { "or" TERM }. Both sides of `or` are always
    /// evaluated, so an undefined parameter on either side is an error
    /// even when the other side already decided the result.
    fn expression(&mut self) -> Result<bool, Error> {
        let mut ret = false;
        loop {
            ret = self.term()? || ret;
            match self.peek() {
                CondToken::Eof | CondToken::RParen => return Ok(ret),
                CondToken::Or => self.advance(),
                _ => return Err(malformed("expecting 'or'")),
            }
        }
    }

    /// TERM = FACTOR { "and" FACTOR }.
    fn term(&mut self) -> Result<bool, Error> {
        let mut ret = true;
        loop {
            ret = self.factor()? && ret;
            if self.peek() != &CondToken::And {
                return Ok(ret);
            }
            self.advance();
        }
    }

    /// FACTOR = "(" EXPRESSION ")" | TERMINAL OP TERMINAL.
    fn factor(&mut self) -> Result<bool, Error> {
        if self.peek() == &CondToken::LParen {
            self.advance();
            let ret = self.expression()?;
            if self.peek() != &CondToken::RParen {
                return Err(malformed("missing ')'"));
            }
            self.advance();
            return Ok(ret);
        }

        let (val1, raw1) = self.terminal()?;
        let op = match self.peek() {
            CondToken::Op(op) => *op,
            _ => return Err(malformed("operator expected")),
        };
        self.advance();
        let (val2, raw2) = self.terminal()?;

        let (val1, val2) = match (val1, val2) {
            (Value::Text(a), Value::Text(b)) => (a, b),
            (val1, val2) => {
                // Undefined symbols may be tested against the keyword
                // with == and !=, and in no other way.
                let against_keyword = matches!(
                    (&val1, &val2),
                    (Value::Undefined, Value::Text(t)) | (Value::Text(t), Value::Undefined)
                        if t == "Undefined"
                );
                match op {
                    CmpOp::Eq if against_keyword => return Ok(true),
                    CmpOp::Ne if against_keyword => return Ok(false),
                    _ => {}
                }
                let name = match val1 {
                    Value::Undefined => raw1,
                    _ => raw2,
                };
                return Err(Error::UndefinedParameter { name });
            }
        };

        match (numeric(&val1), numeric(&val2)) {
            (Some(a), Some(b)) => Ok(op.holds(&a, &b)),
            _ => Ok(op.holds(&val1.as_str(), &val2.as_str())),
        }
    }

    /// TERMINAL = "$" ID | WORD. A `$` reference that fails to resolve is
    /// the undefined value; the bare word `Undefined` is the keyword text
    /// it is compared against.
    fn terminal(&mut self) -> Result<(Value, String), Error> {
        let (value, raw) = match self.peek() {
            CondToken::Id(name) => {
                let raw = name.clone();
                let value = if name == "Undefined" {
                    Value::Text("Undefined".to_string())
                } else {
                    match self.symbols.lookup(name) {
                        Ok(text) => Value::Text(text),
                        Err(Error::UnknownSymbol { .. }) => Value::Undefined,
                        Err(other) => return Err(other),
                    }
                };
                (value, raw)
            }
            CondToken::Word(text) => (Value::Text(text.clone()), text.clone()),
            _ => return Err(malformed("unexpected terminal")),
        };
        self.advance();
        Ok((value, raw))
    }
}

/// Numeric interpretation of a terminal: a signed decimal or a
/// `0x`-prefixed hex literal. Anything else, bare hex words included,
/// compares as a string.
fn numeric(text: &str) -> Option<i128> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return i128::from_str_radix(hex, 16).ok();
    }
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    if !unsigned.is_empty() && unsigned.bytes().all(|b| b.is_ascii_digit()) {
        return text.parse().ok();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{Algorithm, CrcParams};

    fn expand_with(template: &str, symbols: &[(&str, &str)]) -> Result<String, Error> {
        let params = CrcParams::default();
        let mut table = SymbolTable::new(&params);
        for &(name, value) in symbols {
            table.register(name, value);
        }
        Interpreter::new(&table).expand(template)
    }

    fn expand(template: &str) -> Result<String, Error> {
        expand_with(template, &[])
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(expand("no controls here\n").unwrap(), "no controls here\n");
    }

    #[test]
    fn test_macro_expansion() {
        let out = expand_with("-{%greeting%}-", &[("greeting", "hello")]).unwrap();
        assert_eq!(out, "-hello-");
    }

    #[test]
    fn test_macro_expansion_is_recursive() {
        let out = expand_with(
            "{%outer%}",
            &[("outer", "a{%inner%}c"), ("inner", "b")],
        )
        .unwrap();
        assert_eq!(out, "abc");
    }

    #[test]
    fn test_unknown_macro_is_an_error() {
        assert!(matches!(
            expand("{%no_such_thing%}"),
            Err(Error::UnknownSymbol { .. })
        ));
    }

    #[test]
    fn test_if_true_branch() {
        let out = expand("{%if 1 == 1%}\nyes\n{%endif%}\n").unwrap();
        assert_eq!(out, "yes\n");
    }

    #[test]
    fn test_if_false_branch() {
        let out = expand("{%if 1 == 2%}\nyes\n{%endif%}\n").unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn test_else_branch() {
        let out = expand("{%if 1 == 2%}\nyes\n{%else%}\nno\n{%endif%}\n").unwrap();
        assert_eq!(out, "no\n");
    }

    #[test]
    fn test_elif_chain_picks_first_match() {
        let template = "{%if 1 == 2%}\na\n{%elif 2 == 2%}\nb\n{%elif 3 == 3%}\nc\n{%endif%}\n";
        assert_eq!(expand(template).unwrap(), "b\n");
    }

    #[test]
    fn test_nested_if_inside_dead_branch_stays_quiet() {
        let template = "{%if 1 == 2%}\n{%if 1 == 1%}\nhidden\n{%endif%}\n{%endif%}\nvisible\n";
        assert_eq!(expand(template).unwrap(), "visible\n");
    }

    #[test]
    fn test_macro_keeps_following_newline() {
        let out = expand_with("{%word%}\nnext\n", &[("word", "w")]).unwrap();
        assert_eq!(out, "w\nnext\n");
    }

    #[test]
    fn test_empty_expansion_keeps_blank_line() {
        let out = expand_with("a\n{%nothing%}\nb\n", &[("nothing", "")]).unwrap();
        assert_eq!(out, "a\n\nb\n");
    }

    #[test]
    fn test_conditional_swallows_newline_across_expansion_end() {
        // The endif is the last thing in the expansion; the swallowed
        // newline comes from the text that referenced the macro.
        let out = expand_with(
            "{%block%}\nafter\n",
            &[("block", "{%if 1 == 1%}\nx\n{%endif%}")],
        )
        .unwrap();
        assert_eq!(out, "x\nafter\n");
    }

    #[test]
    fn test_missing_endif() {
        assert!(matches!(
            expand("{%if 1 == 1%}\ntext\n"),
            Err(Error::MalformedConditional { .. })
        ));
    }

    #[test]
    fn test_stray_endif() {
        assert!(matches!(
            expand("text{%endif%}"),
            Err(Error::MalformedConditional { .. })
        ));
    }

    #[test]
    fn test_macro_recursion_is_bounded() {
        let err = expand_with("{%loop%}", &[("loop", "{%loop%}")]);
        match err {
            Err(Error::MalformedConditional { detail }) => {
                assert_eq!(detail, "macro expansion too deep");
            }
            other => panic!("expected depth error, got {:?}", other.ok()),
        }
    }

    #[test]
    fn test_undefined_compared_to_keyword() {
        // include_files is empty in the default parameter set, so the
        // symbol is undefined.
        let template = "{%if ($include_files == Undefined)%}\nempty\n{%else%}\nfull\n{%endif%}\n";
        assert_eq!(expand(template).unwrap(), "empty\n");

        let template = "{%if ($include_files != Undefined)%}\nfull\n{%endif%}\n";
        assert_eq!(expand(template).unwrap(), "");
    }

    #[test]
    fn test_undefined_in_ordering_comparison_is_an_error() {
        match expand("{%if $include_files > 2%}\nx\n{%endif%}\n") {
            Err(Error::UndefinedParameter { name }) => assert_eq!(name, "include_files"),
            other => panic!("expected undefined parameter, got {:?}", other.ok()),
        }
    }

    #[test]
    fn test_string_comparison_against_symbol() {
        let params = CrcParams {
            algorithm: Algorithm::TableDriven,
            ..CrcParams::default()
        };
        let table = SymbolTable::new(&params);
        let out = Interpreter::new(&table)
            .expand("{%if ($crc_algorithm == table-driven)%}\ntd\n{%endif%}\n")
            .unwrap();
        assert_eq!(out, "td\n");
    }

    #[test]
    fn test_undefined_width_compares_as_text() {
        // crc_width resolves to the text "Undefined" when no width is
        // set, which sorts above any digit string.
        let out = expand("{%if $crc_width > 8%}\nwide\n{%endif%}\n").unwrap();
        assert_eq!(out, "wide\n");
    }

    #[test]
    fn test_numeric_comparison() {
        let out = expand_with(
            "{%if $w > 8%}\nbig\n{%else%}\nsmall\n{%endif%}\n",
            &[("w", "32")],
        )
        .unwrap();
        assert_eq!(out, "big\n");
    }

    #[test]
    fn test_hex_comparison() {
        let out = expand_with(
            "{%if $mask == 0xff%}\nbyte\n{%endif%}\n",
            &[("mask", "0xff")],
        )
        .unwrap();
        assert_eq!(out, "byte\n");
    }

    #[test]
    fn test_and_or_combination() {
        let template =
            "{%if ($a == 1 and $b == 2) or $c == 3%}\nhit\n{%endif%}\n";
        let out = expand_with(template, &[("a", "1"), ("b", "0"), ("c", "3")]).unwrap();
        assert_eq!(out, "hit\n");
        let out = expand_with(template, &[("a", "1"), ("b", "2"), ("c", "0")]).unwrap();
        assert_eq!(out, "hit\n");
        let out = expand_with(template, &[("a", "0"), ("b", "0"), ("c", "0")]).unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn test_malformed_expression() {
        assert!(matches!(
            expand("{%if $a ==%}\nx\n{%endif%}\n"),
            Err(Error::MalformedConditional { .. })
        ));
        assert!(matches!(
            expand("{%if (1 == 1%}\nx\n{%endif%}\n"),
            Err(Error::MalformedConditional { .. })
        ));
    }

    #[test]
    fn test_stray_control_opener_is_literal_text() {
        assert_eq!(expand("a {% b").unwrap(), "a {% b");
    }

    #[test]
    fn test_quoted_word() {
        let out = expand_with(
            "{%if $name == \"kermit\"%}\nk\n{%endif%}\n",
            &[("name", "kermit")],
        )
        .unwrap();
        assert_eq!(out, "k\n");
    }
}
