use crate::error::Error;
use crate::parser;

pub const ALL_ZEROS: i64 = 0;
pub const ALL_ONES: i64 = !0;

/// A node of a bitwise expression tree.
///
/// `And`/`Or`/`Xor` hold two or more operands; a list that shrinks to a
/// single operand during simplification collapses to that operand.
#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Integer(i64),
    Ident(String),
    Not(Box<Expr>),
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Xor(Vec<Expr>),
    Shl(Box<Expr>, Box<Expr>),
    Shr(Box<Expr>, Box<Expr>),
}

/// An expression tree node with its known-bit masks.
///
/// `relevant` marks which output bits the surrounding context cares about;
/// bits outside it are don't-care and may be dropped. `known_ones` marks,
/// among the relevant bits, those guaranteed to be 1 regardless of any free
/// identifier. Invariant: `known_ones & relevant == known_ones`. A node
/// where the two masks coincide is a constant and collapses to `Integer`.
///
/// Mask arithmetic is done in `i64` with arithmetic shifts, so the all-ones
/// mask stays all-ones under right shifts the way an unbounded
/// two's-complement value would.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub known_ones: i64,
    pub relevant: i64,
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Self::with_masks(kind, ALL_ZEROS, ALL_ONES)
    }

    pub fn with_masks(kind: ExprKind, known_ones: i64, relevant: i64) -> Self {
        let known_ones = known_ones & relevant;
        let kind = match kind {
            ExprKind::Integer(v) => ExprKind::Integer((v | known_ones) & relevant),
            other => other,
        };
        let node = Expr {
            kind,
            known_ones,
            relevant,
        };
        debug_assert_eq!(node.known_ones & node.relevant, node.known_ones);
        node
    }

    pub fn integer(value: i64) -> Self {
        Self::new(ExprKind::Integer(value))
    }

    /// Print the node as a C expression. Integers render unsigned-suffixed
    /// with their signed decimal value, so the all-ones constant is `-1u`.
    pub fn render(&self, use_paren: bool) -> String {
        match &self.kind {
            ExprKind::Integer(v) => format!("{}u", v),
            ExprKind::Ident(name) => name.clone(),
            ExprKind::Not(inner) => format!("~{}", inner.render(true)),
            ExprKind::And(xs) => join_operands(xs, " & ", use_paren),
            ExprKind::Or(xs) => join_operands(xs, " | ", use_paren),
            ExprKind::Xor(xs) => join_operands(xs, " ^ ", use_paren),
            ExprKind::Shl(lhs, rhs) => {
                let text = format!("{} << {}", lhs.render(true), rhs.render(true));
                if use_paren {
                    format!("({})", text)
                } else {
                    text
                }
            }
            ExprKind::Shr(lhs, rhs) => {
                let text = format!("{} >> {}", lhs.render(true), rhs.render(true));
                if use_paren {
                    format!("({})", text)
                } else {
                    text
                }
            }
        }
    }
}

fn join_operands(operands: &[Expr], separator: &str, use_paren: bool) -> String {
    let text = operands
        .iter()
        .map(|op| op.render(true))
        .collect::<Vec<_>>()
        .join(separator);
    if use_paren {
        format!("({})", text)
    } else {
        text
    }
}

/// Left shift mirroring an unbounded two's-complement value truncated to
/// the low 64 bits: a shift count past the word pushes everything out.
fn shl_wide(value: i64, count: i64) -> i64 {
    match count {
        0..=63 => value << count,
        _ => 0,
    }
}

/// Arithmetic right shift; counts past the word keep only the sign fill.
fn shr_wide(value: i64, count: i64) -> i64 {
    match count {
        0..=63 => value >> count,
        _ if count >= 64 => value >> 63,
        _ => 0,
    }
}

fn int_value(node: &Expr) -> i64 {
    match node.kind {
        ExprKind::Integer(v) => v,
        _ => 0,
    }
}

fn is_integer(node: &Expr) -> bool {
    matches!(node.kind, ExprKind::Integer(_))
}

/// Negate an already-simplified node, reducing a topmost double negation.
fn negated(node: &Expr) -> Expr {
    match &node.kind {
        ExprKind::Not(inner) => (**inner).clone(),
        ExprKind::Integer(v) => Expr::integer(!v),
        _ => Expr::new(ExprKind::Not(Box::new(node.clone()))),
    }
}

/// Strike out operands with identical canonical text (`drop_both` decides
/// whether one or both of a duplicate pair go) and complementary pairs.
/// Returns the surviving operands sorted by canonical text, plus whether a
/// complementary pair was found.
fn reduce_operands(operands: Vec<Expr>, drop_both_duplicates: bool) -> (Vec<Expr>, bool) {
    let mut texts: Vec<Option<String>> = operands.iter().map(|op| Some(op.render(false))).collect();
    let neg_texts: Vec<String> = operands.iter().map(|op| negated(op).render(false)).collect();

    let mut complement_found = false;
    for i in 0..operands.len() {
        for j in (i + 1)..operands.len() {
            if texts[i].is_none() || texts[j].is_none() {
                continue;
            }
            if texts[i] == texts[j] {
                texts[i] = None;
                if drop_both_duplicates {
                    texts[j] = None;
                }
            } else if texts[i].as_deref() == Some(neg_texts[j].as_str()) {
                texts[i] = None;
                texts[j] = None;
                complement_found = true;
            }
        }
    }

    let mut survivors: Vec<Expr> = operands
        .into_iter()
        .zip(texts)
        .filter_map(|(op, text)| text.map(|_| op))
        .collect();
    survivors.sort_by_key(|op| op.render(false));
    (survivors, complement_found)
}

/// One top-down simplification pass.
///
/// `ctx_known` is the known-ones context inherited from the parent node;
/// the context's relevant half is always all-ones here, since no operator
/// in the language narrows which of a child's bits matter beyond what the
/// child's own mask already records.
pub fn simplify(node: Expr, ctx_known: i64) -> Expr {
    let Expr {
        kind,
        known_ones,
        relevant,
    } = node;
    let mut known = (known_ones | ctx_known) & relevant;
    let mut relevant = relevant;

    if known == relevant {
        return Expr::integer(known);
    }

    match kind {
        ExprKind::Integer(v) => {
            let v = (v | known) & relevant;
            Expr {
                kind: ExprKind::Integer(v),
                known_ones: v,
                relevant: v,
            }
        }
        ExprKind::Ident(_) => Expr {
            kind,
            known_ones: known,
            relevant,
        },
        ExprKind::Not(inner) => {
            let inner = simplify(*inner, !relevant);
            match inner.kind {
                ExprKind::Integer(v) => Expr::with_masks(ExprKind::Integer(!v), known, relevant),
                ExprKind::Not(grand) => *grand,
                _ => Expr {
                    kind: ExprKind::Not(Box::new(inner)),
                    known_ones: known,
                    relevant,
                },
            }
        }
        ExprKind::And(children) => {
            let children: Vec<Expr> = children.into_iter().map(|c| simplify(c, known)).collect();
            known |= children.iter().fold(ALL_ONES, |a, c| a & c.known_ones);
            relevant &= children.iter().fold(ALL_ONES, |a, c| a & c.relevant);
            known &= relevant;
            if known == relevant {
                return Expr::integer(known);
            }

            let (ints, symbolic): (Vec<Expr>, Vec<Expr>) =
                children.into_iter().partition(is_integer);
            let mut intval = ints.iter().fold(ALL_ONES, |a, c| a & int_value(c));
            intval = (intval | known) & relevant;
            relevant &= intval;
            known &= relevant;

            let (mut operands, complement) = reduce_operands(symbolic, false);
            if complement {
                intval = ALL_ZEROS;
            }

            if operands.is_empty() || intval == ALL_ZEROS {
                operands = vec![Expr::integer(intval)];
            } else if intval != ALL_ONES {
                operands.push(Expr::integer(intval));
            }

            if operands.len() == 1 {
                return operands.remove(0);
            }
            Expr {
                kind: ExprKind::And(operands),
                known_ones: known,
                relevant,
            }
        }
        ExprKind::Or(children) => {
            let children: Vec<Expr> = children.into_iter().map(|c| simplify(c, known)).collect();
            known |= children.iter().fold(ALL_ZEROS, |a, c| a | c.known_ones);
            relevant &= children.iter().fold(ALL_ZEROS, |a, c| a | c.relevant);
            known &= relevant;
            if known == relevant {
                return Expr::integer(known);
            }

            let (ints, symbolic): (Vec<Expr>, Vec<Expr>) =
                children.into_iter().partition(is_integer);
            let mut intval = ints.iter().fold(ALL_ZEROS, |a, c| a | int_value(c));
            intval = (intval | known) & relevant;
            known |= intval;
            known &= relevant;

            let (mut operands, complement) = reduce_operands(symbolic, false);
            if complement {
                intval = ALL_ONES;
            }

            if operands.is_empty() || intval == ALL_ONES {
                operands = vec![Expr::integer(intval)];
            } else if intval != ALL_ZEROS {
                operands.push(Expr::integer(intval));
            }

            if operands.len() == 1 {
                return operands.remove(0);
            }
            Expr {
                kind: ExprKind::Or(operands),
                known_ones: known,
                relevant,
            }
        }
        ExprKind::Xor(children) => {
            let children: Vec<Expr> = children
                .into_iter()
                .map(|c| simplify(c, ALL_ZEROS))
                .collect();
            relevant &= children.iter().fold(ALL_ZEROS, |a, c| a | c.relevant);
            known &= relevant;
            if known == relevant {
                return Expr::integer(known);
            }

            let (ints, symbolic): (Vec<Expr>, Vec<Expr>) =
                children.into_iter().partition(is_integer);
            let mut intval = ints.iter().fold(ALL_ZEROS, |a, c| a ^ int_value(c));
            intval = (intval | known) & relevant;

            let (mut operands, complement) = reduce_operands(symbolic, true);
            if complement {
                intval ^= ALL_ONES;
            }

            if operands.is_empty() {
                return Expr::integer(intval);
            }
            if intval == ALL_ONES {
                // An all-ones XOR operand is a negation of the rest.
                let negand = if operands.len() == 1 {
                    operands.remove(0)
                } else {
                    Expr {
                        kind: ExprKind::Xor(operands),
                        known_ones: known,
                        relevant,
                    }
                };
                return simplify(Expr::new(ExprKind::Not(Box::new(negand))), ALL_ZEROS);
            }
            if intval != ALL_ZEROS {
                operands.push(Expr::integer(intval));
            }

            if operands.len() == 1 {
                return operands.remove(0);
            }
            Expr {
                kind: ExprKind::Xor(operands),
                known_ones: known,
                relevant,
            }
        }
        ExprKind::Shl(lhs, rhs) => {
            let lhs_ctx = match rhs.kind {
                ExprKind::Integer(n) => shr_wide(known, n),
                _ => ALL_ZEROS,
            };
            let lhs = simplify(*lhs, lhs_ctx);
            let rhs = simplify(*rhs, ALL_ZEROS);

            let out = if let ExprKind::Integer(n) = rhs.kind {
                known |= shl_wide(lhs.known_ones, n);
                relevant &= shl_wide(lhs.relevant, n);
                known &= relevant;
                if let ExprKind::Integer(v) = lhs.kind {
                    Expr::with_masks(ExprKind::Integer(shl_wide(v, n)), known, relevant)
                } else {
                    Expr {
                        kind: ExprKind::Shl(Box::new(lhs), Box::new(rhs)),
                        known_ones: known,
                        relevant,
                    }
                }
            } else {
                Expr {
                    kind: ExprKind::Shl(Box::new(lhs), Box::new(rhs)),
                    known_ones: known,
                    relevant,
                }
            };

            if out.known_ones == out.relevant {
                return Expr::integer(out.known_ones);
            }
            out
        }
        ExprKind::Shr(lhs, rhs) => {
            let lhs_ctx = match rhs.kind {
                ExprKind::Integer(n) => shl_wide(known, n),
                _ => ALL_ZEROS,
            };
            let lhs = simplify(*lhs, lhs_ctx);
            let rhs = simplify(*rhs, ALL_ZEROS);

            let out = if let ExprKind::Integer(n) = rhs.kind {
                known |= shr_wide(lhs.known_ones, n);
                relevant &= shr_wide(lhs.relevant, n);
                known &= relevant;
                if let ExprKind::Integer(v) = lhs.kind {
                    Expr::with_masks(ExprKind::Integer(shr_wide(v, n)), known, relevant)
                } else {
                    Expr {
                        kind: ExprKind::Shr(Box::new(lhs), Box::new(rhs)),
                        known_ones: known,
                        relevant,
                    }
                }
            } else {
                Expr {
                    kind: ExprKind::Shr(Box::new(lhs), Box::new(rhs)),
                    known_ones: known,
                    relevant,
                }
            };

            if out.known_ones == out.relevant {
                return Expr::integer(out.known_ones);
            }
            out
        }
    }
}

/// Simplify a bitwise C expression string to its minimal canonical form.
///
/// Parses once, then re-applies `simplify` and re-prints until the printed
/// text reaches a fixed point: a pass can expose reductions created by an
/// earlier one, e.g. an AND collapsing to an integer lets an enclosing OR
/// fold further. Every rule is non-increasing, so the loop terminates.
pub fn simplify_text(source: &str) -> Result<String, Error> {
    let mut tree = parser::parse(source)?;
    let mut old = String::from("0");
    let mut text = tree.render(false);
    while text != old {
        old = text;
        tree = simplify(tree, ALL_ZEROS);
        text = tree.render(false);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simp(source: &str) -> String {
        simplify_text(source).expect("expression should parse")
    }

    #[test]
    fn test_integer_folding() {
        assert_eq!(simp("1 | 2"), "3u");
        assert_eq!(simp("0xff & 0x0f"), "15u");
        assert_eq!(simp("1 ^ 3"), "2u");
        assert_eq!(simp("(1 | 2) << 2"), "12u");
        assert_eq!(simp("0x10 >> 4"), "1u");
    }

    #[test]
    fn test_identity_dedup() {
        assert_eq!(simp("a & a"), "a");
        assert_eq!(simp("a | a"), "a");
        assert_eq!(simp("a ^ a"), "0u");
    }

    #[test]
    fn test_double_negation() {
        assert_eq!(simp("~~a"), "a");
        assert_eq!(simp("~~~a"), "~a");
    }

    #[test]
    fn test_complement_pairs() {
        assert_eq!(simp("a & ~a"), "0u");
        assert_eq!(simp("a | ~a"), "-1u");
        assert_eq!(simp("a ^ ~a"), "-1u");
    }

    #[test]
    fn test_neutral_and_absorbing_constants() {
        assert_eq!(simp("a & 0"), "0u");
        assert_eq!(simp("a | 0"), "a");
        assert_eq!(simp("a ^ 0"), "a");
        assert_eq!(simp("a & 0xffffffffffffffff"), "a");
        assert_eq!(simp("a | 0xffffffffffffffff"), "-1u");
    }

    #[test]
    fn test_xor_all_ones_becomes_negation() {
        assert_eq!(simp("a ^ 0xffffffffffffffff"), "~a");
    }

    #[test]
    fn test_not_integer() {
        assert_eq!(simp("~0"), "-1u");
        assert_eq!(simp("~0xff"), "-256u");
    }

    #[test]
    fn test_operand_ordering_is_canonical() {
        assert_eq!(simp("b & a"), "a & b");
        assert_eq!(simp("b | a | c"), "a | b | c");
    }

    #[test]
    fn test_nested_collapse_enables_outer_fold() {
        // The inner AND collapses to 0, which then absorbs the OR operand.
        assert_eq!(simp("x | (a & ~a)"), "x");
        assert_eq!(simp("x & (a | ~a)"), "x");
    }

    #[test]
    fn test_empty_input_is_zero() {
        assert_eq!(simp(""), "0u");
        assert_eq!(simp("   "), "0u");
    }

    #[test]
    fn test_idempotence() {
        for source in [
            "a & a",
            "(crc >> 8) ^ 0xff",
            "~(a | b) & c",
            "a ^ b ^ a",
            "(1 | 2) << 2",
            "a | ~a",
        ] {
            let once = simp(source);
            assert_eq!(simp(&once), once, "not idempotent for {:?}", source);
        }
    }

    #[test]
    fn test_printed_form_parses_back() {
        assert_eq!(simp("(crc >> 8u) ^ 255u"), "(crc >> 8u) ^ 255u");
        assert_eq!(simp("-1u"), "-1u");
        assert_eq!(simp("-256u"), "-256u");
    }

    #[test]
    fn test_shift_by_identifier_is_kept() {
        assert_eq!(simp("a << n"), "a << n");
        assert_eq!(simp("8 >> n"), "8u >> n");
    }

    #[test]
    fn test_known_bits_absorb_masked_or() {
        // The OR forces the low bits to 1, and the AND only cares about
        // those bits, so the identifier drops out entirely.
        assert_eq!(simp("(a | 0x0f) & 0x0f"), "15u");
    }

    #[test]
    fn test_xor_self_cancellation_leaves_constant() {
        assert_eq!(simp("a ^ a ^ 5"), "5u");
        assert_eq!(simp("a ^ 5 ^ a ^ 3"), "6u");
    }

    #[test]
    fn test_parse_error_reports_token() {
        let err = simplify_text("a << << b").unwrap_err();
        assert_eq!(err.to_string(), "error at token '<<'");
    }

    #[test]
    fn test_chained_shift_is_rejected() {
        assert!(simplify_text("a << 1 << 2").is_err());
    }

    #[test]
    fn test_render_parenthesizes_nested_groups() {
        let tree = crate::parser::parse("(a | b) & c").expect("parse");
        assert_eq!(tree.render(false), "(a | b) & c");
    }
}
