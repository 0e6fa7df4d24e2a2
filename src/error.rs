use std::fmt;
use std::path::PathBuf;

use crate::span::Span;

/// Everything that can go wrong while generating code or checking a sum.
///
/// All variants are fatal: a failed lookup or a malformed template aborts
/// the whole generation request and no partial output is written.
#[derive(Debug)]
pub enum Error {
    /// The bitwise expression parser rejected a token. Carries the
    /// offending source text so the error can be rendered with a span.
    Parse {
        token: String,
        span: Span,
        source: String,
    },
    /// A template conditional is structurally broken: stray `else`/`elif`/
    /// `endif`, a missing `endif`, a bad boolean expression, or a macro
    /// expansion that never terminates.
    MalformedConditional { detail: String },
    /// A macro reference named a symbol with no registered generator.
    UnknownSymbol { name: String },
    /// A boolean comparison read a parameter that is undefined and was not
    /// guarded by an `== Undefined` / `!= Undefined` test.
    UndefinedParameter { name: String },
    /// File I/O from the command-line layer.
    Io { path: PathBuf, source: std::io::Error },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse { token, .. } => {
                write!(f, "error at token '{}'", token)
            }
            Error::MalformedConditional { detail } => {
                write!(f, "malformed conditional: {}", detail)
            }
            Error::UnknownSymbol { name } => {
                write!(f, "unknown symbol \"{}\"", name)
            }
            Error::UndefinedParameter { name } => {
                write!(f, "undefined parameter '{}'", name)
            }
            Error::Io { path, source } => {
                write!(f, "cannot access '{}': {}", path.display(), source)
            }
        }
    }
}

impl Error {
    /// Render the error to stderr. Parse errors carry a span into the
    /// offending expression and are rendered through ariadne; everything
    /// else prints a single line.
    pub fn render(&self) {
        match self {
            Error::Parse {
                token,
                span,
                source,
            } => {
                use ariadne::{Color, Label, Report, ReportKind, Source};

                let filename = "<expression>";
                let report = Report::build(ReportKind::Error, filename, span.start as usize)
                    .with_message(format!("error at token '{}'", token))
                    .with_label(
                        Label::new((filename, span.start as usize..span.end as usize))
                            .with_message("unexpected token")
                            .with_color(Color::Red),
                    );
                // Rendering to stderr can only fail on a broken pipe.
                let _ = report
                    .finish()
                    .eprint((filename, Source::from(source.as_str())));
            }
            other => eprintln!("error: {}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_parse() {
        let e = Error::Parse {
            token: "<<".to_string(),
            span: Span::new(2, 4),
            source: "a << << b".to_string(),
        };
        assert_eq!(e.to_string(), "error at token '<<'");
    }

    #[test]
    fn test_display_unknown_symbol() {
        let e = Error::UnknownSymbol {
            name: "no_such_fragment".to_string(),
        };
        assert_eq!(e.to_string(), "unknown symbol \"no_such_fragment\"");
    }

    #[test]
    fn test_display_undefined_parameter() {
        let e = Error::UndefinedParameter {
            name: "crc_width".to_string(),
        };
        assert_eq!(e.to_string(), "undefined parameter 'crc_width'");
    }

    #[test]
    fn test_render_does_not_panic() {
        let e = Error::Parse {
            token: ")".to_string(),
            span: Span::new(4, 5),
            source: "(a | )".to_string(),
        };
        e.render();
    }
}
