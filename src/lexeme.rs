/// All lexemes of the bitwise expression language.
#[derive(Clone, Debug, PartialEq)]
pub enum Lexeme {
    // Operators
    Tilde, // ~
    Amp,   // &
    Pipe,  // |
    Caret, // ^
    Shl,   // <<
    Shr,   // >>

    // Grouping
    LParen, // (
    RParen, // )

    // Literals
    Integer(i64),
    Ident(String),

    // Anything the lexer does not recognize; reported by the parser
    Unknown(char),

    // End of input
    Eof,
}

impl Lexeme {
    /// The token as it appeared in the source, for error messages.
    pub fn text(&self) -> String {
        match self {
            Lexeme::Tilde => "~".to_string(),
            Lexeme::Amp => "&".to_string(),
            Lexeme::Pipe => "|".to_string(),
            Lexeme::Caret => "^".to_string(),
            Lexeme::Shl => "<<".to_string(),
            Lexeme::Shr => ">>".to_string(),
            Lexeme::LParen => "(".to_string(),
            Lexeme::RParen => ")".to_string(),
            Lexeme::Integer(n) => format!("{}", n),
            Lexeme::Ident(name) => name.clone(),
            Lexeme::Unknown(ch) => ch.to_string(),
            Lexeme::Eof => String::new(),
        }
    }
}
