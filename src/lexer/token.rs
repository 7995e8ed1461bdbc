use serde::Serialize;
use std::fmt;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
/// A reference to a line number within the source text, and the column of a
/// character within that line. Both begin at 1.
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new() -> Position {
        Position { line: 1, column: 1 }
    }

    /// Advances past one character, moving to the start of the next line if
    /// `new_line` is true
    pub fn advance(&mut self, new_line: bool) {
        if new_line {
            self.column = 1;
            self.line += 1;
        } else {
            self.column += 1;
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub enum TokenKind {
    Num,
    Id,
    Plus,
    Minus,
    Mult,
    Div,
    Mod,
    LParen,
    RParen,
    Assign,
    Semicolon,
    Int,
    Double,
    Float,
    Unknown,
    End,
}

impl TokenKind {
    /// Keyword lookup; literal equality only
    pub fn keyword(word: &str) -> Option<TokenKind> {
        match word {
            "int" => Some(TokenKind::Int),
            "double" => Some(TokenKind::Double),
            "float" => Some(TokenKind::Float),
            _ => None,
        }
    }

    pub fn operator(c: char) -> Option<TokenKind> {
        match c {
            '+' => Some(TokenKind::Plus),
            '-' => Some(TokenKind::Minus),
            '*' => Some(TokenKind::Mult),
            '/' => Some(TokenKind::Div),
            '%' => Some(TokenKind::Mod),
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            '=' => Some(TokenKind::Assign),
            ';' => Some(TokenKind::Semicolon),
            _ => None,
        }
    }

    /// Whether the token may appear inside an arithmetic expression
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            TokenKind::Num
                | TokenKind::Id
                | TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Mult
                | TokenKind::Div
                | TokenKind::Mod
                | TokenKind::LParen
                | TokenKind::RParen
                | TokenKind::Assign
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            TokenKind::Num => "NUM",
            TokenKind::Id => "ID",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Mult => "MULT",
            TokenKind::Div => "DIV",
            TokenKind::Mod => "MOD",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Int => "INT",
            TokenKind::Double => "DOUBLE",
            TokenKind::Float => "FLOAT",
            TokenKind::Unknown => "UNKNOWN",
            TokenKind::End => "END",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
/// A lexical token with the position of its first character
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, position: Position) -> Token {
        Token {
            kind,
            value: value.into(),
            position,
        }
    }

    pub fn end(position: Position) -> Token {
        Token::new(TokenKind::End, "", position)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "<{}, '{}', L:{}, C:{}>",
            self.kind, self.value, self.position.line, self.position.column
        )
    }
}
