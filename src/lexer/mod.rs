pub mod token;

pub use token::{Position, Token, TokenKind};

/// A permissive scanner for the arithmetic subset of Java-like source text.
///
/// Whitespace and comments are skipped, unknown characters become
/// `TokenKind::Unknown` tokens, and an `End` token is always produced last.
/// Once the `End` token has been yielded the iterator is exhausted.
pub struct Tokenizer {
    input: Vec<char>,
    cursor: usize,
    position: Position,
    finished: bool,
}

impl Tokenizer {
    pub fn new(source: &str) -> Tokenizer {
        Tokenizer {
            input: source.chars().collect(),
            cursor: 0,
            position: Position::new(),
            finished: false,
        }
    }

    fn lookahead(&self) -> Option<char> {
        self.peek(0)
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.input.get(self.cursor + offset).cloned()
    }

    fn read(&mut self) -> char {
        let c = self.input[self.cursor];
        self.cursor += 1;
        self.position.advance(c == '\n');
        c
    }

    /// Reads characters while `pred` holds and returns them
    fn read_while<F: Fn(char) -> bool>(&mut self, pred: F) -> String {
        let mut s = String::new();
        while let Some(c) = self.lookahead() {
            if !pred(c) {
                break;
            }
            s.push(self.read());
        }
        s
    }

    fn discard_line_comment(&mut self) {
        while let Some(c) = self.lookahead() {
            if c == '\n' {
                break;
            }
            self.read();
        }
    }

    /// An unterminated block comment runs to the end of the input
    fn discard_block_comment(&mut self) {
        self.read();
        self.read();
        while self.lookahead().is_some() {
            if self.lookahead() == Some('*') && self.peek(1) == Some('/') {
                self.read();
                self.read();
                return;
            }
            self.read();
        }
    }

    fn discard_whitespace_and_comments(&mut self) {
        loop {
            match (self.lookahead(), self.peek(1)) {
                (Some(c), _) if c.is_whitespace() => {
                    self.read();
                }
                (Some('/'), Some('/')) => self.discard_line_comment(),
                (Some('/'), Some('*')) => self.discard_block_comment(),
                _ => break,
            }
        }
    }

    /// Digits and dots, without checking that the result is a well-formed
    /// decimal
    fn lex_number(&mut self, start: Position) -> Token {
        let value = self.read_while(|c| c.is_numeric() || c == '.');
        Token::new(TokenKind::Num, value, start)
    }

    fn lex_word(&mut self, start: Position) -> Token {
        let value = self.read_while(|c| c.is_alphanumeric() || c == '_');
        let kind = TokenKind::keyword(&value).unwrap_or(TokenKind::Id);
        Token::new(kind, value, start)
    }
}

impl Iterator for Tokenizer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }

        self.discard_whitespace_and_comments();
        let start = self.position;

        let Some(c) = self.lookahead() else {
            self.finished = true;
            return Some(Token::end(start));
        };

        if c.is_numeric() {
            return Some(self.lex_number(start));
        }
        if c.is_alphabetic() || c == '_' {
            return Some(self.lex_word(start));
        }

        self.read();
        let kind = TokenKind::operator(c).unwrap_or(TokenKind::Unknown);
        Some(Token::new(kind, c.to_string(), start))
    }
}

/// Scans the whole source text. The last token is always `End`.
pub fn tokenize(source: &str) -> Vec<Token> {
    Tokenizer::new(source).collect()
}

/// Splits a token sequence into arithmetic expressions.
///
/// Numbers, identifiers, arithmetic operators, parentheses and `=` extend the
/// current expression, `;` closes it, and every other token is ignored.
pub fn extract_expressions(tokens: &[Token]) -> Vec<Vec<Token>> {
    let mut expressions = Vec::new();
    let mut current: Vec<Token> = Vec::new();

    for token in tokens {
        if token.kind.is_arithmetic() {
            current.push(token.clone());
        } else if token.kind == TokenKind::Semicolon && !current.is_empty() {
            expressions.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        expressions.push(current);
    }

    expressions
}
