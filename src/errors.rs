use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, PartialEq)]
pub enum Error {
    EmptyGrammar,
    EmptyLeftSide(usize),
    LeftSideContainsWhitespace(usize),
    MissingLeftSide(usize),
    StartSymbolUndefined(String),
    TooManyArrows(usize),
    UndefinedSymbols(Vec<String>),
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::EmptyGrammar => write!(f, "grammar has no productions"),
            Error::EmptyLeftSide(line) => write!(f, "line {}: empty left side", line),
            Error::LeftSideContainsWhitespace(line) => {
                write!(f, "line {}: left side contains whitespace", line)
            }
            Error::MissingLeftSide(line) => write!(f, "line {}: cannot find left side", line),
            Error::StartSymbolUndefined(s) => {
                write!(f, "start symbol '{}' is not the left side of any production", s)
            }
            Error::TooManyArrows(line) => write!(f, "line {}: too many \"->\"", line),
            Error::UndefinedSymbols(symbols) => {
                write!(f, "undefined symbols: {}", symbols.join(", "))
            }
        }
    }
}
