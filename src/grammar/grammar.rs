use indexmap::IndexSet;
use serde::Serialize;
use std::fmt;

use super::{EPSILON, EPSILON_SPELLINGS};
use crate::errors::{Error, Result};

/// One right-hand side: an ordered list of symbols. An empty list is `ε`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Alternative {
    symbols: Vec<String>,
}

impl Alternative {
    /// Builds an alternative from symbols, dropping every spelling of `ε`
    /// and blank entries
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            symbols: symbols
                .into_iter()
                .map(|s| s.as_ref().trim().to_string())
                .filter(|s| !s.is_empty() && !EPSILON_SPELLINGS.contains(&s.as_str()))
                .collect(),
        }
    }

    /// Splits a space separated right-hand side
    pub fn parse(text: &str) -> Self {
        Self::new(text.split_whitespace())
    }

    pub fn epsilon() -> Self {
        Self {
            symbols: Vec::new(),
        }
    }

    pub fn is_epsilon(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn first_symbol(&self) -> Option<&str> {
        self.symbols.first().map(|s| s.as_str())
    }

    pub fn starts_with(&self, symbol: &str) -> bool {
        self.first_symbol() == Some(symbol)
    }

    /// The alternative without its leading symbol
    pub fn rest(&self) -> &[String] {
        if self.symbols.is_empty() {
            &[]
        } else {
            &self.symbols[1..]
        }
    }

    /// `self` followed by `tail`; `ε` on either side contributes nothing
    pub fn concat<S: AsRef<str>>(&self, tail: &[S]) -> Self {
        Self::new(
            self.symbols
                .iter()
                .map(|s| s.as_str())
                .chain(tail.iter().map(|s| s.as_ref())),
        )
    }
}

impl fmt::Display for Alternative {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_epsilon() {
            write!(f, "{}", EPSILON)
        } else {
            write!(f, "{}", self.symbols.join(" "))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Production {
    pub left: String,
    pub alternatives: Vec<Alternative>,
}

impl Production {
    pub fn new(left: &str, alternatives: Vec<Alternative>) -> Self {
        Self {
            left: left.to_string(),
            alternatives,
        }
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} -> {}",
            self.left,
            self.alternatives
                .iter()
                .map(|a| a.to_string())
                .collect::<Vec<_>>()
                .join(" | ")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grammar {
    start_symbol: String,
    productions: Vec<Production>,
}

impl Grammar {
    pub fn new(start_symbol: &str) -> Self {
        Self {
            start_symbol: start_symbol.to_string(),
            productions: Vec::new(),
        }
    }

    /// E -> E + T | E - T | T
    /// T -> T * F | T / F | F
    /// F -> ( E ) | NUM | ID
    pub fn arithmetic() -> Self {
        let mut g = Self::new("E");
        g.add("E", &["E + T", "E - T", "T"]);
        g.add("T", &["T * F", "T / F", "F"]);
        g.add("F", &["( E )", "NUM", "ID"]);
        g
    }

    /// Adds alternatives written as space separated strings. Alternatives of
    /// a left side that already exists are appended to it.
    pub fn add(&mut self, left: &str, alternatives: &[&str]) {
        self.add_alternatives(left, alternatives.iter().map(|a| Alternative::parse(a)));
    }

    pub fn add_alternatives<I: IntoIterator<Item = Alternative>>(
        &mut self,
        left: &str,
        alternatives: I,
    ) {
        match self.productions.iter_mut().find(|p| p.left == left) {
            Some(p) => p.alternatives.extend(alternatives),
            None => self
                .productions
                .push(Production::new(left, alternatives.into_iter().collect())),
        }
    }

    pub(crate) fn push_production(&mut self, production: Production) {
        self.productions.push(production);
    }

    pub fn start_symbol(&self) -> &str {
        &self.start_symbol
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn production(&self, left: &str) -> Option<&Production> {
        self.productions.iter().find(|p| p.left == left)
    }

    /// Nonterminals in order of first appearance
    pub fn non_terminals(&self) -> impl Iterator<Item = &str> {
        self.productions.iter().map(|p| p.left.as_str())
    }

    /// Symbols used on right sides that are not left sides, in order of first
    /// appearance
    pub fn terminals(&self) -> Vec<&str> {
        let classifier = self.classifier();
        let mut terminals: IndexSet<&str> = IndexSet::new();
        for p in &self.productions {
            for a in &p.alternatives {
                for s in a.symbols() {
                    if classifier.is_terminal(s) {
                        terminals.insert(s.as_str());
                    }
                }
            }
        }
        terminals.into_iter().collect()
    }

    pub fn classifier(&self) -> SymbolClassifier {
        SymbolClassifier::new(self)
    }

    /// The start symbol must be the left side of some production
    pub fn check(&self) -> Result<()> {
        if self.productions.is_empty() {
            return Err(Error::EmptyGrammar);
        }
        if self.production(&self.start_symbol).is_none() {
            return Err(Error::StartSymbolUndefined(self.start_symbol.clone()));
        }
        Ok(())
    }

    /// Strict mode: every right-side symbol must be a nonterminal or one of
    /// the declared terminals. Without this check an undeclared symbol is
    /// silently treated as a terminal.
    pub fn check_symbols<'a, I>(&self, declared_terminals: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let declared: IndexSet<&str> = declared_terminals.into_iter().collect();
        let undefined: Vec<String> = self
            .terminals()
            .into_iter()
            .filter(|t| !declared.contains(t))
            .map(|t| t.to_string())
            .collect();
        if undefined.is_empty() {
            Ok(())
        } else {
            Err(Error::UndefinedSymbols(undefined))
        }
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for p in &self.productions {
            writeln!(f, "{}", p)?;
        }
        Ok(())
    }
}

/// Terminal / nonterminal membership for one grammar. A symbol is a
/// nonterminal iff it is the left side of a production.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolClassifier {
    non_terminals: IndexSet<String>,
}

impl SymbolClassifier {
    pub fn new(grammar: &Grammar) -> Self {
        Self {
            non_terminals: grammar.non_terminals().map(|s| s.to_string()).collect(),
        }
    }

    pub fn is_non_terminal(&self, symbol: &str) -> bool {
        self.non_terminals.contains(symbol)
    }

    pub fn is_terminal(&self, symbol: &str) -> bool {
        !self.is_non_terminal(symbol)
    }

    pub fn non_terminals(&self) -> impl Iterator<Item = &str> {
        self.non_terminals.iter().map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternative_drops_epsilon() {
        assert!(Alternative::parse("ε").is_epsilon());
        assert!(Alternative::parse("ϵ").is_epsilon());
        assert!(Alternative::parse("   ").is_epsilon());
        assert_eq!(Alternative::parse("a ε b").symbols(), &["a", "b"]);
        assert_eq!(Alternative::epsilon().to_string(), "ε");
        assert_eq!(Alternative::parse(" ( E ) ").to_string(), "( E )");
    }

    #[test]
    fn alternative_concat() {
        let a = Alternative::parse("T");
        assert_eq!(a.concat(&["E'"]).to_string(), "T E'");
        assert_eq!(Alternative::epsilon().concat(&["E'"]).to_string(), "E'");
        assert_eq!(Alternative::parse("E + T").rest(), &["+", "T"]);
        assert!(Alternative::epsilon().rest().is_empty());
    }

    #[test]
    fn arithmetic_grammar() {
        let g = Grammar::arithmetic();
        assert_eq!(g.start_symbol(), "E");
        assert_eq!(g.non_terminals().collect::<Vec<_>>(), vec!["E", "T", "F"]);
        assert_eq!(g.terminals(), vec!["+", "-", "*", "/", "(", ")", "NUM", "ID"]);
        assert_eq!(
            g.production("F").unwrap().to_string(),
            "F -> ( E ) | NUM | ID"
        );
        assert!(g.check().is_ok());
    }

    #[test]
    fn add_merges_left_sides() {
        let mut g = Grammar::new("S");
        g.add("S", &["a"]);
        g.add("A", &["b"]);
        g.add("S", &["A c"]);
        assert_eq!(g.productions().len(), 2);
        assert_eq!(g.production("S").unwrap().alternatives.len(), 2);
    }

    #[test]
    fn classifier_falls_back_to_terminal() {
        let mut g = Grammar::new("S");
        g.add("S", &["A b", "Typo"]);
        g.add("A", &["a"]);
        let c = g.classifier();
        assert!(c.is_non_terminal("S"));
        assert!(c.is_non_terminal("A"));
        assert!(c.is_terminal("Typo"));
        assert_eq!(c.non_terminals().collect::<Vec<_>>(), vec!["S", "A"]);
        assert_eq!(
            g.check_symbols(["a", "b"]),
            Err(Error::UndefinedSymbols(vec!["Typo".to_string()]))
        );
        assert!(g.check_symbols(["a", "b", "Typo"]).is_ok());
    }

    #[test]
    fn undefined_start_symbol() {
        let mut g = Grammar::new("S");
        assert_eq!(g.check(), Err(Error::EmptyGrammar));
        g.add("A", &["a"]);
        assert_eq!(g.check(), Err(Error::StartSymbolUndefined("S".to_string())));
    }
}
