use crate::errors::Result;
use crate::grammar::afd::{Afd, Validation};
use crate::grammar::first_follow::{FirstSets, FollowSets};
use crate::grammar::ll1_table::LL1Table;
use crate::grammar::predictive::{Recognition, Recognizer};
use crate::grammar::{Grammar, SymbolClassifier};
use crate::lexer::{extract_expressions, tokenize, Token};
use crate::log::{BufLog, Logger};

/// Every artifact derived from one grammar, built once by [`Analysis::new`].
///
/// The LL(1) artifacts are computed on the grammar with left recursion
/// removed; the grammar as given stays available through `original()`.
#[derive(Debug, Clone)]
pub struct Analysis {
    original: Grammar,
    grammar: Grammar,
    classifier: SymbolClassifier,
    first: FirstSets,
    follow: FollowSets,
    table: LL1Table,
    afd: Afd,
    log: BufLog,
}

impl Analysis {
    pub fn new(original: Grammar) -> Self {
        let mut log = BufLog::new();
        if let Err(e) = original.check() {
            log.add_error(e.to_string());
        }

        let recursive = original.directly_left_recursive();
        let grammar = original.eliminate_left_recursion();
        if !recursive.is_empty() {
            log.add_note(format!(
                "removed direct left recursion on: {}",
                recursive.join(", ")
            ));
        }
        let original_classifier = original.classifier();
        for nt in grammar.non_terminals() {
            if !original_classifier.is_non_terminal(nt) {
                log.add_note(format!("introduced nonterminal {}", nt));
            }
        }

        let classifier = grammar.classifier();
        let first = FirstSets::compute(&grammar, &classifier);
        let follow = FollowSets::compute(&grammar, &classifier, &first);
        let table = LL1Table::build(&grammar, &classifier, &first, &follow);
        for (key, _) in table.conflicts() {
            log.add_warning(format!(
                "conflict in M[{}, {}]: {}",
                key.non_terminal,
                key.terminal,
                table.cell_to_string(&key.non_terminal, &key.terminal)
            ));
        }
        let afd = Afd::build(&grammar, &table, &follow);

        Self {
            original,
            grammar,
            classifier,
            first,
            follow,
            table,
            afd,
            log,
        }
    }

    /// Rejects a grammar that uses a symbol which is neither a left side nor
    /// one of `terminals`, instead of reading it as a terminal
    pub fn strict<'a, I>(grammar: Grammar, terminals: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        grammar.check_symbols(terminals)?;
        Ok(Self::new(grammar))
    }

    pub fn original(&self) -> &Grammar {
        &self.original
    }

    /// The grammar without left recursion
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn classifier(&self) -> &SymbolClassifier {
        &self.classifier
    }

    pub fn first(&self) -> &FirstSets {
        &self.first
    }

    pub fn follow(&self) -> &FollowSets {
        &self.follow
    }

    pub fn table(&self) -> &LL1Table {
        &self.table
    }

    pub fn afd(&self) -> &Afd {
        &self.afd
    }

    pub fn log(&self) -> &BufLog {
        &self.log
    }

    pub fn validate(&self, tokens: &[Token]) -> Validation {
        self.afd.validate(tokens)
    }

    /// Tokenizes `source` (which appends the end mark) and validates it
    pub fn validate_source(&self, source: &str) -> Validation {
        self.validate(&tokenize(source))
    }

    /// Validates each arithmetic expression found in `source`, with the end
    /// mark appended to each
    pub fn validate_expressions(&self, source: &str) -> Vec<(Vec<Token>, Validation)> {
        extract_expressions(&tokenize(source))
            .into_iter()
            .map(|mut expression| {
                if let Some(position) = expression.last().map(|t| t.position) {
                    expression.push(Token::end(position));
                }
                let validation = self.validate(&expression);
                (expression, validation)
            })
            .collect()
    }

    pub fn predict(&self, tokens: &[Token]) -> Recognition {
        Recognizer::new(self.grammar.start_symbol(), &self.classifier, &self.table)
            .recognize(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::lexer::TokenKind;
    use crate::log::LogStatus;

    #[test]
    fn arithmetic_log() {
        let a = Analysis::new(Grammar::arithmetic());
        assert_eq!(
            a.log().notes().collect::<Vec<_>>(),
            vec![
                "removed direct left recursion on: E, T",
                "introduced nonterminal E'",
                "introduced nonterminal T'",
            ]
        );
        assert!(a.log().has_no_warnings());
        assert!(a.table().is_ll1());
        assert_eq!(a.original(), &Grammar::arithmetic());
    }

    #[test]
    fn conflicts_are_warnings() {
        let a = Analysis::new(Grammar::parse("S -> a b | a c").unwrap());
        assert_eq!(
            a.log().warnings().collect::<Vec<_>>(),
            vec!["conflict in M[S, a]: S -> a b | a c"]
        );
    }

    #[test]
    fn undefined_start_is_logged() {
        let mut g = Grammar::new("S");
        g.add("A", &["a"]);
        let a = Analysis::new(g);
        assert_eq!(a.log().num_errors(), 1);
    }

    #[test]
    fn strict_mode() {
        let g = Grammar::parse("S -> a B\nB -> b | c").unwrap();
        assert!(Analysis::strict(g.clone(), ["a", "b", "c"]).is_ok());
        assert_eq!(
            Analysis::strict(g, ["a", "b"]).err(),
            Some(Error::UndefinedSymbols(vec!["c".to_string()]))
        );
    }

    #[test]
    fn validations_leave_log_unchanged() {
        let a = Analysis::new(Grammar::arithmetic());
        let before = a.log().clone();
        for _ in 0..3 {
            assert!(a.validate_source("id").accepted);
            assert!(a.predict(&tokenize("id + id")).accepted);
        }
        assert_eq!(a.log().notes().count(), before.notes().count());
        assert_eq!(a.log().num_warnings(), before.num_warnings());
    }

    #[test]
    fn expressions_get_an_end_mark() {
        let a = Analysis::new(Grammar::arithmetic());
        let results = a.validate_expressions("int x = 5;\nfloat y = x;\nsum;");
        assert_eq!(results.len(), 3);
        for (expression, _) in &results {
            assert_eq!(expression.last().map(|t| t.kind), Some(TokenKind::End));
        }
        // "sum" alone reaches the accepting state
        assert!(results[2].1.accepted);
        // "=" is not in the alphabet
        assert!(!results[0].1.accepted);
    }
}
