use serde::Serialize;

use super::afd::token_symbol;
use super::ll1_table::LL1Table;
use super::{Alternative, SymbolClassifier, END_MARK};
use crate::lexer::Token;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "move", rename_all = "lowercase")]
pub enum Move {
    /// `non_terminal` was replaced by `alternative` on seeing `lookahead`
    Expand {
        non_terminal: String,
        lookahead: String,
        alternative: Alternative,
    },
    Match { terminal: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recognition {
    pub accepted: bool,
    pub moves: Vec<Move>,
}

/// Table-driven LL(1) recognizer working on a symbol stack. Conflict cells
/// are resolved by taking their first alternative.
pub struct Recognizer<'a> {
    start_symbol: &'a str,
    classifier: &'a SymbolClassifier,
    table: &'a LL1Table,
}

impl<'a> Recognizer<'a> {
    pub fn new(
        start_symbol: &'a str,
        classifier: &'a SymbolClassifier,
        table: &'a LL1Table,
    ) -> Self {
        Self {
            start_symbol,
            classifier,
            table,
        }
    }

    /// Accepts iff the stack empties exactly when `$` is read. Input without
    /// an `End` token is read as if it had one. Stops at the first error.
    pub fn recognize(&self, tokens: &[Token]) -> Recognition {
        // Algorithm adapted from Aho et al (2007) p.227
        let mut input: Vec<String> = tokens.iter().map(token_symbol).collect();
        if input.last().map(|s| s.as_str()) != Some(END_MARK) {
            input.push(END_MARK.to_string());
        }

        let mut stack: Vec<String> = vec![END_MARK.to_string(), self.start_symbol.to_string()];
        let mut moves: Vec<Move> = Vec::new();
        let mut pos: usize = 0;

        // Nonterminals expanded since the last match whose expansion is still
        // on the stack, with the stack height at expansion time
        let mut expanding: Vec<(String, usize)> = Vec::new();

        while let Some(top) = stack.pop() {
            let lookahead = input.get(pos).map(|s| s.as_str()).unwrap_or(END_MARK);

            if top == END_MARK {
                let accepted = lookahead == END_MARK;
                if accepted {
                    moves.push(Move::Match { terminal: top });
                }
                return Recognition { accepted, moves };
            }

            if self.classifier.is_terminal(&top) {
                if top != lookahead {
                    break;
                }
                moves.push(Move::Match { terminal: top });
                pos += 1;
                expanding.clear();
                continue;
            }

            let height = stack.len();
            expanding.retain(|(_, h)| *h <= height + 1);
            if expanding.iter().any(|(nt, _)| *nt == top) {
                // left recursion: the same expansion would repeat forever
                break;
            }

            let Some(alternative) = self
                .table
                .get(&top, lookahead)
                .and_then(|alternatives| alternatives.first())
            else {
                break;
            };

            stack.extend(alternative.symbols().iter().rev().cloned());
            expanding.push((top.clone(), height + 1));
            moves.push(Move::Expand {
                non_terminal: top,
                lookahead: lookahead.to_string(),
                alternative: alternative.clone(),
            });
        }

        Recognition {
            accepted: false,
            moves,
        }
    }
}
