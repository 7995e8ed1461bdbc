use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeSet;

use super::{Grammar, SymbolClassifier, END_MARK, EPSILON};

pub type SymbolSet = BTreeSet<String>;

/// FIRST set of every nonterminal; a set may contain `ε`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FirstSets {
    sets: IndexMap<String, SymbolSet>,
}

impl FirstSets {
    pub fn compute(grammar: &Grammar, classifier: &SymbolClassifier) -> Self {
        let mut first = Self {
            sets: classifier
                .non_terminals()
                .map(|nt| (nt.to_string(), SymbolSet::new()))
                .collect(),
        };
        while first.refine(grammar, classifier) {}
        first
    }

    /// One full pass over every alternative. Returns whether any set grew.
    pub fn refine(&mut self, grammar: &Grammar, classifier: &SymbolClassifier) -> bool {
        let mut changed = false;
        for production in grammar.productions() {
            for alternative in &production.alternatives {
                let new = self.of_sequence(alternative.symbols(), classifier);
                let set = self
                    .sets
                    .entry(production.left.clone())
                    .or_insert_with(SymbolSet::new);
                let before = set.len();
                set.extend(new);
                changed |= set.len() > before;
            }
        }
        changed
    }

    /// FIRST of a symbol string under the current sets. The empty string
    /// yields `{ε}`.
    pub fn of_sequence<S: AsRef<str>>(
        &self,
        symbols: &[S],
        classifier: &SymbolClassifier,
    ) -> SymbolSet {
        let mut first = SymbolSet::new();
        for symbol in symbols.iter().map(|s| s.as_ref()) {
            if classifier.is_terminal(symbol) {
                first.insert(symbol.to_string());
                return first;
            }
            let empty = SymbolSet::new();
            let nt_first = self.sets.get(symbol).unwrap_or(&empty);
            first.extend(nt_first.iter().filter(|s| *s != EPSILON).cloned());
            if !nt_first.contains(EPSILON) {
                return first;
            }
        }
        first.insert(EPSILON.to_string());
        first
    }

    pub fn get(&self, non_terminal: &str) -> Option<&SymbolSet> {
        self.sets.get(non_terminal)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SymbolSet)> {
        self.sets.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_nullable(&self, non_terminal: &str) -> bool {
        self.get(non_terminal)
            .map_or(false, |set| set.contains(EPSILON))
    }
}

/// FOLLOW set of every nonterminal; a set may contain `$`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FollowSets {
    sets: IndexMap<String, SymbolSet>,
}

impl FollowSets {
    pub fn compute(grammar: &Grammar, classifier: &SymbolClassifier, first: &FirstSets) -> Self {
        let mut follow = Self {
            sets: classifier
                .non_terminals()
                .map(|nt| (nt.to_string(), SymbolSet::new()))
                .collect(),
        };
        follow
            .sets
            .entry(grammar.start_symbol().to_string())
            .or_insert_with(SymbolSet::new)
            .insert(END_MARK.to_string());
        while follow.refine(grammar, classifier, first) {}
        follow
    }

    /// One full pass over every position of every alternative. Returns
    /// whether any set grew.
    pub fn refine(
        &mut self,
        grammar: &Grammar,
        classifier: &SymbolClassifier,
        first: &FirstSets,
    ) -> bool {
        let mut changed = false;
        for production in grammar.productions() {
            for alternative in &production.alternatives {
                let symbols = alternative.symbols();
                for (i, b) in symbols.iter().enumerate() {
                    if !classifier.is_non_terminal(b) {
                        continue;
                    }
                    let beta_first = first.of_sequence(&symbols[i + 1..], classifier);

                    let mut new: SymbolSet = beta_first
                        .iter()
                        .filter(|s| *s != EPSILON)
                        .cloned()
                        .collect();
                    if beta_first.contains(EPSILON) {
                        if let Some(left_follow) = self.sets.get(&production.left) {
                            new.extend(left_follow.iter().cloned());
                        }
                    }

                    let set = self
                        .sets
                        .entry(b.clone())
                        .or_insert_with(SymbolSet::new);
                    let before = set.len();
                    set.extend(new);
                    changed |= set.len() > before;
                }
            }
        }
        changed
    }

    pub fn get(&self, non_terminal: &str) -> Option<&SymbolSet> {
        self.sets.get(non_terminal)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SymbolSet)> {
        self.sets.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(symbols: &[&str]) -> SymbolSet {
        symbols.iter().map(|s| s.to_string()).collect()
    }

    fn arithmetic() -> (Grammar, SymbolClassifier, FirstSets, FollowSets) {
        let g = Grammar::arithmetic().eliminate_left_recursion();
        let c = g.classifier();
        let first = FirstSets::compute(&g, &c);
        let follow = FollowSets::compute(&g, &c, &first);
        (g, c, first, follow)
    }

    #[test]
    fn arithmetic_first() {
        let (_, _, first, _) = arithmetic();
        let f = set(&["(", "NUM", "ID"]);
        assert_eq!(first.get("F"), Some(&f));
        assert_eq!(first.get("T"), Some(&f));
        assert_eq!(first.get("E"), Some(&f));
        assert_eq!(first.get("E'"), Some(&set(&["+", "-", EPSILON])));
        assert_eq!(first.get("T'"), Some(&set(&["*", "/", EPSILON])));
        assert!(first.is_nullable("E'"));
        assert!(!first.is_nullable("E"));
    }

    #[test]
    fn arithmetic_follow() {
        let (_, _, _, follow) = arithmetic();
        assert_eq!(follow.get("E"), Some(&set(&[")", "$"])));
        assert_eq!(follow.get("E'"), Some(&set(&[")", "$"])));
        assert_eq!(follow.get("T"), Some(&set(&["+", "-", ")", "$"])));
        assert_eq!(follow.get("T'"), Some(&set(&["+", "-", ")", "$"])));
        assert_eq!(
            follow.get("F"),
            Some(&set(&["*", "/", "+", "-", ")", "$"]))
        );
    }

    #[test]
    fn fixpoints_are_idempotent() {
        let (g, c, mut first, mut follow) = arithmetic();
        let first_before = first.clone();
        assert!(!first.refine(&g, &c));
        assert_eq!(first, first_before);
        let follow_before = follow.clone();
        assert!(!follow.refine(&g, &c, &first));
        assert_eq!(follow, follow_before);
    }

    #[test]
    fn fixpoint_on_left_recursive_grammar() {
        // FIRST/FOLLOW still terminate on the untransformed grammar
        let g = Grammar::arithmetic();
        let c = g.classifier();
        let first = FirstSets::compute(&g, &c);
        let follow = FollowSets::compute(&g, &c, &first);
        assert_eq!(first.get("E"), Some(&set(&["(", "NUM", "ID"])));
        assert_eq!(follow.get("E"), Some(&set(&["+", "-", ")", "$"])));
    }

    #[test]
    fn nullable_chain() {
        let g = Grammar::parse("S -> A B c\nA -> a | ε\nB -> b | ε").unwrap();
        let c = g.classifier();
        let first = FirstSets::compute(&g, &c);
        assert_eq!(first.get("S"), Some(&set(&["a", "b", "c"])));
        assert_eq!(first.of_sequence(&["A", "B"], &c), set(&["a", "b", EPSILON]));
        assert_eq!(first.of_sequence::<&str>(&[], &c), set(&[EPSILON]));

        let follow = FollowSets::compute(&g, &c, &first);
        assert_eq!(follow.get("S"), Some(&set(&["$"])));
        assert_eq!(follow.get("A"), Some(&set(&["b", "c"])));
        assert_eq!(follow.get("B"), Some(&set(&["c"])));
    }

    #[test]
    fn nullable_tail_inherits_left_follow() {
        let g = Grammar::parse("S -> a A B\nA -> x\nB -> y | ε").unwrap();
        let c = g.classifier();
        let first = FirstSets::compute(&g, &c);
        let follow = FollowSets::compute(&g, &c, &first);
        assert_eq!(follow.get("A"), Some(&set(&["y", "$"])));
        assert_eq!(follow.get("B"), Some(&set(&["$"])));
    }
}
