use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{BTreeSet, VecDeque};

use super::first_follow::FollowSets;
use super::ll1_table::LL1Table;
use super::{Grammar, END_MARK};
use crate::lexer::{Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct State {
    pub id: usize,
    pub name: String,
    pub is_initial: bool,
    pub is_final: bool,
    /// symbol -> destination state id, at most one per symbol
    pub transitions: IndexMap<String, usize>,
}

impl State {
    fn new(id: usize, name: String) -> Self {
        Self {
            id,
            name,
            is_initial: false,
            is_final: false,
            transitions: IndexMap::new(),
        }
    }
}

/// Finite automaton derived from an LL(1) table: one state per nonterminal
/// plus a single accepting state. It has no stack, so it does not track
/// nesting; see `predictive` for a real LL(1) recognizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Afd {
    states: Vec<State>,
    alphabet: BTreeSet<String>,
    start: usize,
    finals: BTreeSet<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub from: usize,
    pub symbol: String,
    pub to: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub accepted: bool,
    pub trace: Vec<Step>,
}

impl Afd {
    /// The start nonterminal gets state 0, the other nonterminals follow in
    /// table row order, and the accepting state comes last.
    ///
    /// For each cell `M[A, a]` the first alternative decides the target: `ε`
    /// goes to the accepting state, a leading nonterminal goes to its state,
    /// anything else loops on `A`. The first transition added for a
    /// (state, symbol) pair wins. Finally every nonterminal whose FOLLOW holds
    /// `$` gets a `$` transition to the accepting state, replacing any
    /// existing one.
    pub fn build(grammar: &Grammar, table: &LL1Table, follow: &FollowSets) -> Self {
        let start_symbol = grammar.start_symbol();

        let mut states: Vec<State> = Vec::new();
        let mut state_of: IndexMap<&str, usize> = IndexMap::new();

        let mut initial = State::new(0, format!("q0_{}", start_symbol));
        initial.is_initial = true;
        states.push(initial);
        state_of.insert(start_symbol, 0);

        for nt in table.non_terminals() {
            if nt == start_symbol {
                continue;
            }
            let id = states.len();
            states.push(State::new(id, format!("q{}_{}", id, nt)));
            state_of.insert(nt.as_str(), id);
        }

        let accept = states.len();
        let mut accepting = State::new(accept, "qF_accept".to_string());
        accepting.is_final = true;
        states.push(accepting);

        for (key, alternatives) in table.cells() {
            let Some(&from) = state_of.get(key.non_terminal.as_str()) else {
                continue;
            };
            let Some(alternative) = alternatives.first() else {
                continue;
            };
            let to = if alternative.is_epsilon() {
                accept
            } else {
                alternative
                    .first_symbol()
                    .and_then(|s| state_of.get(s).copied())
                    .unwrap_or(from)
            };
            states[from]
                .transitions
                .entry(key.terminal.clone())
                .or_insert(to);
        }

        for nt in table.non_terminals() {
            let (Some(&from), Some(set)) = (state_of.get(nt.as_str()), follow.get(nt)) else {
                continue;
            };
            if set.contains(END_MARK) {
                states[from].transitions.insert(END_MARK.to_string(), accept);
            }
        }

        let mut alphabet: BTreeSet<String> = table.terminals().iter().cloned().collect();
        alphabet.insert(END_MARK.to_string());

        Self {
            states,
            alphabet,
            start: 0,
            finals: BTreeSet::from([accept]),
        }
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn state(&self, id: usize) -> Option<&State> {
        self.states.get(id)
    }

    pub fn alphabet(&self) -> &BTreeSet<String> {
        &self.alphabet
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn finals(&self) -> &BTreeSet<usize> {
        &self.finals
    }

    pub fn is_final(&self, id: usize) -> bool {
        self.finals.contains(&id)
    }

    pub fn transition(&self, from: usize, symbol: &str) -> Option<usize> {
        self.states
            .get(from)
            .and_then(|s| s.transitions.get(symbol).copied())
    }

    /// Every (from, symbol, to), ordered by state then symbol
    pub fn transitions(&self) -> Vec<Step> {
        let mut steps: Vec<Step> = self
            .states
            .iter()
            .flat_map(|s| {
                s.transitions.iter().map(move |(symbol, &to)| Step {
                    from: s.id,
                    symbol: symbol.clone(),
                    to,
                })
            })
            .collect();
        steps.sort_by(|a, b| (a.from, &a.symbol).cmp(&(b.from, &b.symbol)));
        steps
    }

    pub fn transition_count(&self) -> usize {
        self.states.iter().map(|s| s.transitions.len()).sum()
    }

    /// Defined transitions over `|states| * |alphabet|`, in percent
    pub fn density(&self) -> f64 {
        let possible = self.states.len() * self.alphabet.len();
        if possible == 0 {
            0.0
        } else {
            self.transition_count() as f64 / possible as f64 * 100.0
        }
    }

    /// Number of states reachable from the initial state, itself included
    pub fn reachable_states(&self) -> usize {
        let mut visited: BTreeSet<usize> = BTreeSet::from([self.start]);
        let mut queue: VecDeque<usize> = VecDeque::from([self.start]);
        while let Some(current) = queue.pop_front() {
            if let Some(state) = self.states.get(current) {
                for &to in state.transitions.values() {
                    if visited.insert(to) {
                        queue.push_back(to);
                    }
                }
            }
        }
        visited.len()
    }

    /// Runs the tokens through the automaton. Stops at the first symbol
    /// without a transition; otherwise accepts iff the last state is final.
    pub fn validate(&self, tokens: &[Token]) -> Validation {
        let mut trace: Vec<Step> = Vec::new();
        let mut current = self.start;
        for token in tokens {
            let symbol = token_symbol(token);
            match self.transition(current, &symbol) {
                Some(to) => {
                    trace.push(Step {
                        from: current,
                        symbol,
                        to,
                    });
                    current = to;
                }
                None => {
                    return Validation {
                        accepted: false,
                        trace,
                    }
                }
            }
        }
        Validation {
            accepted: self.is_final(current),
            trace,
        }
    }
}

/// Alphabet symbol a token is read as
pub fn token_symbol(token: &Token) -> String {
    match token.kind {
        TokenKind::Num => "NUM".to_string(),
        TokenKind::Id => "ID".to_string(),
        TokenKind::Plus => "+".to_string(),
        TokenKind::Minus => "-".to_string(),
        TokenKind::Mult => "*".to_string(),
        TokenKind::Div => "/".to_string(),
        TokenKind::Mod => "%".to_string(),
        TokenKind::LParen => "(".to_string(),
        TokenKind::RParen => ")".to_string(),
        TokenKind::End => END_MARK.to_string(),
        _ => token.value.clone(),
    }
}
