use crowbook_text_processing::escape::tex as escape_tex;
use indexmap::IndexMap;
use std::collections::BTreeSet;

use super::first_follow::{FirstSets, FollowSets};
use super::pretty_print::align_columns;
use super::{Alternative, Grammar, SymbolClassifier, EPSILON};

/// Coordinates of a table cell: row nonterminal, column terminal (or `$`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub non_terminal: String,
    pub terminal: String,
}

impl CellKey {
    pub fn new(non_terminal: &str, terminal: &str) -> Self {
        Self {
            non_terminal: non_terminal.to_string(),
            terminal: terminal.to_string(),
        }
    }
}

/// Predictive parsing table. A cell holding more than one alternative is a
/// conflict; alternatives are kept in the order they were assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LL1Table {
    non_terminals: Vec<String>,
    terminals: Vec<String>,
    cells: IndexMap<CellKey, Vec<Alternative>>,
}

impl LL1Table {
    pub fn build(
        grammar: &Grammar,
        classifier: &SymbolClassifier,
        first: &FirstSets,
        follow: &FollowSets,
    ) -> Self {
        let mut terminals: BTreeSet<&str> = BTreeSet::new();
        for (_, set) in first.iter() {
            terminals.extend(set.iter().map(|s| s.as_str()).filter(|s| *s != EPSILON));
        }
        for (_, set) in follow.iter() {
            terminals.extend(set.iter().map(|s| s.as_str()));
        }

        let mut table = Self {
            non_terminals: grammar.non_terminals().map(|s| s.to_string()).collect(),
            terminals: terminals.into_iter().map(|s| s.to_string()).collect(),
            cells: IndexMap::new(),
        };

        for production in grammar.productions() {
            let left = production.left.as_str();
            for alternative in &production.alternatives {
                let first_alpha = first.of_sequence(alternative.symbols(), classifier);

                for a in first_alpha.iter().filter(|s| *s != EPSILON) {
                    table.assign(left, a, alternative);
                }

                if first_alpha.contains(EPSILON) {
                    if let Some(follow_left) = follow.get(left) {
                        for b in follow_left {
                            table.assign(left, b, alternative);
                        }
                    }
                }
            }
        }

        table
    }

    /// Sets an empty cell, or appends to an occupied one
    fn assign(&mut self, non_terminal: &str, terminal: &str, alternative: &Alternative) {
        let cell = self
            .cells
            .entry(CellKey::new(non_terminal, terminal))
            .or_insert_with(Vec::new);
        if !cell.contains(alternative) {
            cell.push(alternative.clone());
        }
    }

    pub fn non_terminals(&self) -> &[String] {
        &self.non_terminals
    }

    /// Every terminal found in a FIRST or FOLLOW set, sorted
    pub fn terminals(&self) -> &[String] {
        &self.terminals
    }

    pub fn get(&self, non_terminal: &str, terminal: &str) -> Option<&[Alternative]> {
        self.cells
            .get(&CellKey::new(non_terminal, terminal))
            .map(|c| c.as_slice())
    }

    /// Cells in assignment order
    pub fn cells(&self) -> impl Iterator<Item = (&CellKey, &[Alternative])> {
        self.cells.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn conflicts(&self) -> impl Iterator<Item = (&CellKey, &[Alternative])> {
        self.cells().filter(|(_, alternatives)| alternatives.len() > 1)
    }

    pub fn is_ll1(&self) -> bool {
        self.conflicts().next().is_none()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// `A -> α | β` for an occupied cell, empty otherwise
    pub fn cell_to_string(&self, non_terminal: &str, terminal: &str) -> String {
        match self.get(non_terminal, terminal) {
            Some(alternatives) => format!(
                "{} -> {}",
                non_terminal,
                alternatives
                    .iter()
                    .map(|a| a.to_string())
                    .collect::<Vec<_>>()
                    .join(" | ")
            ),
            None => String::new(),
        }
    }

    pub fn to_plaintext(&self) -> String {
        let mut header: Vec<String> = vec![String::new()];
        header.extend(self.terminals.iter().cloned());
        let mut output: Vec<Vec<String>> = vec![header];
        for left in &self.non_terminals {
            let mut line: Vec<String> = vec![left.clone()];
            line.extend(self.terminals.iter().map(|t| self.cell_to_string(left, t)));
            output.push(line);
        }

        align_columns(&output)
    }

    pub fn to_latex(&self) -> String {
        let mut header: Vec<String> = vec![format!(
            "\\[\\begin{{array}}{{c{}}}\n",
            "|l".repeat(self.terminals.len()),
        )];
        header.extend(
            self.terminals
                .iter()
                .map(|t| format!("\\text{{{}}}", escape_tex(t.as_str()))),
        );
        let header = header.join(" & ");

        let mut output: Vec<String> = Vec::new();
        for left in &self.non_terminals {
            let mut line: Vec<String> = vec![escape_tex(left.as_str()).to_string()];
            line.extend(self.terminals.iter().map(|t| match self.get(left, t) {
                Some(alternatives) => {
                    let cell = format!(
                        "{} \\rightarrow {}",
                        escape_tex(left.as_str()),
                        alternatives
                            .iter()
                            .map(|a| escape_tex(a.to_string()).replace(EPSILON, "\\epsilon"))
                            .collect::<Vec<_>>()
                            .join(" \\mid ")
                    );
                    if alternatives.len() > 1 {
                        format!("{{\\color{{red}}{}}}", cell)
                    } else {
                        cell
                    }
                }
                None => String::new(),
            }));
            output.push(line.join(" & "));
        }

        let output = output.join("\\\\\n");

        header + "\\\\\\hline\n" + &output + "\n\\end{array}\\]"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_of(g: &Grammar) -> LL1Table {
        let c = g.classifier();
        let first = FirstSets::compute(g, &c);
        let follow = FollowSets::compute(g, &c, &first);
        LL1Table::build(g, &c, &first, &follow)
    }

    fn cell(t: &LL1Table, nt: &str, terminal: &str) -> Vec<String> {
        t.get(nt, terminal)
            .unwrap_or(&[])
            .iter()
            .map(|a| a.to_string())
            .collect()
    }

    #[test]
    fn arithmetic_is_ll1() {
        let g = Grammar::arithmetic().eliminate_left_recursion();
        let t = table_of(&g);
        assert!(t.is_ll1());
        assert_eq!(
            t.terminals(),
            &["$", "(", ")", "*", "+", "-", "/", "ID", "NUM"]
        );
        assert_eq!(t.non_terminals(), &["E", "E'", "T", "T'", "F"]);
        assert_eq!(t.len(), 19);
        assert_eq!(cell(&t, "E", "ID"), vec!["T E'"]);
        assert_eq!(cell(&t, "E'", "+"), vec!["+ T E'"]);
        assert_eq!(cell(&t, "E'", ")"), vec!["ε"]);
        assert_eq!(cell(&t, "E'", "$"), vec!["ε"]);
        assert_eq!(cell(&t, "T'", "+"), vec!["ε"]);
        assert_eq!(cell(&t, "F", "("), vec!["( E )"]);
        assert!(t.get("F", "$").is_none());
    }

    #[test]
    fn common_prefix_conflict() {
        let g = Grammar::parse("S -> a b | a c").unwrap();
        let t = table_of(&g);
        assert!(!t.is_ll1());
        assert_eq!(cell(&t, "S", "a"), vec!["a b", "a c"]);
        assert_eq!(t.cell_to_string("S", "a"), "S -> a b | a c");
        assert_eq!(t.conflicts().count(), 1);
    }

    #[test]
    fn first_follow_conflict_keeps_detection_order() {
        let g = Grammar::parse("S -> A a\nA -> a | ε").unwrap();
        let t = table_of(&g);
        assert_eq!(cell(&t, "A", "a"), vec!["a", "ε"]);
    }

    #[test]
    fn same_alternative_is_not_a_conflict() {
        let g = Grammar::parse("S -> A x\nA -> B\nB -> x | ε").unwrap();
        let t = table_of(&g);
        assert_eq!(cell(&t, "A", "x"), vec!["B"]);
        assert_eq!(cell(&t, "B", "x"), vec!["x", "ε"]);
        let conflicts: Vec<&CellKey> = t.conflicts().map(|(k, _)| k).collect();
        assert_eq!(conflicts, vec![&CellKey::new("B", "x")]);
    }

    #[test]
    fn left_recursion_conflicts() {
        let t = table_of(&Grammar::arithmetic());
        assert!(!t.is_ll1());
        assert_eq!(cell(&t, "E", "ID"), vec!["E + T", "E - T", "T"]);
    }

    #[test]
    fn plaintext() {
        let g = Grammar::parse("S -> a S | b").unwrap();
        let t = table_of(&g);
        assert_eq!(
            t.to_plaintext(),
            "  | $ |        a |      b\nS |   | S -> a S | S -> b"
        );
    }

    #[test]
    fn latex_marks_conflicts() {
        let g = Grammar::parse("S -> a b | a c").unwrap();
        let latex = table_of(&g).to_latex();
        assert!(latex.contains("{\\color{red}S \\rightarrow a b \\mid a c}"));
        assert!(!latex.contains("textgreater"));
    }

    #[test]
    fn latex_escapes_symbols_not_arrows() {
        let g = Grammar::parse("S -> a S | ε").unwrap();
        let latex = table_of(&g).to_latex();
        assert!(latex.contains("S & S \\rightarrow \\epsilon & S \\rightarrow a S"));
        assert!(!latex.contains("color"));
    }
}
