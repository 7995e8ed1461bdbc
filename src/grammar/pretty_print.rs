use crowbook_text_processing::escape;
use serde::Serialize;

use super::afd::{Afd, State, Step, Validation};
use super::first_follow::{FirstSets, FollowSets};
use super::ll1_table::LL1Table;
use super::predictive::{Move, Recognition};
use super::{Grammar, EPSILON};

/// Right-aligns every column and joins cells with ` | `
pub(crate) fn align_columns(rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    let width: Vec<usize> = (0..columns)
        .map(|j| {
            rows.iter()
                .filter_map(|r| r.get(j))
                .map(|s| s.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();
    rows.iter()
        .map(|line| {
            line.iter()
                .enumerate()
                .map(|(i, s)| format!("{:>width$}", s, width = width[i]))
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn tex_symbols(symbols: &[&str]) -> String {
    symbols
        .iter()
        .map(|s| escape::tex(*s))
        .collect::<Vec<_>>()
        .join(r"\ ")
        .replace(EPSILON, r"$\epsilon$")
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductionOutput<'a> {
    pub left: &'a str,
    pub rights: Vec<Vec<&'a str>>,
}

impl ProductionOutput<'_> {
    pub fn to_plaintext(&self, left_width: usize, multiline: bool) -> String {
        self.rights
            .iter()
            .map(|right| right.join(" "))
            .enumerate()
            .map(|(i, right)| {
                if i == 0 {
                    format!("{:>width$} -> {}", self.left, right, width = left_width)
                } else if multiline {
                    format!("{:>width$}  | {}", "", right, width = left_width)
                } else {
                    format!(" | {}", right)
                }
            })
            .collect::<Vec<_>>()
            .join(if multiline { "\n" } else { "" })
    }

    pub fn to_latex(&self, and_sign: bool) -> String {
        if self.rights.is_empty() {
            return String::new();
        }

        let left = if and_sign {
            format!("{} & \\rightarrow &", escape::tex(self.left))
        } else {
            format!("{} \\rightarrow ", escape::tex(self.left))
        };
        let right = self
            .rights
            .iter()
            .map(|right| {
                right
                    .iter()
                    .map(|s| escape::tex(*s))
                    .collect::<Vec<_>>()
                    .join(" \\ ")
            })
            .collect::<Vec<_>>()
            .join(" \\mid ");

        (left + &right).replace(EPSILON, "\\epsilon")
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct ProductionOutputVec<'a> {
    productions: Vec<ProductionOutput<'a>>,
}

impl ProductionOutputVec<'_> {
    pub fn to_plaintext(&self) -> String {
        let left_max_len = self
            .productions
            .iter()
            .map(|p| p.left.chars().count())
            .max()
            .unwrap_or(0);
        self.productions
            .iter()
            .map(|s| s.to_plaintext(left_max_len, true))
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        std::iter::once("\\[\\begin{array}{cll}".to_string())
            .chain(self.productions.iter().map(|s| s.to_latex(true)))
            .chain(std::iter::once("\\end{array}\\]".to_string()))
            .collect::<Vec<String>>()
            .join("\\\\\n")
    }
}

impl Grammar {
    pub fn to_production_output_vec(&self) -> ProductionOutputVec {
        let productions = self
            .productions()
            .iter()
            .map(|p| ProductionOutput {
                left: p.left.as_str(),
                rights: p
                    .alternatives
                    .iter()
                    .map(|a| {
                        if a.is_epsilon() {
                            vec![EPSILON]
                        } else {
                            a.symbols().iter().map(|s| s.as_str()).collect()
                        }
                    })
                    .collect(),
            })
            .collect();
        ProductionOutputVec { productions }
    }
}

#[derive(Serialize)]
struct NonTerminalOutput<'a> {
    name: &'a str,
    nullable: bool,
    first: Vec<&'a str>,
    follow: Vec<&'a str>,
}

impl NonTerminalOutput<'_> {
    fn to_plaintext(&self) -> String {
        format!(
            "{} | {} | {} | {}",
            self.name,
            self.nullable,
            self.first.join(", "),
            self.follow.join(", ")
        )
    }

    fn to_latex(&self) -> String {
        format!(
            "{} & {} & {} & {}",
            escape::tex(self.name),
            self.nullable,
            tex_symbols(&self.first),
            tex_symbols(&self.follow)
        )
    }
}

#[derive(Serialize)]
#[serde(transparent)]
pub struct NonTerminalOutputVec<'a> {
    data: Vec<NonTerminalOutput<'a>>,
}

impl NonTerminalOutputVec<'_> {
    pub fn to_plaintext(&self) -> String {
        self.data
            .iter()
            .map(|s| s.to_plaintext())
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_latex(&self) -> String {
        let content = self
            .data
            .iter()
            .map(|e| e.to_latex())
            .collect::<Vec<_>>()
            .join("\\\\\n ");

        "\\begin{tabular}{c|c|c|c}\n".to_string()
            + "Symbol & Nullable & First & Follow\\\\\\hline\n"
            + &content
            + "\\\\\n\\end{tabular}"
    }
}

impl FirstSets {
    /// One row per nonterminal; `ε` is listed last in FIRST
    pub fn to_non_terminal_output_vec<'a>(
        &'a self,
        follow: &'a FollowSets,
    ) -> NonTerminalOutputVec<'a> {
        let data = self
            .iter()
            .map(|(name, set)| {
                let mut first: Vec<&str> = set
                    .iter()
                    .map(|s| s.as_str())
                    .filter(|s| *s != EPSILON)
                    .collect();
                let nullable = set.contains(EPSILON);
                if nullable {
                    first.push(EPSILON);
                }
                NonTerminalOutput {
                    name,
                    nullable,
                    first,
                    follow: follow
                        .get(name)
                        .map(|f| f.iter().map(|s| s.as_str()).collect())
                        .unwrap_or_default(),
                }
            })
            .collect();
        NonTerminalOutputVec { data }
    }
}

#[derive(Serialize)]
pub struct CellOutput<'a> {
    non_terminal: &'a str,
    terminal: &'a str,
    alternatives: Vec<String>,
}

#[derive(Serialize)]
pub struct LL1TableOutput<'a> {
    non_terminals: &'a [String],
    terminals: &'a [String],
    cells: Vec<CellOutput<'a>>,
    is_ll1: bool,
}

impl LL1Table {
    pub fn to_output(&self) -> LL1TableOutput {
        LL1TableOutput {
            non_terminals: self.non_terminals(),
            terminals: self.terminals(),
            cells: self
                .cells()
                .map(|(key, alternatives)| CellOutput {
                    non_terminal: key.non_terminal.as_str(),
                    terminal: key.terminal.as_str(),
                    alternatives: alternatives.iter().map(|a| a.to_string()).collect(),
                })
                .collect(),
            is_ll1: self.is_ll1(),
        }
    }
}

#[derive(Serialize)]
pub struct AfdOutput<'a> {
    states: &'a [State],
    alphabet: Vec<&'a str>,
    start: usize,
    finals: Vec<usize>,
    transitions: Vec<Step>,
    reachable_states: usize,
    density: f64,
}

impl Afd {
    pub fn to_output(&self) -> AfdOutput {
        AfdOutput {
            states: self.states(),
            alphabet: self.alphabet().iter().map(|s| s.as_str()).collect(),
            start: self.start(),
            finals: self.finals().iter().copied().collect(),
            transitions: self.transitions(),
            reachable_states: self.reachable_states(),
            density: self.density(),
        }
    }

    fn state_name(&self, id: usize) -> String {
        self.state(id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| format!("q{}", id))
    }

    fn state_names<I: IntoIterator<Item = usize>>(&self, ids: I) -> String {
        ids.into_iter()
            .map(|id| self.state_name(id))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Formal definition, transition matrix and a few statistics
    pub fn to_plaintext(&self) -> String {
        let mut output: Vec<String> = vec![
            format!("Q = {{{}}}", self.state_names(self.states().iter().map(|s| s.id))),
            format!(
                "Σ = {{{}}}",
                self.alphabet()
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            format!("q0 = {}", self.state_name(self.start())),
            format!("F = {{{}}}", self.state_names(self.finals().iter().copied())),
            String::new(),
        ];

        let mut header: Vec<String> = vec!["δ".to_string()];
        header.extend(self.alphabet().iter().cloned());
        let mut rows: Vec<Vec<String>> = vec![header];
        for state in self.states() {
            let marker = if state.is_initial {
                "->"
            } else if state.is_final {
                "*"
            } else {
                ""
            };
            let mut row: Vec<String> = vec![format!("{} {}", marker, state.name)];
            row.extend(self.alphabet().iter().map(|symbol| {
                match state.transitions.get(symbol) {
                    Some(&to) => self.state_name(to),
                    None => "-".to_string(),
                }
            }));
            rows.push(row);
        }
        output.push(align_columns(&rows));

        output.push(String::new());
        output.push(format!(
            "transitions: {}, reachable states: {}/{}, density: {:.2}%",
            self.transition_count(),
            self.reachable_states(),
            self.states().len(),
            self.density()
        ));
        output.join("\n")
    }

    pub fn to_latex(&self) -> String {
        let mut header: Vec<String> = vec![format!(
            "\\[\\begin{{array}}{{c{}}}\n\\delta",
            "|l".repeat(self.alphabet().len()),
        )];
        header.extend(
            self.alphabet()
                .iter()
                .map(|t| format!("\\text{{{}}}", escape::tex(t.as_str()))),
        );
        let header = header.join(" & ");

        let output = self
            .states()
            .iter()
            .map(|state| {
                let name = escape::tex(state.name.as_str()).to_string();
                let name = if state.is_initial {
                    format!("\\rightarrow {}", name)
                } else if state.is_final {
                    format!("*{}", name)
                } else {
                    name
                };
                std::iter::once(name)
                    .chain(self.alphabet().iter().map(|symbol| {
                        match state.transitions.get(symbol) {
                            Some(&to) => escape::tex(self.state_name(to)).to_string(),
                            None => "-".to_string(),
                        }
                    }))
                    .collect::<Vec<_>>()
                    .join(" & ")
            })
            .collect::<Vec<_>>()
            .join("\\\\\n");

        header + "\\\\\\hline\n" + &output + "\n\\end{array}\\]"
    }
}

impl Validation {
    /// One `δ(from, symbol) = to` line per step, then the verdict
    pub fn to_plaintext(&self, afd: &Afd) -> String {
        self.trace
            .iter()
            .map(|step| {
                format!(
                    "δ({}, {}) = {}",
                    afd.state_name(step.from),
                    step.symbol,
                    afd.state_name(step.to)
                )
            })
            .chain(std::iter::once(verdict(self.accepted).to_string()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Recognition {
    pub fn to_plaintext(&self) -> String {
        self.moves
            .iter()
            .map(|m| match m {
                Move::Expand {
                    non_terminal,
                    lookahead,
                    alternative,
                } => format!("{}: {} -> {}", lookahead, non_terminal, alternative),
                Move::Match { terminal } => format!("match {}", terminal),
            })
            .chain(std::iter::once(verdict(self.accepted).to_string()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn verdict(accepted: bool) -> &'static str {
    if accepted {
        "accepted"
    } else {
        "rejected"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn artifacts(g: &Grammar) -> (FirstSets, FollowSets, LL1Table, Afd) {
        let c = g.classifier();
        let first = FirstSets::compute(g, &c);
        let follow = FollowSets::compute(g, &c, &first);
        let table = LL1Table::build(g, &c, &first, &follow);
        let afd = Afd::build(g, &table, &follow);
        (first, follow, table, afd)
    }

    #[test]
    fn productions_plaintext() {
        let g = Grammar::parse("S -> a S | ε\nAB -> b").unwrap();
        assert_eq!(
            g.to_production_output_vec().to_plaintext(),
            " S -> a S\n    | ε\nAB -> b"
        );
    }

    #[test]
    fn productions_latex() {
        let g = Grammar::parse("S -> a | ε").unwrap();
        assert_eq!(
            g.to_production_output_vec().to_latex(),
            "\\[\\begin{array}{cll}\\\\\nS & \\rightarrow &a \\mid \\epsilon\\\\\n\\end{array}\\]"
        );
    }

    #[test]
    fn first_follow_rows() {
        let g = Grammar::parse("S -> A b\nA -> a | ε").unwrap();
        let (first, follow, _, _) = artifacts(&g);
        let out = first.to_non_terminal_output_vec(&follow);
        assert_eq!(out.to_plaintext(), "S | false | a, b | $\nA | true | a, ε | b");
        assert_eq!(
            out.to_json().unwrap(),
            r#"[{"name":"S","nullable":false,"first":["a","b"],"follow":["$"]},{"name":"A","nullable":true,"first":["a","ε"],"follow":["b"]}]"#
        );
    }

    #[test]
    fn table_json_keeps_conflicts() {
        let g = Grammar::parse("S -> a b | a c").unwrap();
        let (_, _, table, _) = artifacts(&g);
        let json = serde_json::to_string(&table.to_output()).unwrap();
        assert_eq!(
            json,
            r#"{"non_terminals":["S"],"terminals":["$","a"],"cells":[{"non_terminal":"S","terminal":"a","alternatives":["a b","a c"]}],"is_ll1":false}"#
        );
    }

    #[test]
    fn afd_plaintext() {
        let g = Grammar::parse("S -> a S | b").unwrap();
        let (_, _, _, afd) = artifacts(&g);
        assert_eq!(
            afd.to_plaintext(),
            [
                "Q = {q0_S, qF_accept}",
                "Σ = {$, a, b}",
                "q0 = q0_S",
                "F = {qF_accept}",
                "",
                "          δ |         $ |    a |    b",
                "    -> q0_S | qF_accept | q0_S | q0_S",
                "* qF_accept |         - |    - |    -",
                "",
                "transitions: 3, reachable states: 2/2, density: 50.00%",
            ]
            .join("\n")
        );
    }

    #[test]
    fn trace_plaintext() {
        let g = Grammar::arithmetic().eliminate_left_recursion();
        let (_, _, _, afd) = artifacts(&g);
        let v = afd.validate(&tokenize("id"));
        assert_eq!(
            v.to_plaintext(&afd),
            "δ(q0_E, ID) = q2_T\nδ(q2_T, $) = qF_accept\naccepted"
        );
    }
}
