use super::{Alternative, Grammar, Production};

impl Grammar {
    /// Returns an equivalent grammar without direct or indirect left
    /// recursion. `self` is left untouched and the start symbol is kept.
    ///
    /// Indirect recursion is substituted away first, in first-appearance
    /// order of the nonterminals; only then is direct recursion removed from
    /// every production, introducing `A'` for each recursive `A`.
    pub fn eliminate_left_recursion(&self) -> Grammar {
        let mut productions: Vec<Production> = self.productions().to_vec();

        substitute_leading_non_terminals(&mut productions);

        let mut used: Vec<String> = productions.iter().map(|p| p.left.clone()).collect();
        used.extend(self.terminals().into_iter().map(|t| t.to_string()));
        let mut g = Grammar::new(self.start_symbol());
        for production in &productions {
            for p in eliminate_direct_recursion(production, &mut used) {
                g.push_production(p);
            }
        }
        g
    }

    /// Nonterminals that have an alternative starting with themselves
    pub fn directly_left_recursive(&self) -> Vec<&str> {
        self.productions()
            .iter()
            .filter(|p| p.alternatives.iter().any(|a| a.starts_with(&p.left)))
            .map(|p| p.left.as_str())
            .collect()
    }
}

/// For every pair `j < i`, replaces each `A_i -> A_j γ` by `A_i -> δ γ` for
/// every `A_j -> δ`.
fn substitute_leading_non_terminals(productions: &mut [Production]) {
    for i in 0..productions.len() {
        let (before, rest) = productions.split_at_mut(i);
        let (a_i, _) = match rest.split_first_mut() {
            Some(split) => split,
            None => continue,
        };

        for a_j in before.iter() {
            if !a_i.alternatives.iter().any(|a| a.starts_with(&a_j.left)) {
                continue;
            }
            let old_alternatives = std::mem::take(&mut a_i.alternatives);
            for alternative in old_alternatives {
                if alternative.starts_with(&a_j.left) {
                    let gamma = alternative.rest();
                    for delta in &a_j.alternatives {
                        a_i.alternatives.push(delta.concat(gamma));
                    }
                } else {
                    a_i.alternatives.push(alternative);
                }
            }
        }
    }
}

/// `A -> A α | β` becomes `A -> β A'` and `A' -> α A' | ε`. A production
/// without a recursive alternative is returned unchanged.
fn eliminate_direct_recursion(production: &Production, used: &mut Vec<String>) -> Vec<Production> {
    let left = production.left.as_str();

    let mut recursive: Vec<&[String]> = Vec::new();
    let mut non_recursive: Vec<&Alternative> = Vec::new();
    for alternative in &production.alternatives {
        if alternative.starts_with(left) {
            recursive.push(alternative.rest());
        } else {
            non_recursive.push(alternative);
        }
    }

    if recursive.is_empty() {
        return vec![production.clone()];
    }

    let prime = prime_name(left, used);
    used.push(prime.clone());
    let prime_tail = [prime.as_str()];

    let alternatives = if non_recursive.is_empty() {
        vec![Alternative::new(prime_tail)]
    } else {
        non_recursive
            .into_iter()
            .map(|beta| beta.concat(&prime_tail))
            .collect()
    };

    let mut prime_alternatives: Vec<Alternative> = recursive
        .into_iter()
        .map(|alpha| Alternative::new(alpha.iter().map(|s| s.as_str()).chain(prime_tail)))
        .collect();
    prime_alternatives.push(Alternative::epsilon());

    vec![
        Production::new(left, alternatives),
        Production::new(&prime, prime_alternatives),
    ]
}

/// `A'`, with more quotes while the name is taken
fn prime_name(left: &str, used: &[String]) -> String {
    let mut name = format!("{}'", left);
    while used.iter().any(|u| *u == name) {
        name.push('\'');
    }
    name
}

#[cfg(test)]
mod tests {
    use crate::Grammar;

    fn rendered(g: &Grammar) -> Vec<String> {
        g.productions().iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn arithmetic() {
        let original = Grammar::arithmetic();
        let g = original.eliminate_left_recursion();
        assert_eq!(
            rendered(&g),
            vec![
                "E -> T E'",
                "E' -> + T E' | - T E' | ε",
                "T -> F T'",
                "T' -> * F T' | / F T' | ε",
                "F -> ( E ) | NUM | ID",
            ]
        );
        assert_eq!(g.start_symbol(), "E");
        assert_eq!(original, Grammar::arithmetic());
        assert!(g.directly_left_recursive().is_empty());
        assert_eq!(original.directly_left_recursive(), vec!["E", "T"]);
    }

    #[test]
    fn no_recursion_is_kept_unchanged() {
        let g = Grammar::parse("S -> a S | b\nA -> c | ε").unwrap();
        let h = g.eliminate_left_recursion();
        assert_eq!(h, g);
        assert_eq!(h.productions().len(), 2);
    }

    #[test]
    fn only_recursive_alternatives() {
        let g = Grammar::parse("A -> A a | A").unwrap();
        let h = g.eliminate_left_recursion();
        assert_eq!(rendered(&h), vec!["A -> A'", "A' -> a A' | A' | ε"]);
    }

    #[test]
    fn epsilon_beta() {
        let g = Grammar::parse("A -> A a | ε").unwrap();
        let h = g.eliminate_left_recursion();
        assert_eq!(rendered(&h), vec!["A -> A'", "A' -> a A' | ε"]);
    }

    #[test]
    fn indirect_recursion() {
        let g = Grammar::parse("S -> A a | b\nA -> A c | S d | e").unwrap();
        let h = g.eliminate_left_recursion();
        assert_eq!(
            rendered(&h),
            vec![
                "S -> A a | b",
                "A -> b d A' | e A'",
                "A' -> c A' | a d A' | ε",
            ]
        );
    }

    #[test]
    fn substitution_with_epsilon_delta() {
        let g = Grammar::parse("S -> A b\nA -> S c | ε").unwrap();
        let h = g.eliminate_left_recursion();
        assert_eq!(
            rendered(&h),
            vec!["S -> A b", "A -> A'", "A' -> b c A' | ε"]
        );
    }

    #[test]
    fn prime_name_is_fresh() {
        let g = Grammar::parse("E -> E + T | T\nE' -> x\nT -> id").unwrap();
        let h = g.eliminate_left_recursion();
        assert_eq!(
            rendered(&h),
            vec!["E -> T E''", "E'' -> + T E'' | ε", "E' -> x", "T -> id"]
        );
    }

    #[test]
    fn prime_name_avoids_terminals() {
        let g = Grammar::parse("A -> A x | y A'").unwrap();
        let h = g.eliminate_left_recursion();
        assert_eq!(rendered(&h), vec!["A -> y A' A''", "A'' -> x A'' | ε"]);
        assert!(h.classifier().is_terminal("A'"));
    }
}
