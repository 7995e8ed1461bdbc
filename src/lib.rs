extern crate wasm_bindgen;

use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod analysis;
pub mod errors;
pub mod grammar;
pub mod lexer;
pub mod log;

pub use analysis::Analysis;
pub use grammar::Grammar;

/// An empty text selects the built-in arithmetic grammar
fn analyze(grammar: &str) -> errors::Result<Analysis> {
    if grammar.trim().is_empty() {
        Ok(Analysis::new(Grammar::arithmetic()))
    } else {
        Ok(Analysis::new(Grammar::parse(grammar)?))
    }
}

fn error_json<E: std::fmt::Display>(e: E) -> String {
    serde_json::json!({ "error": e.to_string() }).to_string()
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(error_json)
}

#[wasm_bindgen]
pub fn first_follow_to_json(grammar: &str) -> String {
    match analyze(grammar) {
        Ok(a) => a
            .first()
            .to_non_terminal_output_vec(a.follow())
            .to_json()
            .unwrap_or_else(error_json),
        Err(e) => error_json(e),
    }
}

#[wasm_bindgen]
pub fn ll1_table_to_json(grammar: &str) -> String {
    match analyze(grammar) {
        Ok(a) => to_json(&a.table().to_output()),
        Err(e) => error_json(e),
    }
}

#[wasm_bindgen]
pub fn afd_to_json(grammar: &str) -> String {
    match analyze(grammar) {
        Ok(a) => to_json(&a.afd().to_output()),
        Err(e) => error_json(e),
    }
}

#[wasm_bindgen]
pub fn validate_to_json(grammar: &str, source: &str) -> String {
    match analyze(grammar) {
        Ok(a) => to_json(&a.validate_source(source)),
        Err(e) => error_json(e),
    }
}

#[cfg(test)]
mod parse_tests {
    use crate::errors::Error;
    use crate::grammar::Alternative;

    #[test]
    fn simple_parse() {
        let g = crate::Grammar::parse("S -> a").unwrap();
        assert_eq!(g.start_symbol(), "S");
        assert_eq!(
            g.production("S").unwrap().alternatives,
            vec![Alternative::parse("a")]
        );
        assert!(g.classifier().is_terminal("a"));
    }

    #[test]
    fn simple_parse_with_space() {
        let g = crate::Grammar::parse("  S -> a ").unwrap();
        assert_eq!(g.non_terminals().collect::<Vec<_>>(), vec!["S"]);
        assert_eq!(g.terminals(), vec!["a"]);
    }

    #[test]
    fn simple_parse_with_space_and_newline() {
        let g = crate::Grammar::parse("  S -> a \n | b c").unwrap();
        assert_eq!(
            g.production("S").unwrap().alternatives,
            vec![Alternative::parse("a"), Alternative::parse("b c")]
        );
        assert_eq!(g.terminals(), vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_parse() {
        assert_eq!(crate::Grammar::parse("  \n  "), Err(Error::EmptyGrammar));
    }

    #[test]
    #[should_panic]
    fn two_rightarrows_parse() {
        let _g = crate::Grammar::parse("S -> a -> b").unwrap();
    }

    #[test]
    #[should_panic]
    fn no_left_parse() {
        let _g = crate::Grammar::parse("-> a").unwrap();
    }

    #[test]
    #[should_panic]
    fn no_previous_left_parse() {
        let _g = crate::Grammar::parse("| a b\n S -> a").unwrap();
    }

    #[test]
    #[should_panic]
    fn left_contain_space() {
        let _g = crate::Grammar::parse("S a S -> x").unwrap();
    }
}
