pub mod afd;
pub mod eliminate_left_recursion;
pub mod first_follow;
pub mod grammar;
pub mod ll1_table;
pub mod parse;
pub mod predictive;
pub mod pretty_print;
pub use grammar::{Alternative, Grammar, Production, SymbolClassifier};

pub const EPSILON: &str = "ε";
pub const END_MARK: &str = "$";

/// Spellings of the empty string accepted in grammar text
pub const EPSILON_SPELLINGS: [&str; 2] = ["ε", "ϵ"];
