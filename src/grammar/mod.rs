/*
    This module stores context-free grammars whose symbols are
    multi-character strings written back to back with no delimiters
*/

pub mod resolver;

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use std::fmt::Display;

use itertools::Itertools;

// Printed in place of an empty alternative or sentential form
pub const EPSILON: &str = "ε";

// The right-hand-side alternatives of every non-terminal, each list
// kept in declaration order
pub type Productions = HashMap<String, Vec<String>>;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum GrammarError {
    IncompleteDefinition,
    StartSymbolNotDeclared(String),
    NonDisjointAlphabets(String),
    ProductionLeftSideInvalid(String),
    ProductionRightSideUntokenizable { left: String, residual: String },
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrammarError::IncompleteDefinition =>
                write!(f, "the definition is missing symbols, production rules or a start symbol"),
            GrammarError::StartSymbolNotDeclared(start) =>
                write!(f, "start symbol `{}` is not a declared non-terminal", start),
            GrammarError::NonDisjointAlphabets(symbol) =>
                write!(f, "symbol `{}` is declared both as a terminal and a non-terminal", symbol),
            GrammarError::ProductionLeftSideInvalid(left) =>
                write!(f, "production left side `{}` is not a declared non-terminal", left),
            GrammarError::ProductionRightSideUntokenizable { left, residual } =>
                write!(f, "production right side for `{}` contains unknown symbols at `{}`", left, residual),
        }
    }
}

#[derive(Debug)]
pub struct Grammar {
    pub non_terminals: HashSet<String>,
    pub terminals: HashSet<String>,
    pub productions: Productions,
    pub start_symbol: String,
    // Length-descending views of the alphabets, the order consumed by
    // longest-match resolution
    pub(crate) sorted_non_terminals: Vec<String>,
    pub(crate) sorted_terminals: Vec<String>,
}

impl Grammar {
    // Construction never fails; validate() decides whether the grammar
    // may be searched
    pub fn new(
        non_terminals: HashSet<String>,
        terminals: HashSet<String>,
        productions: Productions,
        start_symbol: String,
    ) -> Self {
        let sorted_non_terminals = sorted_by_length(&non_terminals);
        let sorted_terminals = sorted_by_length(&terminals);

        Grammar {
            non_terminals,
            terminals,
            productions,
            start_symbol,
            sorted_non_terminals,
            sorted_terminals,
        }
    }

    // Checks the structural invariants in order and surfaces the first
    // failure. Rejected grammars must not be handed to the searches.
    pub fn validate(&self) -> Result<(), GrammarError> {
        if self.non_terminals.is_empty()
            || self.terminals.is_empty()
            || self.start_symbol.is_empty()
            || self.productions.is_empty()
        {
            return Err(GrammarError::IncompleteDefinition);
        }

        if !self.non_terminals.contains(&self.start_symbol) {
            return Err(GrammarError::StartSymbolNotDeclared(self.start_symbol.clone()));
        }

        if let Some(shared) = self.non_terminals.intersection(&self.terminals).next() {
            return Err(GrammarError::NonDisjointAlphabets(shared.clone()));
        }

        for left in self.productions.keys() {
            if !self.non_terminals.contains(left) {
                return Err(GrammarError::ProductionLeftSideInvalid(left.clone()));
            }
        }

        // Right-hand sides must reduce to nothing under repeated
        // longest-match stripping over the combined alphabet
        let union: HashSet<String> = self.non_terminals.union(&self.terminals).cloned().collect();
        let all_symbols = sorted_by_length(&union);
        for (left, alternatives) in &self.productions {
            for right in alternatives {
                if let Some(residual) = resolver::untokenizable_suffix(right, &all_symbols) {
                    return Err(GrammarError::ProductionRightSideUntokenizable {
                        left: left.clone(),
                        residual: residual.to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

impl Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Terminals: {}", self.terminals.iter().sorted().join(", "))?;
        writeln!(f, "Non terminals: {}", self.non_terminals.iter().sorted().join(", "))?;
        writeln!(f, "Start Symbol: {}", self.start_symbol)?;
        write!(f, "Production Rules")?;

        for left in self.productions.keys().sorted() {
            let alternatives = self.productions[left]
                .iter()
                .map(|right| if right.is_empty() { EPSILON } else { right.as_str() })
                .join(" | ");
            write!(f, "\n{} -> {}", left, alternatives)?;
        }

        Ok(())
    }
}

// Stable length-descending sort, so equal-length symbols keep the
// set's iteration order within one process run
fn sorted_by_length(symbols: &HashSet<String>) -> Vec<String> {
    let mut sorted = symbols.iter().cloned().collect_vec();
    sorted.sort_by_key(|symbol| Reverse(symbol.len()));
    sorted
}
