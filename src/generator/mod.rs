/*
    This module samples terminal strings from a grammar by randomized
    backtracking over sentential forms
*/

use rand::prelude::*;

use crate::grammar::{resolver, Grammar};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

impl Grammar {
    /// Runs up to `max_attempts` independent randomized searches for a
    /// terminal string no longer than `max_length` and returns the
    /// first one found. Exhausting every attempt is a normal negative
    /// outcome: it does not prove that no such string exists, only
    /// that none was found within the depth and length bounds.
    pub fn generate(&self, max_length: usize, max_attempts: u32) -> Option<String> {
        let depth_limit = 2 * max_length + 10;
        let mut rng = thread_rng();

        for _ in 0..max_attempts {
            if let Some(found) = self.expand(&self.start_symbol, 0, max_length, depth_limit, &mut rng) {
                return Some(found);
            }
        }

        None
    }

    // One branch of one attempt. Expands the leftmost non-terminal of
    // the form with its alternatives in a fresh random order.
    fn expand(
        &self,
        form: &str,
        depth: usize,
        max_length: usize,
        depth_limit: usize,
        rng: &mut impl Rng,
    ) -> Option<String> {
        if depth > depth_limit {
            return None;
        }

        let (stripped, rest) = resolver::strip_leading_symbols(form, &self.sorted_terminals);
        if stripped > max_length {
            // The terminal prefix alone already exceeds the budget
            return None;
        }
        if rest.is_empty() {
            // Terminals only; keep the form iff it fits the budget
            return (form.len() <= max_length).then(|| form.to_string());
        }

        let (non_terminal, length) = resolver::match_leading_symbol(rest, &self.sorted_non_terminals)?;
        let alternatives = self.productions.get(non_terminal)?;
        if alternatives.is_empty() {
            return None;
        }

        let mut shuffled = alternatives.clone();
        shuffled.shuffle(rng);

        for right in &shuffled {
            let candidate = resolver::splice(form, stripped..stripped + length, right);
            if let Some(found) = self.expand(&candidate, depth + 1, max_length, depth_limit, rng) {
                return Some(found);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::derivation::RECOGNITION_DEPTH;
    use crate::grammar::{Grammar, Productions};

    fn set(symbols: &[&str]) -> HashSet<String> {
        symbols.iter().map(|s| s.to_string()).collect()
    }

    fn rules(list: &[(&str, &[&str])]) -> Productions {
        list.iter()
            .map(|(left, rights)| {
                (left.to_string(), rights.iter().map(|r| r.to_string()).collect())
            })
            .collect()
    }

    fn abc_grammar() -> Grammar {
        Grammar::new(
            set(&["S"]),
            set(&["a", "b", "c"]),
            rules(&[("S", &["abcS", ""])]),
            "S".to_string(),
        )
    }

    #[test]
    fn generated_strings_are_recognized_and_bounded() {
        let grammar = abc_grammar();

        for _ in 0..25 {
            let string = grammar.generate(9, 100).unwrap();
            assert!(string.len() <= 9);
            assert!(grammar.recognizes(&string, RECOGNITION_DEPTH));
        }
    }

    #[test]
    fn impossible_budget_exhausts_all_attempts() {
        // The shortest derivable string has length 2
        let grammar = Grammar::new(
            set(&["S"]),
            set(&["a", "b"]),
            rules(&[("S", &["ab"])]),
            "S".to_string(),
        );

        assert_eq!(grammar.generate(1, 100), None);
    }

    #[test]
    fn zero_attempts_generate_nothing() {
        assert_eq!(abc_grammar().generate(5, 0), None);
    }

    #[test]
    fn empty_production_yields_the_empty_string() {
        let grammar = Grammar::new(set(&["S"]), set(&["a"]), rules(&[("S", &[""])]), "S".to_string());

        assert_eq!(grammar.generate(4, 100), Some(String::new()));
    }

    #[test]
    fn multi_character_symbols_stay_intact() {
        let grammar = Grammar::new(
            set(&["Expr"]),
            set(&["num", "+"]),
            rules(&[("Expr", &["num+Expr", "num"])]),
            "Expr".to_string(),
        );

        for _ in 0..25 {
            let string = grammar.generate(10, 100).unwrap();
            assert!(string == "num" || string == "num+num");
        }
    }
}
