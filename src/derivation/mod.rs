/*
    This module searches for leftmost derivations: deterministic
    backtracking from the start symbol toward a target string, with the
    membership check layered on top of it
*/

use itertools::Itertools;

use crate::grammar::{resolver, Grammar, EPSILON};

// The sequence of sentential forms from the start symbol to the
// target, one substitution per step
pub type Derivation = Vec<String>;

// Depth bound for rendering a derivation
pub const DERIVATION_DEPTH: usize = 200;
// Deeper bound for plain membership checks
pub const RECOGNITION_DEPTH: usize = 2000;

// Joins the forms of a derivation with the derivation arrow, showing ε
// for an empty form
pub fn render(derivation: &Derivation) -> String {
    derivation
        .iter()
        .map(|form| if form.is_empty() { EPSILON } else { form.as_str() })
        .join("=>")
}

impl Grammar {
    /// Searches for a leftmost derivation of `target`, trying
    /// production alternatives in declaration order. The search is
    /// deterministic, and a `None` means no derivation was found
    /// within `max_depth` — not that the target is outside the
    /// language.
    pub fn derive(&self, target: &str, max_depth: usize) -> Option<Derivation> {
        if target.is_empty() {
            // Only a direct ε production of the start symbol yields the
            // empty string; no search is attempted for the empty target
            let erasable = self
                .productions
                .get(&self.start_symbol)
                .is_some_and(|alternatives| alternatives.iter().any(String::is_empty));
            return erasable.then(|| vec![self.start_symbol.clone(), String::new()]);
        }

        // Slack for not-yet-expanded non-terminal placeholders. This
        // bound has no completeness proof: grammars whose right-hand
        // sides are long relative to their non-terminal symbols can be
        // pruned into false negatives.
        let slack = self.sorted_non_terminals.first().map_or(0, String::len);
        self.derive_from(&self.start_symbol, target, 0, max_depth, target.len() + slack)
    }

    /// True iff a leftmost derivation of `target` was found within
    /// `max_depth`. Shares the search's incompleteness: `false` means
    /// "not found within bounds".
    pub fn recognizes(&self, target: &str, max_depth: usize) -> bool {
        self.derive(target, max_depth).is_some()
    }

    fn derive_from(
        &self,
        form: &str,
        target: &str,
        depth: usize,
        max_depth: usize,
        max_form_length: usize,
    ) -> Option<Derivation> {
        if form == target {
            return Some(vec![form.to_string()]);
        }
        if depth > max_depth {
            return None;
        }

        let (position, non_terminal) = self.leftmost_non_terminal(form)?;
        let span = position..position + non_terminal.len();

        // Everything before the leftmost non-terminal is settled; it
        // must literally prefix the target
        if !target.starts_with(&form[..position]) {
            return None;
        }

        for right in self.productions.get(non_terminal)? {
            let candidate = resolver::splice(form, span.clone(), right);
            if candidate.len() > max_form_length {
                continue;
            }
            if let Some(tail) = self.derive_from(&candidate, target, depth + 1, max_depth, max_form_length) {
                let mut path = Vec::with_capacity(tail.len() + 1);
                path.push(form.to_string());
                path.extend(tail);
                return Some(path);
            }
        }

        None
    }

    // The non-terminal occurrence with the smallest starting index
    // anywhere in the form. Ties at the same index go to the symbol
    // earlier in the length-descending order, so the longer one.
    fn leftmost_non_terminal(&self, form: &str) -> Option<(usize, &str)> {
        let mut leftmost: Option<(usize, &str)> = None;

        for symbol in &self.sorted_non_terminals {
            if let Some(index) = form.find(symbol.as_str()) {
                if leftmost.map_or(true, |(best, _)| index < best) {
                    leftmost = Some((index, symbol.as_str()));
                }
            }
        }

        leftmost
    }
}
