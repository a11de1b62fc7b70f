/*
    Longest-match symbol resolution over undelimited symbol streams.
    Every position lookup and every sentential form rewrite in the
    crate goes through this module.
*/

use std::ops::Range;

// Finds the first symbol in a length-descending ordered list that is a
// prefix of the residual text, which makes it a longest match. Empty
// symbols never match, so a scan always makes progress.
pub fn match_leading_symbol<'a>(
    residual: &str,
    ordered_symbols: &'a [String],
) -> Option<(&'a str, usize)> {
    ordered_symbols
        .iter()
        .find(|symbol| !symbol.is_empty() && residual.starts_with(symbol.as_str()))
        .map(|symbol| (symbol.as_str(), symbol.len()))
}

// Strips the maximal run of leading symbols, longest match first, and
// returns the total stripped length together with the remaining suffix
pub fn strip_leading_symbols<'a>(form: &'a str, ordered_symbols: &[String]) -> (usize, &'a str) {
    let mut rest = form;
    let mut stripped = 0;

    while let Some((_, length)) = match_leading_symbol(rest, ordered_symbols) {
        stripped += length;
        rest = &rest[length..];
    }

    (stripped, rest)
}

// Repeatedly strips the longest leading symbol and returns the first
// residual no declared symbol matches, or None if the text reduces to
// nothing and is therefore fully tokenizable
pub fn untokenizable_suffix<'a>(text: &'a str, ordered_symbols: &[String]) -> Option<&'a str> {
    let mut rest = text;

    while !rest.is_empty() {
        match match_leading_symbol(rest, ordered_symbols) {
            Some((_, length)) => rest = &rest[length..],
            None => return Some(rest),
        }
    }

    None
}

// Replaces the [start, end) span of a matched symbol with a raw
// replacement string, producing the next sentential form
pub fn splice(form: &str, span: Range<usize>, replacement: &str) -> String {
    let mut next = String::with_capacity(form.len() - span.len() + replacement.len());
    next.push_str(&form[..span.start]);
    next.push_str(replacement);
    next.push_str(&form[span.end..]);
    next
}
