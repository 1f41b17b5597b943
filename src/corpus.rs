//! Corpus segmentation.
//!
//! Splits raw text lines into maximal runs of accepted characters.
//! Punctuation, foreign scripts, and anything else outside the accepted set
//! act as run boundaries and are dropped.

use std::collections::HashSet;

/// Lazy iterator over the accepted-character runs of one line.
pub struct Segments<'a> {
    chars: std::str::Chars<'a>,
    accepted: &'a HashSet<char>,
}

/// Iterate over the maximal runs of accepted characters in `line`, in order.
///
/// Empty lines (and lines with no accepted characters) yield nothing.
pub fn segments<'a>(line: &'a str, accepted: &'a HashSet<char>) -> Segments<'a> {
    Segments {
        chars: line.chars(),
        accepted,
    }
}

impl Iterator for Segments<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let mut run = String::new();
        for c in self.chars.by_ref() {
            if self.accepted.contains(&c) {
                run.push(c);
            } else if !run.is_empty() {
                return Some(run);
            }
        }
        if run.is_empty() {
            None
        } else {
            Some(run)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepted() -> HashSet<char> {
        ['a', 'b', 'c'].into_iter().collect()
    }

    #[test]
    fn test_splits_on_rejected_chars() {
        let acc = accepted();
        let segs: Vec<String> = segments("ab,ca.b", &acc).collect();
        assert_eq!(segs, vec!["ab", "ca", "b"]);
    }

    #[test]
    fn test_empty_line_yields_nothing() {
        let acc = accepted();
        assert_eq!(segments("", &acc).count(), 0);
    }

    #[test]
    fn test_all_rejected_yields_nothing() {
        let acc = accepted();
        assert_eq!(segments("!? 123", &acc).count(), 0);
    }

    #[test]
    fn test_fully_accepted_line_is_one_segment() {
        let acc = accepted();
        let segs: Vec<String> = segments("abcba", &acc).collect();
        assert_eq!(segs, vec!["abcba"]);
    }

    #[test]
    fn test_leading_and_trailing_boundaries() {
        let acc = accepted();
        let segs: Vec<String> = segments("!ab!", &acc).collect();
        assert_eq!(segs, vec!["ab"]);
    }
}
