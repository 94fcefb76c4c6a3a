//! Case-insensitive, digit-run-aware string ordering.
//!
//! This is the canonical ordering for books within a series: embedded runs of
//! ASCII digits compare as numbers ("Chapter 2" before "Chapter 10"), all
//! other characters compare case-insensitively.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

/// Compare two names using natural ordering.
///
/// Leading zeros are ignored when comparing digit runs, so "002" and "2"
/// compare equal and the surrounding text decides.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut ca = a.chars().peekable();
    let mut cb = b.chars().peekable();

    loop {
        match (ca.peek().copied(), cb.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                if x.is_ascii_digit() && y.is_ascii_digit() {
                    let run_a = take_digit_run(&mut ca);
                    let run_b = take_digit_run(&mut cb);
                    match cmp_digit_runs(&run_a, &run_b) {
                        Ordering::Equal => continue,
                        other => return other,
                    }
                }

                let ordering = x.to_lowercase().cmp(y.to_lowercase());
                if ordering != Ordering::Equal {
                    return ordering;
                }
                ca.next();
                cb.next();
            }
        }
    }
}

fn take_digit_run(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(ch) = chars.peek().copied() {
        if !ch.is_ascii_digit() {
            break;
        }
        run.push(ch);
        chars.next();
    }
    run
}

fn cmp_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    // After stripping leading zeros, the longer run is the bigger number.
    match a.len().cmp(&b.len()) {
        Ordering::Equal => a.cmp(b),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_runs_compare_numerically() {
        assert_eq!(natural_cmp("Chapter 2", "Chapter 10"), Ordering::Less);
        assert_eq!(natural_cmp("Chapter 10", "Chapter 2"), Ordering::Greater);
        assert_eq!(natural_cmp("vol 99", "vol 100"), Ordering::Less);
    }

    #[test]
    fn comparison_is_case_insensitive() {
        assert_eq!(natural_cmp("apple", "Banana"), Ordering::Less);
        assert_eq!(natural_cmp("APPLE", "apple"), Ordering::Equal);
    }

    #[test]
    fn leading_zeros_do_not_matter() {
        assert_eq!(natural_cmp("book 002", "book 2"), Ordering::Equal);
        assert_eq!(natural_cmp("book 002", "book 3"), Ordering::Less);
    }

    #[test]
    fn plain_text_falls_back_to_lexicographic() {
        assert_eq!(natural_cmp("alpha", "beta"), Ordering::Less);
        assert_eq!(natural_cmp("alpha", "alphabet"), Ordering::Less);
    }

    #[test]
    fn sorting_a_shelf_looks_human() {
        let mut names = vec!["Book 10", "book 2", "Book 1", "Annex", "book 21"];
        names.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(names, vec!["Annex", "Book 1", "book 2", "Book 10", "book 21"]);
    }
}
