//! Sort allow-list and numeric-aware string collation.

use serde::Serialize;
use std::cmp::Ordering;
use tracing::warn;

/// A sortable field exposed to clients under a short nickname.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortOption {
    pub name: &'static str,
    pub nickname: &'static str,
    pub field: &'static str,
}

pub const SORT_OPTIONS: [SortOption; 3] = [
    SortOption { name: "Identifier", nickname: "identifier", field: "identifier" },
    SortOption { name: "Archive", nickname: "archive", field: "archive" },
    SortOption { name: "Right Ascension", nickname: "ra", field: "exposure_info.ra_deg" },
];

/// String comparison rules the store must apply while sorting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collation {
    pub locale: &'static str,
    pub numeric_ordering: bool,
}

impl Default for Collation {
    fn default() -> Self {
        Self { locale: "en_US", numeric_ordering: true }
    }
}

impl Collation {
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        if self.numeric_ordering {
            compare_numeric(a, b)
        } else {
            compare_caseless(a, b)
        }
    }
}

/// Ascending sort on one field path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub field: &'static str,
    pub collation: Collation,
}

impl SortSpec {
    /// Look up `key` in [`SORT_OPTIONS`], falling back to `identifier`.
    pub fn for_key(key: &str) -> Self {
        let option = SORT_OPTIONS.iter().find(|o| o.nickname.eq_ignore_ascii_case(key.trim()));
        let field = match option {
            Some(o) => o.field,
            None => {
                warn!(sort_key = key, "unknown sort key, sorting by identifier");
                SORT_OPTIONS[0].field
            }
        };
        Self { field, collation: Collation::default() }
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self { field: SORT_OPTIONS[0].field, collation: Collation::default() }
    }
}

/// Primary weight class: symbols and spaces, then digits, then letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum CharClass {
    Symbol,
    Digit,
    Letter,
}

fn char_key(c: char) -> (CharClass, char) {
    let class = if c.is_ascii_digit() {
        CharClass::Digit
    } else if c.is_alphanumeric() {
        CharClass::Letter
    } else {
        CharClass::Symbol
    };
    (class, c.to_lowercase().next().unwrap_or(c))
}

fn digit_run(s: &str) -> &str {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    &s[..end]
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn caseless_chars(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}

/// Lowercase sorts before uppercase when strings differ only by case.
fn case_tiebreak(a: &str, b: &str) -> Ordering {
    a.chars()
        .map(char::is_uppercase)
        .cmp(b.chars().map(char::is_uppercase))
        .then_with(|| a.cmp(b))
}

fn compare_caseless(a: &str, b: &str) -> Ordering {
    caseless_chars(a).cmp(caseless_chars(b)).then_with(|| case_tiebreak(a, b))
}

/// Compare with embedded digit runs ordered by numeric value, so that
/// `plate-9 < plate-10`. Other characters compare case-insensitively, with
/// symbols before digits before letters (`plate-1 < plate1 < platea`); case
/// and leading zeros only break ties.
pub fn compare_numeric(a: &str, b: &str) -> Ordering {
    let (mut i, mut j) = (0, 0);
    loop {
        let (ca, cb) = match (a[i..].chars().next(), b[j..].chars().next()) {
            (None, None) => return case_tiebreak(a, b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) => (ca, cb),
        };
        if ca.is_ascii_digit() && cb.is_ascii_digit() {
            let (ra, rb) = (digit_run(&a[i..]), digit_run(&b[j..]));
            let ord = compare_digit_runs(ra, rb);
            if ord != Ordering::Equal {
                return ord;
            }
            i += ra.len();
            j += rb.len();
            continue;
        }
        let ord = char_key(ca).cmp(&char_key(cb));
        if ord != Ordering::Equal {
            return ord;
        }
        i += ca.len_utf8();
        j += cb.len_utf8();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut v: Vec<&str>) -> Vec<&str> {
        v.sort_by(|a, b| compare_numeric(a, b));
        v
    }

    #[test]
    fn digit_runs_sort_numerically() {
        assert_eq!(sorted(vec!["plate-2", "plate-10", "plate-1"]), vec!["plate-1", "plate-2", "plate-10"]);
    }

    #[test]
    fn text_is_case_insensitive_with_lowercase_first() {
        assert_eq!(sorted(vec!["B1", "a2", "A2"]), vec!["a2", "A2", "B1"]);
    }

    #[test]
    fn symbols_sort_before_digits_before_letters() {
        assert_eq!(sorted(vec!["plateb", "plate1", "plate-1"]), vec!["plate-1", "plate1", "plateb"]);
        assert_eq!(sorted(vec!["A 2", "A~1", "A1"]), vec!["A 2", "A~1", "A1"]);
    }

    #[test]
    fn leading_zeros_compare_by_value() {
        assert_ne!(compare_numeric("A007", "A7"), Ordering::Equal);
        assert_eq!(compare_numeric("A007", "A8"), Ordering::Less);
        assert_eq!(compare_numeric("A010", "A9"), Ordering::Greater);
    }

    #[test]
    fn unknown_sort_key_falls_back_to_identifier() {
        assert_eq!(SortSpec::for_key("bogus").field, "identifier");
        assert_eq!(SortSpec::for_key("RA").field, "exposure_info.ra_deg");
    }
}
