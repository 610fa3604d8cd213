//! Text-level predicates shared by the visual feature detectors.

use kuchikikiki::NodeRef;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::dom;
use crate::options::Quirks;

/// Month abbreviations, matched case-sensitively and in this order. Full
/// month names match through their abbreviation prefix.
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Two separators of one kind with digits (possibly none) between them.
/// Length bounds are checked separately.
static NUMERIC_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d*/\d*/\d*|\d*-\d*-\d*)$").expect("valid date pattern"));

/// Strict length-range check on the character count: `lo < len < hi`.
pub fn length_in_range(text: &str, lo: usize, hi: usize) -> bool {
    let len = text.chars().count();
    len > lo && len < hi
}

/// Plain substring containment against any of the needles.
pub fn contains_any_substring(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

/// True when the lowercased, trimmed text contains one of the words with
/// non-word characters (or the text ends) on both sides. Only the first
/// occurrence of each word is examined.
pub fn contains_whole_word(text: &str, words: &[&str], quirks: Quirks) -> bool {
    let lowered = text.to_lowercase();
    let text = lowered.trim();
    for word in words {
        if let Some(at) = text.find(word) {
            let end = at + word.len();
            let before_clear = at == 0
                || text[..at]
                    .chars()
                    .next_back()
                    .is_some_and(|c| !is_word_char(c, quirks));
            let after_clear = end == text.len()
                || text[end..]
                    .chars()
                    .next()
                    .is_some_and(|c| !is_word_char(c, quirks));
            if before_clear && after_clear {
                return true;
            }
        }
    }
    false
}

/// Word-boundary alphabet. The loose variant treats the whole `'A'..='z'`
/// code range as letters, underscores and brackets included.
fn is_word_char(c: char, quirks: Quirks) -> bool {
    if quirks.contains(Quirks::LOOSE_WORD_BOUNDS) {
        ('A'..='z').contains(&c)
    } else {
        c.is_alphabetic()
    }
}

/// True when the element sits inside an `<a>` or wraps one.
pub fn is_hyperlinked(el: &NodeRef) -> bool {
    dom::has_ancestor_tag(el, "a") || dom::has_descendant_tag(el, "a")
}

/// Date heuristic over element text.
///
/// If the text names a month, the date must read `month day` (a digit right
/// after the first space past the month) or `day month`. Otherwise a
/// space-separated token of 6 to 10 characters with exactly two `/` or two
/// `-` and digits everywhere else counts, `12/05/2019` style.
pub fn looks_like_date(text: &str, quirks: Quirks) -> bool {
    let trimmed = text.trim();
    for month in MONTHS {
        if let Some(at) = trimmed.find(month) {
            let chars: Vec<char> = trimmed.chars().collect();
            let month_at = trimmed[..at].chars().count();
            return month_date_format(&chars, month_at, quirks);
        }
    }
    numeric_date_format(trimmed)
}

fn month_date_format(chars: &[char], month_at: usize, quirks: Quirks) -> bool {
    if day_precedes_month(chars, month_at, quirks) {
        return true;
    }
    for i in month_at..chars.len() {
        if chars[i] == ' ' {
            return i + 1 < chars.len() && chars[i + 1].is_ascii_digit();
        }
    }
    false
}

/// The `20 July` shape: a space right before the month, a day digit before
/// that. The loose variant compares both day positions against `'0'` alone,
/// so most real day-first dates slip through to the month-first scan.
fn day_precedes_month(chars: &[char], month_at: usize, quirks: Quirks) -> bool {
    if month_at < 3 || chars[month_at - 1] != ' ' {
        return false;
    }
    let two_back = chars[month_at - 2];
    let three_back = chars[month_at - 3];
    if quirks.contains(Quirks::DAY_BEFORE_MONTH) {
        two_back <= '0' && (three_back == ' ' || three_back <= '0')
    } else {
        two_back.is_ascii_digit() && (three_back == ' ' || three_back.is_ascii_digit())
    }
}

fn numeric_date_format(text: &str) -> bool {
    text.split(' ')
        .any(|token| (6..=10).contains(&token.chars().count()) && NUMERIC_DATE.is_match(token))
}
