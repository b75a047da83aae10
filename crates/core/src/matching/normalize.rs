//! Text normalization for fuzzy filename comparison.
//!
//! Filenames on file hosters use every separator imaginable
//! (`Pernikova.vez.S01E01`, `Perníková věž - S01E01`, `pernikova_vez_s01e01`).
//! [`normalize`] reduces all of them to the same dotted lowercase ASCII form so
//! a plain substring test can compare a title against a filename.

/// Czech and Slovak characters and their unaccented equivalents.
///
/// Applied after lowercasing, so only lowercase forms are listed.
const DIACRITICS: &[(char, char)] = &[
    ('á', 'a'),
    ('č', 'c'),
    ('ď', 'd'),
    ('é', 'e'),
    ('ě', 'e'),
    ('í', 'i'),
    ('ň', 'n'),
    ('ó', 'o'),
    ('ř', 'r'),
    ('š', 's'),
    ('ť', 't'),
    ('ú', 'u'),
    ('ů', 'u'),
    ('ý', 'y'),
    ('ž', 'z'),
    ('ľ', 'l'),
    ('ĺ', 'l'),
    ('ŕ', 'r'),
    ('ä', 'a'),
    ('ô', 'o'),
];

fn strip_diacritic(c: char) -> char {
    DIACRITICS
        .iter()
        .find(|(from, _)| *from == c)
        .map(|(_, to)| *to)
        .unwrap_or(c)
}

/// Canonicalize text for comparison.
///
/// Lowercases, removes Czech/Slovak diacritics, turns spaces, underscores and
/// hyphens into `.`, drops everything outside `[a-z0-9.]`, collapses repeated
/// dots and trims dots from both ends. Empty input gives empty output.
///
/// The function is idempotent: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for c in text.chars().flat_map(char::to_lowercase) {
        let c = match strip_diacritic(c) {
            ' ' | '_' | '-' => '.',
            other => other,
        };

        if c == '.' {
            // Collapse runs and skip leading dots in one go.
            if !out.is_empty() && !out.ends_with('.') {
                out.push('.');
            }
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
        }
    }

    while out.ends_with('.') {
        out.pop();
    }
    out
}

/// Collapse internal whitespace runs to single spaces and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract a release year from a catalog date such as `2008-01-20`.
///
/// Only the first four characters are considered, and they must look like a
/// year from 1900 to 2099.
pub fn parse_year(date: &str) -> Option<u16> {
    let prefix = date.get(..4)?;
    if looks_like_year(prefix) {
        prefix.parse().ok()
    } else {
        None
    }
}

/// Check whether a token is a 4-digit `19xx` / `20xx` year.
pub fn looks_like_year(token: &str) -> bool {
    token.len() == 4
        && token.bytes().all(|b| b.is_ascii_digit())
        && (token.starts_with("19") || token.starts_with("20"))
}
