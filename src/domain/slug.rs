// ==========================================
// Brand backfill - slug generator
// ==========================================
// Pure function of its input: no I/O, no uniqueness check.
// Distinct names may map to the same slug; the brand
// repository resolves collisions.
// ==========================================

use deunicode::deunicode_char;

const SEPARATOR: char = '-';

/// Dropped without leaving a separator ("Levi's" -> "levis")
fn is_apostrophe(ch: char) -> bool {
    matches!(ch, '\'' | '\u{2019}' | '\u{02BC}')
}

/// Combining diacritical marks (decomposed input)
fn is_combining_mark(ch: char) -> bool {
    matches!(ch, '\u{0300}'..='\u{036F}' | '\u{1AB0}'..='\u{1AFF}' | '\u{1DC0}'..='\u{1DFF}')
}

/// Lowercase, URL-safe identifier for a display name.
///
/// Every script is transliterated to ASCII (deunicode), apostrophes are
/// removed, every other run of non-alphanumeric characters collapses into
/// one `-`, and leading/trailing separators are dropped.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for ch in name.chars() {
        if is_combining_mark(ch) || is_apostrophe(ch) {
            continue;
        }
        let ascii = match deunicode_char(ch) {
            Some(ascii) => ascii,
            None => {
                pending_separator = true;
                continue;
            }
        };
        for c in ascii.chars() {
            if c.is_ascii_alphanumeric() {
                if pending_separator && !slug.is_empty() {
                    slug.push(SEPARATOR);
                }
                pending_separator = false;
                slug.push(c.to_ascii_lowercase());
            } else if c != '\'' {
                pending_separator = true;
            }
        }
    }

    slug
}

/// Cut a slug to at most `max_len` bytes without leaving a trailing separator
pub fn truncate_slug(slug: &str, max_len: usize) -> String {
    // slugs are ASCII, byte length == char length
    let cut = &slug[..slug.len().min(max_len)];
    cut.trim_end_matches(SEPARATOR).to_string()
}

/// `base` with the numeric suffix, shortened so the whole fits `max_len`.
/// Suffix 0 means the bare base.
pub fn with_suffix(base: &str, suffix: usize, max_len: usize) -> String {
    if suffix == 0 {
        return truncate_slug(base, max_len);
    }
    let tail = format!("{}{}", SEPARATOR, suffix);
    let room = max_len.saturating_sub(tail.len());
    format!("{}{}", truncate_slug(base, room), tail)
}
