//! File names derived from feed titles
//!
//! Feed titles are untrusted, so inside the book they only ever contribute a slug.
//! The positional prefix is what makes each chapter path unique.

const MAX_SLUG_CHARS: usize = 48;

/// Stands in for a feed title that is blank
pub const UNTITLED: &str = "feed";

pub fn title_or_untitled(title: &str) -> &str {
    match title.trim() {
        "" => UNTITLED,
        trimmed => trimmed,
    }
}

/// Title as a download or output file stem
///
/// Path separators, quotes, characters reserved on common filesystems and control
/// characters become `_`, so the result is also safe inside a quoted header value.
pub fn file_stem(title: &str) -> String {
    let stem: String = title_or_untitled(title)
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if stem.chars().all(|c| c == '.') {
        UNTITLED.to_string()
    } else {
        stem
    }
}

/// Lowercase ASCII alphanumerics; every other run of characters becomes a single `-`
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len().min(MAX_SLUG_CHARS));
    let mut pending_dash = false;

    for c in title.chars() {
        if slug.len() >= MAX_SLUG_CHARS {
            break;
        }
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug.truncate(MAX_SLUG_CHARS);
    slug.trim_end_matches('-').to_string()
}

/// `{dir}/{ordinal:04}[-{slug}].{ext}` for the item at 0-based `index`
pub fn chapter_path(dir: &str, index: usize, title: &str, extension: &str) -> String {
    let ordinal = index + 1;
    let dir = dir.trim_matches('/');
    let slug = slugify(title);

    if slug.is_empty() {
        format!("{dir}/{ordinal:04}.{extension}")
    } else {
        format!("{dir}/{ordinal:04}-{slug}.{extension}")
    }
}
