//! Recognizes storage names produced by the backend's upload handler.
//!
//! The upload handler names files `file-<timestamp>-<random>.<ext>`. Only
//! those names are guaranteed to exist in the file store. If the backend ever
//! changes its naming scheme this check stops matching and resolution falls
//! back to the first available candidate.

/// Extensions the upload handler accepts.
pub const KNOWN_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "txt", "xls", "xlsx"];

/// True for `file-<digits>-<digits>.<known-extension>`; extension matched
/// ASCII case-insensitively.
pub fn looks_server_generated(name: &str) -> bool {
    let Some(rest) = name.strip_prefix("file-") else {
        return false;
    };
    let Some((stem, ext)) = rest.rsplit_once('.') else {
        return false;
    };
    if !KNOWN_EXTENSIONS.iter().any(|k| ext.eq_ignore_ascii_case(k)) {
        return false;
    }
    match stem.split_once('-') {
        Some((ts, rand)) => all_digits(ts) && all_digits(rand),
        None => false,
    }
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
