//! Last-segment extraction from upload paths and URLs.

/// Returns the last path segment of a path, relative path or URL.
///
/// Absolute URLs go through the `url` crate; plain paths are split on `/` and
/// `\`. Query and fragment are dropped and percent-escapes decoded. Returns
/// `None` for roots and for `.`/`..`.
pub fn basename(value: &str) -> Option<String> {
    let value = value.trim();
    let path = match url::Url::parse(value) {
        Ok(parsed) if !parsed.cannot_be_a_base() => parsed.path().to_string(),
        _ => strip_query_and_fragment(value).to_string(),
    };
    let segment = path
        .split(|c: char| c == '/' || c == '\\')
        .filter(|s| !s.is_empty())
        .last()?;
    let decoded = percent_decode(segment);
    let decoded = decoded.trim();
    if decoded.is_empty() || decoded == "." || decoded == ".." {
        return None;
    }
    Some(decoded.to_string())
}

fn strip_query_and_fragment(s: &str) -> &str {
    let end = s.find(|c: char| c == '?' || c == '#').unwrap_or(s.len());
    &s[..end]
}

/// Lossy percent-decode; malformed escapes are kept literally.
pub(crate) fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let h = bytes.get(i + 1).copied().and_then(hex_digit);
            let l = bytes.get(i + 2).copied().and_then(hex_digit);
            if let (Some(high), Some(low)) = (h, l) {
                out.push(high << 4 | low);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
