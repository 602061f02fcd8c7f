//! Save-name sanitization for downloaded attachments.

/// Used when the display name sanitizes to nothing.
pub const DEFAULT_SAVE_NAME: &str = "attachment";

/// Sanitizes a display name for use as a local filename on Linux.
///
/// - Replaces NUL, `/`, `\`, and control characters with `_`
/// - Trims leading/trailing spaces, dots and underscores
/// - Collapses consecutive underscores
/// - Limits length to 255 bytes (Linux NAME_MAX)
///
/// Spaces are kept; users see this name in their file manager.
pub fn save_name(display_name: &str) -> String {
    const NAME_MAX: usize = 255;

    let mut out = String::with_capacity(display_name.len());
    let mut prev_underscore = false;

    for c in display_name.chars() {
        let replacement = if c == '\0' || c == '/' || c == '\\' || c.is_control() {
            '_'
        } else {
            c
        };

        if replacement == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(replacement);
            prev_underscore = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == ' ' || c == '.' || c == '_');

    let limited = if trimmed.len() > NAME_MAX {
        let mut take = NAME_MAX;
        while take > 0 && !trimmed.is_char_boundary(take) {
            take -= 1;
        }
        &trimmed[..take]
    } else {
        trimmed
    };

    if limited.is_empty() {
        DEFAULT_SAVE_NAME.to_string()
    } else {
        limited.to_string()
    }
}
