//! Filename sanitization for uploaded artifacts.

use super::MAX_NAME_LEN;

/// Sanitizes a client-supplied filename so it names a single entry inside the
/// store directory.
///
/// - Replaces NUL, `/`, `\`, whitespace, and control characters with `_`
/// - Collapses consecutive underscores
/// - Trims leading/trailing spaces, dots, and underscores
/// - Limits length to `MAX_NAME_LEN` bytes so the staging file name still
///   fits in Linux NAME_MAX
///
/// Returns an empty string when nothing usable is left (e.g. `".."`).
pub fn sanitize_file_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;

    for c in name.chars() {
        let c = if c == '\0' || c == '/' || c == '\\' || c.is_control() || c.is_whitespace() {
            '_'
        } else {
            c
        };
        if c == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(c);
            prev_underscore = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == ' ' || c == '.' || c == '_');

    let mut take = trimmed.len().min(MAX_NAME_LEN);
    while take > 0 && !trimmed.is_char_boundary(take) {
        take -= 1;
    }
    trimmed[..take].to_string()
}
