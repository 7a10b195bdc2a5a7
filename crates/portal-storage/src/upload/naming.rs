//! Stored file naming.

/// Replace every character that is not an ASCII letter, ASCII digit, or `.` with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' { c } else { '_' })
        .collect()
}

/// `<unix-millis>-<sanitized original name>`.
pub fn stored_file_name(unix_millis: i64, original_name: &str) -> String {
    format!("{unix_millis}-{}", sanitize_file_name(original_name))
}
