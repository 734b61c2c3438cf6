//! National-number normalization.

/// Keeps only ASCII digits and, when `strip_leading_zero` is set, drops every leading `'0'`.
///
/// ```
/// use ratatui_phone_input::sanitize::sanitize_national_number;
///
/// assert_eq!(sanitize_national_number("+84 090 123 456", true), "84090123456");
/// assert_eq!(sanitize_national_number("0912345678", true), "912345678");
/// assert_eq!(sanitize_national_number("0912345678", false), "0912345678");
/// ```
pub fn sanitize_national_number(raw: &str, strip_leading_zero: bool) -> String {
    let digits = raw.chars().filter(char::is_ascii_digit);
    if strip_leading_zero {
        digits.skip_while(|c| *c == '0').collect()
    } else {
        digits.collect()
    }
}

/// Maps a cursor (char index into `raw`) onto the sanitized string.
///
/// The result is the sanitized length of everything left of the cursor, so the caret stays
/// right after the last digit the user typed.
pub fn sanitized_cursor(raw: &str, cursor: usize, strip_leading_zero: bool) -> usize {
    let prefix: String = raw.chars().take(cursor).collect();
    sanitize_national_number(&prefix, strip_leading_zero)
        .chars()
        .count()
}
