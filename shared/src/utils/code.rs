//! One-time code input utilities

/// Number of digits in a one-time code
pub const CODE_LENGTH: usize = 6;

/// Normalize a user-submitted one-time code.
///
/// Keeps ASCII digits only, truncates to [`CODE_LENGTH`] and left-pads with
/// zeros. Returns `None` when the input contains no digit at all.
pub fn normalize_code_input(input: &str) -> Option<String> {
    let digits: String = input
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(CODE_LENGTH)
        .collect();

    if digits.is_empty() {
        return None;
    }

    Some(format!("{:0>width$}", digits, width = CODE_LENGTH))
}
