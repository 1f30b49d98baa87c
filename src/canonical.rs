//! Prints floats the way las text files expect them.
//!
//! Values are printed with six decimals, then trailing zeros are trimmed, and a trailing decimal
//! point goes with them. This is not the shortest representation that round trips.

use std::fmt::Write;

/// Formats a float with six decimals, trailing zeros trimmed.
///
/// # Examples
///
/// ```
/// use lastxt::canonical::format_f64;
/// assert_eq!("1.5", format_f64(1.5));
/// assert_eq!("2", format_f64(2.0));
/// assert_eq!("-0.1", format_f64(-0.100000));
/// assert_eq!("0.333333", format_f64(1. / 3.));
/// ```
pub fn format_f64(value: f64) -> String {
    let mut s = String::new();
    push_f64(&mut s, value);
    s
}

/// Appends a formatted float to a string.
pub fn push_f64(s: &mut String, value: f64) {
    let start = s.len();
    let _ = write!(s, "{:.6}", value);
    if s[start..].contains('.') {
        let trimmed = s.trim_end_matches('0').len();
        s.truncate(trimmed);
        if s.ends_with('.') {
            let _ = s.pop();
        }
    }
}

/// Formats three floats separated by single spaces, optionally followed by a newline.
///
/// # Examples
///
/// ```
/// use lastxt::canonical::format_xyz;
/// assert_eq!("1 2.5 -3", format_xyz([1., 2.5, -3.], false));
/// assert_eq!("0 0 0\n", format_xyz([0.; 3], true));
/// ```
pub fn format_xyz(values: [f64; 3], eol: bool) -> String {
    let mut s = String::new();
    for (i, value) in values.into_iter().enumerate() {
        if i > 0 {
            s.push(' ');
        }
        push_f64(&mut s, value);
    }
    if eol {
        s.push('\n');
    }
    s
}
