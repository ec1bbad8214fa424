//! Formatting utilities used for CLI and export outputs.

use unicode_width::UnicodeWidthStr;

/// Right-pad by display width, so accented names line up.
pub fn pad_right(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    format!("{}{}", s, " ".repeat(width.saturating_sub(w)))
}

pub fn pad_left(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    format!("{}{}", " ".repeat(width.saturating_sub(w)), s)
}

/// Whole VND amount with `.` thousands separators: 800000 → "800.000".
pub fn money(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }

    if amount < 0 {
        format!("-{out}")
    } else {
        out
    }
}

pub fn present_label(present: bool) -> &'static str {
    if present { "present" } else { "absent" }
}
