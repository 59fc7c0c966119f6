//! Best-effort currency formatting for minimum balances.
//!
//! Balances arrive as free text. [`coerce_whole`] tries to read them as a
//! number truncated to a whole amount and otherwise hands the text back
//! untouched, so callers never deal with a parse error.

/// A balance after coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coerced {
    /// Numeric text, fractional part truncated toward zero.
    Whole(i128),
    /// Text that could not be read as a finite number.
    Raw(String),
}

// Keeps the f64 -> i128 cast in range.
const MAX_WHOLE: f64 = 1e38;

/// Read decimal text as a whole number, or keep it as raw text.
///
/// Surrounding whitespace is ignored. Non-finite values (`inf`, `nan`)
/// fall back to [`Coerced::Raw`].
pub fn coerce_whole(raw: &str) -> Coerced {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value.abs() < MAX_WHOLE => {
            Coerced::Whole(value.trunc() as i128)
        }
        _ => Coerced::Raw(raw.to_string()),
    }
}

/// Group digits in threes with `,`.
pub fn group_thousands(value: i128) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `"$<amount>"`, grouped when the text is numeric.
pub fn format_currency(raw: &str) -> String {
    match coerce_whole(raw) {
        Coerced::Whole(n) => format!("${}", group_thousands(n)),
        Coerced::Raw(text) => format!("${}", text),
    }
}

/// Minimum deposit label for a collection record.
pub fn format_min_deposit(raw: &str) -> String {
    format!("{} min deposit", format_currency(raw))
}
