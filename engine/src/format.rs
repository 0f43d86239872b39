//! Number rendering for statement text.

use crate::numeric::round1;

/// Group separator of the uz-UZ locale (no-break space).
pub const GROUP_SEPARATOR: char = '\u{a0}';
pub const DECIMAL_SEPARATOR: char = ',';

/// One decimal with `.`, no grouping: `12.345 -> "12.3"`.
pub fn fixed1(v: f64) -> String {
    let r = round1(v);
    // avoid "-0.0"
    let r = if r == 0.0 { 0.0 } else { r };
    format!("{r:.1}")
}

/// uz-UZ rendering with exactly one fraction digit: `1234567.89 -> "1 234 567,9"`.
pub fn grouped(v: f64) -> String {
    let tenths = (v.abs() * 10.0).round() as u64;
    let int_part = (tenths / 10).to_string();
    let frac = tenths % 10;

    let mut out = String::with_capacity(int_part.len() + int_part.len() / 3 + 4);
    if v < 0.0 && tenths != 0 {
        out.push('-');
    }
    let lead = int_part.len() % 3;
    for (i, ch) in int_part.chars().enumerate() {
        if i != 0 && (i + 3 - lead) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(ch);
    }
    out.push(DECIMAL_SEPARATOR);
    out.push(char::from(b'0' + frac as u8));
    out
}

/// `fixed1` followed by a percent sign.
pub fn percent(v: f64) -> String {
    format!("{}%", fixed1(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_one_decimal() {
        assert_eq!(fixed1(30.0), "30.0");
        assert_eq!(fixed1(-66.666), "-66.7");
        assert_eq!(fixed1(-0.01), "0.0");
        assert_eq!(percent(5.25), "5.3%");
    }

    #[test]
    fn grouped_uses_locale_separators() {
        assert_eq!(grouped(30.0), "30,0");
        assert_eq!(grouped(1234.56), "1\u{a0}234,6");
        assert_eq!(grouped(1234567.0), "1\u{a0}234\u{a0}567,0");
        assert_eq!(grouped(999.96), "1\u{a0}000,0");
        assert_eq!(grouped(-15.04), "-15,0");
        assert_eq!(grouped(-0.01), "0,0");
    }
}
