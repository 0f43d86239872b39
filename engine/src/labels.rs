use unicode_normalization::UnicodeNormalization;

/// Apostrophe look-alikes used interchangeably in Uzbek Latin labels.
const APOSTROPHES: &[char] = &['\u{2018}', '\u{2019}', '\u{02BB}', '\u{02BC}', '`', '\u{00B4}'];

/// NFKC plus apostrophe folding, so `O‘zbekiston` and `O'zbekiston` compare equal.
pub fn normalize(label: &str) -> String {
    label
        .nfkc()
        .map(|c| if APOSTROPHES.contains(&c) { '\'' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

pub fn same(label: &str, expected: &str) -> bool {
    normalize(label) == normalize(expected)
}

pub fn contains(label: &str, fragment: &str) -> bool {
    normalize(label).contains(&normalize(fragment))
}

pub fn contains_ignore_case(label: &str, fragment: &str) -> bool {
    normalize(label)
        .to_lowercase()
        .contains(&normalize(fragment).to_lowercase())
}

pub fn contains_any(label: &str, fragments: &[&str]) -> bool {
    fragments.iter().any(|f| contains(label, f))
}
