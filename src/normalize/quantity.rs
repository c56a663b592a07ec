use regex::{Captures, Regex};
use std::sync::LazyLock;

const UNICODE_FRACTIONS: &[(char, f64)] = &[
    ('½', 1.0 / 2.0),
    ('⅓', 1.0 / 3.0),
    ('⅔', 2.0 / 3.0),
    ('¼', 1.0 / 4.0),
    ('¾', 3.0 / 4.0),
    ('⅕', 1.0 / 5.0),
    ('⅖', 2.0 / 5.0),
    ('⅗', 3.0 / 5.0),
    ('⅘', 4.0 / 5.0),
    ('⅙', 1.0 / 6.0),
    ('⅚', 5.0 / 6.0),
    ('⅛', 1.0 / 8.0),
    ('⅜', 3.0 / 8.0),
    ('⅝', 5.0 / 8.0),
    ('⅞', 7.0 / 8.0),
];

/// Optional whole number followed by a vulgar fraction: `1 ½`, `1½`, `¾`.
static UNICODE_FRACTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(\d+)\s*)?([½⅓⅔¼¾⅕⅖⅗⅘⅙⅚⅛⅜⅝⅞])").expect("Invalid unicode fraction regex")
});

/// Whole number followed by a text fraction: `2 1/2`.
static MIXED_FRACTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s+(\d+)\s*[/⁄]\s*(\d+)").expect("Invalid mixed fraction regex")
});

static FRACTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*[/⁄]\s*(\d+)").expect("Invalid fraction regex"));

/// A bare integer may carry a trailing period, as in a numbered list ("1.Mix").
static NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d*\.\d+|\d+)\.?").expect("Invalid number regex"));

/// Upper bound of a range (`-3`, `to 3`, `–3 1/2`); parsed only to be dropped.
static RANGE_TAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:-|–|—|to\b)\s*(?:\d+\s+\d+\s*[/⁄]\s*\d+|\d+\s*[/⁄]\s*\d+|(?:\d+\s*)?[½⅓⅔¼¾⅕⅖⅗⅘⅙⅚⅛⅜⅝⅞]|\d*\.\d+|\d+)")
        .expect("Invalid range regex")
});

pub const DEFAULT_QUANTITY: f64 = 1.0;

/// Read the leading quantity of an ingredient line.
///
/// Returns the quantity and the rest of the line. For ranges only the lower
/// bound is kept. Lines without a number yield `DEFAULT_QUANTITY` and are
/// returned untouched.
pub fn extract_quantity(text: &str) -> (f64, &str) {
    let text = text.trim_start();

    let parsed = UNICODE_FRACTION_REGEX
        .captures(text)
        .and_then(|caps| unicode_fraction(&caps))
        .or_else(|| {
            MIXED_FRACTION_REGEX.captures(text).and_then(|caps| {
                let fraction = ratio(&caps[2], &caps[3])?;
                Some((whole(&caps[1]) + fraction, caps.get(0)?.end()))
            })
        })
        .or_else(|| {
            FRACTION_REGEX.captures(text).and_then(|caps| {
                Some((ratio(&caps[1], &caps[2])?, caps.get(0)?.end()))
            })
        })
        .or_else(|| {
            NUMBER_REGEX.captures(text).and_then(|caps| {
                let value = caps[1].parse::<f64>().ok()?;
                Some((value, caps.get(0)?.end()))
            })
        });

    match parsed {
        Some((value, end)) if value.is_finite() && value >= 0.0 => {
            let mut rest = &text[end..];
            if let Some(tail) = RANGE_TAIL_REGEX.find(rest) {
                rest = &rest[tail.end()..];
            }
            (value, rest.trim_start())
        }
        _ => (DEFAULT_QUANTITY, text),
    }
}

fn unicode_fraction(caps: &Captures) -> Option<(f64, usize)> {
    let symbol = caps.get(2)?.as_str().chars().next()?;
    let fraction = UNICODE_FRACTIONS
        .iter()
        .find(|(c, _)| *c == symbol)
        .map(|(_, v)| *v)?;
    let base = caps.get(1).map(|m| whole(m.as_str())).unwrap_or(0.0);
    Some((base + fraction, caps.get(0)?.end()))
}

fn whole(digits: &str) -> f64 {
    digits.parse::<f64>().unwrap_or(0.0)
}

/// `None` for a zero denominator so the caller falls back to plain numbers.
fn ratio(numerator: &str, denominator: &str) -> Option<f64> {
    let n = numerator.parse::<f64>().ok()?;
    let d = denominator.parse::<f64>().ok()?;
    if d == 0.0 {
        None
    } else {
        Some(n / d)
    }
}
