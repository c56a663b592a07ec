//! Turns free-text ingredient lines into quantity, unit, name, notes and
//! category.
//!
//! Each line goes through four stages, each consuming a prefix of the text:
//! quantity, unit, name/notes, then categorization of the name. Every stage
//! has a default, so normalization never fails.

mod category;
mod quantity;
mod units;

pub use category::{categorize, IngredientCategory};
pub use quantity::{extract_quantity, DEFAULT_QUANTITY};
pub use units::{match_unit, Unit, UnitKind};

use serde::{Deserialize, Serialize};

const DASH_SEPARATORS: &[&str] = &[" - ", " – ", " — "];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedIngredient {
    pub name: String,
    pub quantity: f64,
    pub unit: Unit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub category: IngredientCategory,
    /// The line exactly as it was given.
    pub raw: String,
}

impl NormalizedIngredient {
    /// Rebuild a line from the parsed parts, e.g. `2.5 cup flour (sifted)`.
    /// Comparing it with `raw` is a cheap way to spot a poor parse.
    pub fn display(&self) -> String {
        let mut out = format!("{} {}", format_quantity(self.quantity), self.unit);
        if !self.name.is_empty() {
            out.push(' ');
            out.push_str(&self.name);
        }
        if let Some(notes) = &self.notes {
            out.push_str(&format!(" ({notes})"));
        }
        out
    }
}

fn format_quantity(quantity: f64) -> String {
    if quantity.fract() == 0.0 {
        format!("{quantity:.0}")
    } else {
        let formatted = format!("{quantity:.3}");
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

/// Normalize one raw ingredient line.
pub fn normalize_ingredient(raw: &str) -> NormalizedIngredient {
    let (quantity, rest) = extract_quantity(raw.trim());

    // "1 (14 oz) can tomatoes": a size group may sit before the unit
    let (size_note, rest) = match leading_group(rest) {
        Some((inner, after)) => (clean_notes(inner), after),
        None => (None, rest),
    };

    let (unit, rest) = match match_unit(rest) {
        Some((unit, rest)) => (unit, rest),
        None => (Unit::Piece, rest),
    };

    let (name, notes) = split_name_and_notes(rest);
    let notes = merge_notes(size_note, notes);
    let category = categorize(&name);

    NormalizedIngredient {
        name,
        quantity,
        unit,
        notes,
        category,
        raw: raw.to_string(),
    }
}

/// Normalize lines independently, preserving order one to one.
pub fn normalize_ingredients<S: AsRef<str>>(lines: &[S]) -> Vec<NormalizedIngredient> {
    lines
        .iter()
        .map(|line| normalize_ingredient(line.as_ref()))
        .collect()
}

/// Split the text after the unit into a name and optional notes.
///
/// A parenthesized group wins, then the first comma, then a spaced dash.
/// A group that opens the text is a note and the name follows it.
fn split_name_and_notes(text: &str) -> (String, Option<String>) {
    let text = text.trim();

    if let Some((inner, after)) = leading_group(text) {
        let (name, notes) = split_name_and_notes(after);
        return (name, merge_notes(clean_notes(inner), notes));
    }

    if let Some((name, notes)) = split_parenthesized(text) {
        return (clean_name(name), notes);
    }

    if let Some((name, notes)) = text.split_once(',') {
        return (clean_name(name), clean_notes(notes));
    }

    let dash = DASH_SEPARATORS
        .iter()
        .filter_map(|sep| text.find(sep).map(|idx| (idx, sep.len())))
        .min_by_key(|(idx, _)| *idx);
    if let Some((idx, len)) = dash {
        return (clean_name(&text[..idx]), clean_notes(&text[idx + len..]));
    }

    (clean_name(text), None)
}

fn split_parenthesized(text: &str) -> Option<(&str, Option<String>)> {
    let open = text.find('(')?;
    let close = open + text[open..].find(')')?;
    let name = &text[..open];
    if name.trim().is_empty() {
        return None;
    }

    let inside = text[open + 1..close].trim();
    let trailing = text[close + 1..].trim().trim_start_matches(',').trim();

    let notes = [inside, trailing]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ");
    Some((name, clean_notes(&notes)))
}

/// Inner text of a group at the very start, and the text after it.
fn leading_group(text: &str) -> Option<(&str, &str)> {
    let rest = text.trim_start().strip_prefix('(')?;
    let close = rest.find(')')?;
    let after = rest[close + 1..].trim_start();
    Some((&rest[..close], after.trim_start_matches(',').trim_start()))
}

fn merge_notes(first: Option<String>, second: Option<String>) -> Option<String> {
    match (first, second) {
        (Some(first), Some(second)) => Some(format!("{first}, {second}")),
        (first, second) => first.or(second),
    }
}

fn clean_name(name: &str) -> String {
    let name = name.trim();
    let name = match name.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("of ") => &name[3..],
        _ => name,
    };
    name.trim().trim_end_matches(',').trim().to_string()
}

fn clean_notes(notes: &str) -> Option<String> {
    let notes = notes.trim();
    if notes.is_empty() {
        None
    } else {
        Some(notes.to_string())
    }
}
