use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Closed set of units an ingredient line can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    // Volume
    Tsp,
    Tbsp,
    Cup,
    FlOz,
    Ml,
    L,
    Pint,
    Quart,
    Gallon,
    // Weight
    Mg,
    G,
    Kg,
    Oz,
    Lb,
    // Count
    Piece,
    Clove,
    Slice,
    Can,
    Package,
    Bunch,
    Head,
    Stick,
    Sprig,
    // Special
    Pinch,
    Dash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Volume,
    Weight,
    Count,
    Special,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Tsp => "tsp",
            Unit::Tbsp => "tbsp",
            Unit::Cup => "cup",
            Unit::FlOz => "fl_oz",
            Unit::Ml => "ml",
            Unit::L => "l",
            Unit::Pint => "pint",
            Unit::Quart => "quart",
            Unit::Gallon => "gallon",
            Unit::Mg => "mg",
            Unit::G => "g",
            Unit::Kg => "kg",
            Unit::Oz => "oz",
            Unit::Lb => "lb",
            Unit::Piece => "piece",
            Unit::Clove => "clove",
            Unit::Slice => "slice",
            Unit::Can => "can",
            Unit::Package => "package",
            Unit::Bunch => "bunch",
            Unit::Head => "head",
            Unit::Stick => "stick",
            Unit::Sprig => "sprig",
            Unit::Pinch => "pinch",
            Unit::Dash => "dash",
        }
    }

    pub fn kind(&self) -> UnitKind {
        match self {
            Unit::Tsp
            | Unit::Tbsp
            | Unit::Cup
            | Unit::FlOz
            | Unit::Ml
            | Unit::L
            | Unit::Pint
            | Unit::Quart
            | Unit::Gallon => UnitKind::Volume,
            Unit::Mg | Unit::G | Unit::Kg | Unit::Oz | Unit::Lb => UnitKind::Weight,
            Unit::Piece
            | Unit::Clove
            | Unit::Slice
            | Unit::Can
            | Unit::Package
            | Unit::Bunch
            | Unit::Head
            | Unit::Stick
            | Unit::Sprig => UnitKind::Count,
            Unit::Pinch | Unit::Dash => UnitKind::Special,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const ALIASES: &[(&str, Unit)] = &[
    ("teaspoons", Unit::Tsp),
    ("teaspoon", Unit::Tsp),
    ("tsps", Unit::Tsp),
    ("tsp", Unit::Tsp),
    ("t", Unit::Tsp),
    ("tablespoons", Unit::Tbsp),
    ("tablespoon", Unit::Tbsp),
    ("tbsps", Unit::Tbsp),
    ("tbsp", Unit::Tbsp),
    ("tbs", Unit::Tbsp),
    ("tbl", Unit::Tbsp),
    ("cups", Unit::Cup),
    ("cup", Unit::Cup),
    ("c", Unit::Cup),
    ("fluid ounces", Unit::FlOz),
    ("fluid ounce", Unit::FlOz),
    ("fl. oz", Unit::FlOz),
    ("fl oz", Unit::FlOz),
    ("floz", Unit::FlOz),
    ("milliliters", Unit::Ml),
    ("millilitres", Unit::Ml),
    ("milliliter", Unit::Ml),
    ("millilitre", Unit::Ml),
    ("ml", Unit::Ml),
    ("liters", Unit::L),
    ("litres", Unit::L),
    ("liter", Unit::L),
    ("litre", Unit::L),
    ("l", Unit::L),
    ("pints", Unit::Pint),
    ("pint", Unit::Pint),
    ("pt", Unit::Pint),
    ("quarts", Unit::Quart),
    ("quart", Unit::Quart),
    ("qt", Unit::Quart),
    ("gallons", Unit::Gallon),
    ("gallon", Unit::Gallon),
    ("gal", Unit::Gallon),
    ("milligrams", Unit::Mg),
    ("milligram", Unit::Mg),
    ("mg", Unit::Mg),
    ("grams", Unit::G),
    ("gram", Unit::G),
    ("g", Unit::G),
    ("kilograms", Unit::Kg),
    ("kilogram", Unit::Kg),
    ("kgs", Unit::Kg),
    ("kg", Unit::Kg),
    ("ounces", Unit::Oz),
    ("ounce", Unit::Oz),
    ("oz", Unit::Oz),
    ("pounds", Unit::Lb),
    ("pound", Unit::Lb),
    ("lbs", Unit::Lb),
    ("lb", Unit::Lb),
    ("pieces", Unit::Piece),
    ("piece", Unit::Piece),
    ("pcs", Unit::Piece),
    ("pc", Unit::Piece),
    ("cloves", Unit::Clove),
    ("clove", Unit::Clove),
    ("slices", Unit::Slice),
    ("slice", Unit::Slice),
    ("cans", Unit::Can),
    ("can", Unit::Can),
    ("packages", Unit::Package),
    ("package", Unit::Package),
    ("packets", Unit::Package),
    ("packet", Unit::Package),
    ("pkgs", Unit::Package),
    ("pkg", Unit::Package),
    ("bunches", Unit::Bunch),
    ("bunch", Unit::Bunch),
    ("heads", Unit::Head),
    ("head", Unit::Head),
    ("sticks", Unit::Stick),
    ("stick", Unit::Stick),
    ("sprigs", Unit::Sprig),
    ("sprig", Unit::Sprig),
    ("pinches", Unit::Pinch),
    ("pinch", Unit::Pinch),
    ("dashes", Unit::Dash),
    ("dash", Unit::Dash),
];

/// Alias table ordered longest first so `fluid ounce` beats `ounce`.
static SORTED_ALIASES: LazyLock<Vec<(&'static str, Unit)>> = LazyLock::new(|| {
    let mut aliases = ALIASES.to_vec();
    aliases.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    aliases
});

/// Match a unit at the start of `text`. The alias must be followed by
/// whitespace, a period or the end of the text, so `cupcake` is not `cup`.
/// Returns the unit and the text after it.
pub fn match_unit(text: &str) -> Option<(Unit, &str)> {
    SORTED_ALIASES.iter().find_map(|&(alias, unit)| {
        let head = text.get(..alias.len())?;
        if !head.eq_ignore_ascii_case(alias) {
            return None;
        }
        let rest = &text[alias.len()..];
        match rest.chars().next() {
            None => Some((unit, rest)),
            Some(c) if c.is_whitespace() => Some((unit, rest.trim_start())),
            Some('.') => Some((unit, rest[1..].trim_start())),
            Some(_) => None,
        }
    })
}
