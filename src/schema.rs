//! Loosely-typed schema.org `Recipe` record and its mapping into [`ParsedRecipe`].
//!
//! Publishers disagree on the shape of almost every field, so each field that
//! accepts more than one shape is modelled as a small closed union. Fields are
//! deserialized leniently: a value of an unexpected shape becomes `None`
//! instead of failing the whole record.

use crate::model::{ParsedRecipe, RecipeDuration, DEFAULT_TITLE};
use html_escape::decode_html_entities;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::sync::LazyLock;

static DURATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+(?:\.\d+)?)S)?)?")
        .expect("Invalid duration regex")
});

static FIRST_INTEGER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("Invalid integer regex"));

/// Numbered step markers such as `1.` or `2)` at the start of the text or after whitespace.
static STEP_MARKER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)\d{1,2}[.)]").expect("Invalid step marker regex")
});

/// A schema.org Recipe as found in JSON-LD or rebuilt from microdata.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaOrgRecipe {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<Description>,
    #[serde(default, deserialize_with = "lenient")]
    pub recipe_ingredient: Option<RecipeIngredients>,
    #[serde(default, deserialize_with = "lenient")]
    pub recipe_instructions: Option<RecipeInstructions>,
    #[serde(default, deserialize_with = "lenient")]
    pub prep_time: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub cook_time: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_time: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub recipe_yield: Option<RecipeYield>,
    #[serde(default, deserialize_with = "lenient")]
    pub image: Option<ImageField>,
}

impl SchemaOrgRecipe {
    /// Read a Recipe node located by the JSON-LD search.
    pub fn from_json(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Description {
    Text(String),
    Object(TextObject),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TextObject {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RecipeIngredients {
    Many(Vec<IngredientEntry>),
    One(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum IngredientEntry {
    Text(String),
    Object(IngredientObject),
    Other(Value),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IngredientObject {
    pub name: String,
    #[serde(default)]
    pub amount: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RecipeInstructions {
    Text(String),
    Steps(Vec<InstructionItem>),
}

/// One entry of an instruction list: a plain string, a `HowToStep` /
/// `HowToSection` node, or a nested list of either.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum InstructionItem {
    Text(String),
    Nested(Vec<InstructionItem>),
    Node(InstructionNode),
    Other(Value),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionNode {
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub item_list_element: Option<Vec<InstructionItem>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RecipeYield {
    Number(f64),
    Text(String),
    List(Vec<RecipeYield>),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ImageField {
    Url(String),
    Object(ImageObject),
    List(Vec<ImageField>),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageObject {
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

pub(crate) fn decode_html_symbols(text: &str) -> String {
    // for some reason need to decode twice to get the correct string
    decode_html_entities(&decode_html_entities(text)).into_owned()
}

/// Map a schema.org record into the canonical recipe. Never fails: every
/// missing or malformed field falls back to its empty value.
pub fn schema_org_to_recipe(schema: SchemaOrgRecipe, source_url: Option<&str>) -> ParsedRecipe {
    let title = schema
        .name
        .as_deref()
        .map(decode_html_symbols)
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    let description = schema.description.map(|desc| match desc {
        Description::Text(text) => decode_html_symbols(&text),
        Description::Object(obj) => decode_html_symbols(&obj.text),
    });

    ParsedRecipe {
        title,
        description,
        ingredients: map_ingredients(schema.recipe_ingredient),
        instructions: map_instructions(schema.recipe_instructions),
        prep_time: schema.prep_time.as_deref().and_then(parse_iso_duration),
        cook_time: schema.cook_time.as_deref().and_then(parse_iso_duration),
        total_time: schema.total_time.as_deref().and_then(parse_iso_duration),
        servings: schema.recipe_yield.as_ref().and_then(parse_servings),
        image_url: schema.image.as_ref().and_then(parse_image_url),
        source_url: source_url.map(str::to_string),
    }
    .sanitized()
}

fn map_ingredients(ingredients: Option<RecipeIngredients>) -> Vec<String> {
    match ingredients {
        Some(RecipeIngredients::Many(entries)) => entries
            .into_iter()
            .filter_map(|entry| match entry {
                IngredientEntry::Text(text) => Some(decode_html_symbols(&text)),
                IngredientEntry::Object(obj) => {
                    let name = decode_html_symbols(&obj.name);
                    let amount = match obj.amount {
                        Some(Value::String(s)) => s.trim().to_string(),
                        Some(Value::Number(n)) => n.to_string(),
                        _ => String::new(),
                    };
                    if amount.is_empty() {
                        Some(name)
                    } else {
                        Some(format!("{amount} {name}"))
                    }
                }
                IngredientEntry::Other(_) => None,
            })
            .collect(),
        Some(RecipeIngredients::One(text)) => decode_html_symbols(&text)
            .lines()
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    }
}

fn map_instructions(instructions: Option<RecipeInstructions>) -> Vec<String> {
    match instructions {
        Some(RecipeInstructions::Text(text)) => split_instruction_text(&decode_html_symbols(&text)),
        Some(RecipeInstructions::Steps(items)) => {
            let mut steps = Vec::new();
            flatten_steps(items, &mut steps);
            steps
        }
        None => Vec::new(),
    }
}

fn flatten_steps(items: Vec<InstructionItem>, out: &mut Vec<String>) {
    for item in items {
        match item {
            InstructionItem::Text(text) => out.push(decode_html_symbols(&text)),
            InstructionItem::Nested(children) => flatten_steps(children, out),
            InstructionItem::Node(node) => {
                if let Some(children) = node.item_list_element {
                    // HowToSection: its name is a heading, not a step
                    flatten_steps(children, out);
                } else if let Some(text) = node.text.filter(|t| !t.trim().is_empty()) {
                    out.push(decode_html_symbols(&text));
                } else if let Some(name) = node.name {
                    out.push(decode_html_symbols(&name));
                }
            }
            InstructionItem::Other(_) => {}
        }
    }
}

/// Cut `text` at every `1.` / `2)` marker. A marker directly followed by a
/// digit is a decimal such as `350.5`, not a step.
fn split_on_step_markers(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut last = 0;
    for marker in STEP_MARKER_REGEX.find_iter(text) {
        let followed_by_digit = text[marker.end()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit());
        if followed_by_digit {
            continue;
        }
        parts.push(&text[last..marker.start()]);
        last = marker.end();
    }
    parts.push(&text[last..]);
    parts
}

/// Split a free-text instruction block into steps: numbered markers first,
/// then line breaks, otherwise the whole text is one step.
pub fn split_instruction_text(text: &str) -> Vec<String> {
    let numbered: Vec<String> = split_on_step_markers(text)
        .into_iter()
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect();
    if numbered.len() >= 2 {
        return numbered;
    }

    let lines: Vec<String> = text
        .lines()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();
    if lines.len() >= 2 {
        return lines;
    }

    let trimmed = text.trim();
    if trimmed.is_empty() {
        Vec::new()
    } else {
        vec![trimmed.to_string()]
    }
}

/// Parse an ISO-8601 duration such as `PT1H30M` into whole minutes.
///
/// Returns `None` when no component is present, so an unknown time stays
/// distinguishable from zero minutes.
pub fn parse_iso_duration(duration: &str) -> Option<RecipeDuration> {
    let caps = DURATION_REGEX
        .captures_iter(duration.trim())
        .find(|caps| (1..=4).any(|i| caps.get(i).is_some()))?;

    let whole = |i: usize| -> u32 {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .unwrap_or(0)
    };
    let seconds = caps
        .get(4)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0);

    let minutes = whole(1)
        .saturating_mul(24 * 60)
        .saturating_add(whole(2).saturating_mul(60))
        .saturating_add(whole(3))
        .saturating_add((seconds / 60.0).round() as u32);

    Some(RecipeDuration::from_minutes(minutes))
}

fn parse_servings(recipe_yield: &RecipeYield) -> Option<u32> {
    match recipe_yield {
        RecipeYield::Number(n) if n.is_finite() && *n >= 0.0 => Some(n.round() as u32),
        RecipeYield::Number(_) => None,
        RecipeYield::Text(text) => FIRST_INTEGER_REGEX
            .find(text)
            .and_then(|m| m.as_str().parse().ok()),
        RecipeYield::List(items) => items.first().and_then(parse_servings),
    }
}

fn parse_image_url(image: &ImageField) -> Option<String> {
    match image {
        ImageField::Url(url) => Some(decode_html_symbols(url)),
        ImageField::Object(obj) => obj.url.as_deref().map(decode_html_symbols),
        ImageField::List(items) => match items.first() {
            Some(ImageField::Url(url)) => Some(decode_html_symbols(url)),
            Some(ImageField::Object(obj)) => obj.url.as_deref().map(decode_html_symbols),
            _ => None,
        },
    }
}
