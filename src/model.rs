use serde::{Deserialize, Serialize};
use std::fmt;

/// Title used when a source gives no usable recipe name.
pub const DEFAULT_TITLE: &str = "Untitled Recipe";

/// A cooking time in whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDuration {
    pub minutes: u32,
}

impl RecipeDuration {
    pub fn from_minutes(minutes: u32) -> Self {
        RecipeDuration { minutes }
    }
}

/// Canonical recipe shape produced by both the schema.org path and the AI path.
///
/// `ingredients` holds the raw lines; run them through
/// [`crate::normalize::normalize_ingredient`] to get structured quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedRecipe {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<RecipeDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<RecipeDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_time: Option<RecipeDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

impl Default for ParsedRecipe {
    fn default() -> Self {
        ParsedRecipe {
            title: DEFAULT_TITLE.to_string(),
            description: None,
            ingredients: Vec::new(),
            instructions: Vec::new(),
            prep_time: None,
            cook_time: None,
            total_time: None,
            servings: None,
            image_url: None,
            source_url: None,
        }
    }
}

impl ParsedRecipe {
    /// Whether the title is something other than the placeholder.
    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty() && self.title != DEFAULT_TITLE
    }

    /// A real title, ingredients or instructions. Timings alone do not count.
    pub fn has_content(&self) -> bool {
        self.has_title() || !self.ingredients.is_empty() || !self.instructions.is_empty()
    }

    pub fn has_any_time(&self) -> bool {
        self.prep_time.is_some() || self.cook_time.is_some() || self.total_time.is_some()
    }

    /// Trim every text field, drop blank list entries and fall back to the
    /// default title. Applied to every recipe before it leaves the pipeline.
    pub fn sanitized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        if self.title.is_empty() {
            self.title = DEFAULT_TITLE.to_string();
        }
        self.description = non_empty(self.description);
        self.ingredients = clean_lines(self.ingredients);
        self.instructions = clean_lines(self.instructions);
        self.image_url = non_empty(self.image_url);
        self.source_url = non_empty(self.source_url);
        self
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn clean_lines(lines: Vec<String>) -> Vec<String> {
    lines
        .into_iter()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Where a parse result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseSource {
    #[serde(rename = "schema.org")]
    SchemaOrg,
    #[serde(rename = "ai")]
    Ai,
    #[serde(rename = "manual")]
    Manual,
}

impl fmt::Display for ParseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseSource::SchemaOrg => write!(f, "schema.org"),
            ParseSource::Ai => write!(f, "ai"),
            ParseSource::Manual => write!(f, "manual"),
        }
    }
}

/// Outcome of one extraction attempt.
///
/// `success` is true exactly when `recipe` is present; build values through
/// [`ParseResult::found`] and [`ParseResult::failed`] to keep that true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe: Option<ParsedRecipe>,
    pub confidence: f64,
    pub source: ParseSource,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ParseResult {
    pub fn found(recipe: ParsedRecipe, confidence: f64, source: ParseSource) -> Self {
        ParseResult {
            success: true,
            recipe: Some(recipe),
            confidence: confidence.clamp(0.0, 1.0),
            source,
            errors: Vec::new(),
        }
    }

    pub fn failed(source: ParseSource, errors: Vec<String>) -> Self {
        ParseResult {
            success: false,
            recipe: None,
            confidence: 0.0,
            source,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitized_defaults_title_and_filters_blanks() {
        let recipe = ParsedRecipe {
            title: "   ".to_string(),
            description: Some("  ".to_string()),
            ingredients: vec![" flour ".to_string(), "".to_string(), "  ".to_string()],
            instructions: vec!["Mix".to_string(), "\n".to_string(), " Bake ".to_string()],
            ..Default::default()
        }
        .sanitized();

        assert_eq!(recipe.title, DEFAULT_TITLE);
        assert!(!recipe.has_title());
        assert_eq!(recipe.description, None);
        assert_eq!(recipe.ingredients, vec!["flour"]);
        assert_eq!(recipe.instructions, vec!["Mix", "Bake"]);
    }

    #[test]
    fn test_parse_result_invariant() {
        let ok = ParseResult::found(ParsedRecipe::default(), 1.4, ParseSource::SchemaOrg);
        assert!(ok.success);
        assert!(ok.recipe.is_some());
        assert_eq!(ok.confidence, 1.0);

        let err = ParseResult::failed(ParseSource::Ai, vec!["nope".to_string()]);
        assert!(!err.success);
        assert!(err.recipe.is_none());
        assert_eq!(err.confidence, 0.0);
    }

    #[test]
    fn test_source_serializes_to_tag() {
        assert_eq!(
            serde_json::to_string(&ParseSource::SchemaOrg).unwrap(),
            "\"schema.org\""
        );
        assert_eq!(serde_json::to_string(&ParseSource::Ai).unwrap(), "\"ai\"");
        assert_eq!(ParseSource::Manual.to_string(), "manual");
    }

    #[test]
    fn test_recipe_serializes_camel_case() {
        let recipe = ParsedRecipe {
            title: "Soup".to_string(),
            prep_time: Some(RecipeDuration::from_minutes(5)),
            image_url: Some("https://example.com/soup.jpg".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&recipe).unwrap();
        assert_eq!(json["prepTime"]["minutes"], 5);
        assert_eq!(json["imageUrl"], "https://example.com/soup.jpg");
        assert!(json.get("cookTime").is_none());
    }
}
