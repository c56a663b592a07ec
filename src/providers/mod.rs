mod anthropic;
mod factory;
mod open_ai;
mod prompt;

pub use anthropic::AnthropicProvider;
pub use factory::service_from_config;
pub use open_ai::OpenAIProvider;
pub use prompt::{RECIPE_EXTRACTION_PROMPT, VISION_EXTRACTION_PROMPT};

use crate::model::{ParsedRecipe, RecipeDuration, DEFAULT_TITLE};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;

/// Error type returned by AI collaborators
pub type AiError = Box<dyn Error + Send + Sync>;

/// Page text sent to a model is capped at this many characters.
const MAX_PROMPT_CHARS: usize = 30_000;

/// Contract for the external AI service used as a fallback parser and for
/// reading recipes out of photos.
#[async_trait]
pub trait RecipeAiService: Send + Sync {
    /// Get the provider name (e.g., "openai", "anthropic")
    fn provider_name(&self) -> &str;

    /// Whether the service can currently be called
    fn is_enabled(&self) -> bool;

    /// Parse a recipe out of an HTML page that carries no schema.org markup
    async fn parse_recipe(&self, html: &str) -> Result<ParsedRecipe, AiError>;

    /// Read recipe fields out of a photo of a recipe card or cookbook page
    async fn vision_extract(&self, image: &ImageSource) -> Result<RawRecipeFields, AiError>;
}

/// Represents the source of an image for vision extraction
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Image from a file path
    Path(String),
    /// Image as base64-encoded data
    Base64 { data: String, media_type: String },
}

impl ImageSource {
    /// Media type and base64 payload for an API request
    pub async fn to_base64(&self) -> Result<(String, String), AiError> {
        match self {
            ImageSource::Path(path) => {
                let bytes = tokio::fs::read(path).await?;
                Ok((media_type_for_path(path).to_string(), STANDARD.encode(bytes)))
            }
            ImageSource::Base64 { data, media_type } => {
                STANDARD
                    .decode(data.trim())
                    .map_err(|e| format!("Invalid base64 image data: {e}"))?;
                Ok((media_type.clone(), data.trim().to_string()))
            }
        }
    }
}

fn media_type_for_path(path: &str) -> &'static str {
    let extension = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

/// Loosely typed recipe fields as a model returns them.
///
/// Both the text and the vision prompts ask for this JSON shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecipeFields {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub prep_time_minutes: Option<u32>,
    #[serde(default)]
    pub cook_time_minutes: Option<u32>,
    #[serde(default)]
    pub total_time_minutes: Option<u32>,
    #[serde(default)]
    pub servings: Option<u32>,
}

impl RawRecipeFields {
    pub fn into_recipe(self) -> ParsedRecipe {
        ParsedRecipe {
            title: self.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            description: self.description,
            ingredients: self.ingredients,
            instructions: self.instructions,
            prep_time: self.prep_time_minutes.map(RecipeDuration::from_minutes),
            cook_time: self.cook_time_minutes.map(RecipeDuration::from_minutes),
            total_time: self.total_time_minutes.map(RecipeDuration::from_minutes),
            servings: self.servings.filter(|s| *s > 0),
            image_url: None,
            source_url: None,
        }
        .sanitized()
    }
}

/// Parse the JSON object out of a model reply, tolerating code fences and
/// chatter around it.
pub(crate) fn parse_fields_response(content: &str) -> Result<RawRecipeFields, AiError> {
    let start = content.find('{').ok_or("No JSON object in AI response")?;
    let end = content.rfind('}').ok_or("No JSON object in AI response")?;
    if end < start {
        return Err("No JSON object in AI response".into());
    }
    let fields = serde_json::from_str(&content[start..=end])?;
    Ok(fields)
}

/// Visible body text of a page, one text node per line.
pub(crate) fn html_to_prompt_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let root = match Selector::parse("body") {
        Ok(selector) => document
            .select(&selector)
            .next()
            .unwrap_or_else(|| document.root_element()),
        Err(_) => document.root_element(),
    };

    let text = root
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node
                .parent()
                .and_then(|parent| parent.value().as_element().map(|el| el.name().to_string()))
                .is_some_and(|name| matches!(name.as_str(), "script" | "style" | "noscript"));
            if hidden {
                return None;
            }
            let line = text.split_whitespace().collect::<Vec<_>>().join(" ");
            (!line.is_empty()).then_some(line)
        })
        .collect::<Vec<_>>()
        .join("\n");

    text.chars().take(MAX_PROMPT_CHARS).collect()
}
