//! Extraction entry points.
//!
//! Every call makes one pass: schema.org markup first, then the AI
//! collaborator when the caller opted in and the page had no markup. Each
//! function reports its outcome as a [`ParseResult`] and never returns an
//! error.

use crate::config::ImportConfig;
use crate::error::ImportError;
use crate::extractors::extract_schema_org;
use crate::fetcher::RequestFetcher;
use crate::model::{ParseResult, ParseSource, ParsedRecipe};
use crate::providers::{service_from_config, ImageSource, RecipeAiService};
use crate::schema::schema_org_to_recipe;
use log::{debug, info, warn};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Base confidence for a page that carried schema.org Recipe markup.
pub const SCHEMA_ORG_BASE_CONFIDENCE: f64 = 0.5;
/// Base confidence for a recipe produced by the AI collaborator.
pub const AI_BASE_CONFIDENCE: f64 = 0.6;

/// Runtime options shared by the URL, HTML and image entry points.
#[derive(Clone)]
pub struct ParseOptions {
    pub timeout: Duration,
    pub user_agent: Option<String>,
    pub use_ai: bool,
    pub ai_service: Option<Arc<dyn RecipeAiService>>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
            use_ai: false,
            ai_service: None,
        }
    }
}

impl fmt::Debug for ParseOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseOptions")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("use_ai", &self.use_ai)
            .field(
                "ai_service",
                &self.ai_service.as_ref().map(|s| s.provider_name().to_string()),
            )
            .finish()
    }
}

impl ParseOptions {
    /// Build options from loaded configuration. A provider that cannot be
    /// constructed is logged and left out; parsing then runs schema-only.
    pub fn from_config(config: &ImportConfig) -> Self {
        let ai_service = service_from_config(&config.ai).unwrap_or_else(|e| {
            warn!("AI provider unavailable: {}", e);
            None
        });

        ParseOptions {
            timeout: Duration::from_millis(config.timeout_ms),
            user_agent: Some(config.user_agent.clone()),
            use_ai: config.use_ai,
            ai_service,
        }
    }

    /// The AI collaborator, if the caller opted in and it reports itself enabled.
    fn enabled_ai(&self) -> Option<&Arc<dyn RecipeAiService>> {
        if !self.use_ai {
            return None;
        }
        self.enabled_service()
    }

    fn enabled_service(&self) -> Option<&Arc<dyn RecipeAiService>> {
        self.ai_service.as_ref().filter(|service| service.is_enabled())
    }
}

/// Completeness score: `base` plus fixed increments for title, ingredients,
/// instructions, any time field and servings, capped at 1.0.
pub fn calculate_confidence(recipe: &ParsedRecipe, base: f64) -> f64 {
    let mut confidence = base;
    if recipe.has_title() {
        confidence += 0.1;
    }
    if !recipe.ingredients.is_empty() {
        confidence += 0.15;
    }
    if !recipe.instructions.is_empty() {
        confidence += 0.15;
    }
    if recipe.has_any_time() {
        confidence += 0.05;
    }
    if recipe.servings.is_some() {
        confidence += 0.05;
    }
    confidence.min(1.0)
}

/// Extract a recipe from schema.org markup only.
pub fn parse_from_html(html: &str, source_url: Option<&str>) -> ParseResult {
    match extract_schema_org(html) {
        Some(schema) => {
            let recipe = schema_org_to_recipe(schema, source_url);
            let confidence = calculate_confidence(&recipe, SCHEMA_ORG_BASE_CONFIDENCE);
            debug!(
                "schema.org recipe '{}' found, confidence {:.2}",
                recipe.title, confidence
            );
            ParseResult::found(recipe, confidence, ParseSource::SchemaOrg)
        }
        None => {
            debug!("No schema.org recipe markup found");
            ParseResult::failed(
                ParseSource::SchemaOrg,
                vec![ImportError::NoSchemaOrgData.to_string()],
            )
        }
    }
}

/// Fetch a page and extract schema.org markup from it. Fetch failures are
/// reported without attempting extraction.
pub async fn parse_from_url(url: &str, options: &ParseOptions) -> ParseResult {
    match fetch_html(url, options).await {
        Ok(html) => parse_from_html(&html, Some(url)),
        Err(e) => ParseResult::failed(ParseSource::SchemaOrg, vec![e.to_string()]),
    }
}

/// Like [`parse_from_html`], falling back to the AI collaborator when the page
/// has no schema.org markup and `options.use_ai` is set.
pub async fn parse_from_html_with_ai(
    html: &str,
    source_url: Option<&str>,
    options: &ParseOptions,
) -> ParseResult {
    let result = parse_from_html(html, source_url);
    if result.success {
        return result;
    }

    let Some(service) = options.enabled_ai() else {
        if options.use_ai {
            warn!("AI fallback requested but no enabled AI service is configured");
            let mut errors = result.errors;
            errors.push(ImportError::AiUnavailable.to_string());
            return ParseResult::failed(ParseSource::SchemaOrg, errors);
        }
        return result;
    };

    info!(
        "No schema.org data, falling back to {} for recipe parsing",
        service.provider_name()
    );
    match service.parse_recipe(html).await {
        Ok(recipe) => {
            let mut recipe = recipe.sanitized();
            if !recipe.has_content() {
                warn!("{} returned an empty recipe", service.provider_name());
                let mut errors = vec![ImportError::AiNoRecipe.to_string()];
                errors.extend(result.errors);
                return ParseResult::failed(ParseSource::Ai, errors);
            }
            if recipe.source_url.is_none() {
                recipe.source_url = source_url.map(str::to_string);
            }
            let confidence = calculate_confidence(&recipe, AI_BASE_CONFIDENCE);
            debug!(
                "AI recipe '{}' parsed, confidence {:.2}",
                recipe.title, confidence
            );
            ParseResult::found(recipe, confidence, ParseSource::Ai)
        }
        Err(e) => {
            warn!("AI parsing failed: {}", e);
            let mut errors = vec![ImportError::AiFailed(e.to_string()).to_string()];
            errors.extend(result.errors);
            ParseResult::failed(ParseSource::Ai, errors)
        }
    }
}

/// Fetch a page, then run [`parse_from_html_with_ai`] on it.
pub async fn parse_from_url_with_ai(url: &str, options: &ParseOptions) -> ParseResult {
    match fetch_html(url, options).await {
        Ok(html) => parse_from_html_with_ai(&html, Some(url), options).await,
        Err(e) => ParseResult::failed(ParseSource::SchemaOrg, vec![e.to_string()]),
    }
}

/// Read a recipe out of a photo through the AI collaborator's vision
/// capability. Calling this is the opt-in, so only an enabled service is
/// required, not `options.use_ai`.
pub async fn parse_from_image_with_ai(image: &ImageSource, options: &ParseOptions) -> ParseResult {
    let Some(service) = options.enabled_service() else {
        return ParseResult::failed(
            ParseSource::Ai,
            vec![ImportError::AiUnavailable.to_string()],
        );
    };

    info!("Extracting recipe from image with {}", service.provider_name());
    match service.vision_extract(image).await {
        Ok(fields) => {
            let recipe = fields.into_recipe();
            if !recipe.has_content() {
                warn!("{} found no recipe in the image", service.provider_name());
                return ParseResult::failed(
                    ParseSource::Ai,
                    vec![ImportError::AiNoRecipe.to_string()],
                );
            }
            let confidence = calculate_confidence(&recipe, AI_BASE_CONFIDENCE);
            debug!(
                "Image recipe '{}' parsed, confidence {:.2}",
                recipe.title, confidence
            );
            ParseResult::found(recipe, confidence, ParseSource::Ai)
        }
        Err(e) => {
            warn!("Vision extraction failed: {}", e);
            ParseResult::failed(
                ParseSource::Ai,
                vec![ImportError::AiFailed(e.to_string()).to_string()],
            )
        }
    }
}

async fn fetch_html(url: &str, options: &ParseOptions) -> Result<String, ImportError> {
    let fetcher = RequestFetcher::new(options.timeout, options.user_agent.as_deref())?;
    let html = fetcher.fetch(url).await;
    match &html {
        Ok(body) => debug!("Fetched {} ({} bytes)", url, body.len()),
        Err(e) => warn!("Fetching {} failed: {}", url, e),
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RecipeDuration, DEFAULT_TITLE};
    use crate::providers::{AiError, RawRecipeFields};
    use async_trait::async_trait;

    struct StubAi {
        enabled: bool,
        fail: bool,
    }

    #[async_trait]
    impl RecipeAiService for StubAi {
        fn provider_name(&self) -> &str {
            "stub"
        }

        fn is_enabled(&self) -> bool {
            self.enabled
        }

        async fn parse_recipe(&self, _html: &str) -> Result<ParsedRecipe, AiError> {
            if self.fail {
                return Err("model overloaded".into());
            }
            Ok(ParsedRecipe {
                title: "  Stub Soup ".to_string(),
                ingredients: vec!["1 onion".to_string(), "".to_string()],
                instructions: vec!["Simmer".to_string()],
                ..Default::default()
            })
        }

        async fn vision_extract(&self, _image: &ImageSource) -> Result<RawRecipeFields, AiError> {
            if self.fail {
                return Err("image unreadable".into());
            }
            Ok(RawRecipeFields {
                title: Some("Card Cake".to_string()),
                ingredients: vec!["2 eggs".to_string()],
                servings: Some(8),
                ..Default::default()
            })
        }
    }

    fn options_with(enabled: bool, fail: bool) -> ParseOptions {
        ParseOptions {
            use_ai: true,
            ai_service: Some(Arc::new(StubAi { enabled, fail })),
            ..Default::default()
        }
    }

    const PLAIN_HTML: &str = "<html><body><h1>Soup</h1><p>No markup here.</p></body></html>";

    const JSON_LD_HTML: &str = r#"<html><head><script type="application/ld+json">
        {"@type": "Recipe", "name": "Toast", "recipeIngredient": ["1 slice bread"], "recipeInstructions": "Toast it."}
    </script></head><body></body></html>"#;

    #[test]
    fn test_confidence_increments() {
        let minimal = ParsedRecipe {
            title: "Toast".to_string(),
            ..Default::default()
        };
        assert!((calculate_confidence(&minimal, 0.5) - 0.6).abs() < 1e-9);

        let complete = ParsedRecipe {
            title: "Toast".to_string(),
            ingredients: vec!["bread".to_string()],
            instructions: vec!["toast".to_string()],
            cook_time: Some(RecipeDuration::from_minutes(3)),
            servings: Some(1),
            ..Default::default()
        };
        assert!((calculate_confidence(&complete, 0.5) - 1.0).abs() < 1e-9);
        assert!(calculate_confidence(&complete, 0.5) > calculate_confidence(&minimal, 0.5));
        assert_eq!(calculate_confidence(&complete, 0.6), 1.0);

        let untitled = ParsedRecipe::default();
        assert_eq!(untitled.title, DEFAULT_TITLE);
        assert!((calculate_confidence(&untitled, 0.5) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_parse_from_html_schema_org() {
        let result = parse_from_html(JSON_LD_HTML, Some("https://example.com/toast"));
        assert!(result.success);
        assert_eq!(result.source, ParseSource::SchemaOrg);
        let recipe = result.recipe.unwrap();
        assert_eq!(recipe.title, "Toast");
        assert_eq!(recipe.source_url.as_deref(), Some("https://example.com/toast"));
        assert!((result.confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_parse_from_html_without_markup() {
        let result = parse_from_html(PLAIN_HTML, None);
        assert!(!result.success);
        assert!(result.recipe.is_none());
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.errors, vec!["No schema.org recipe data found on page"]);
    }

    #[tokio::test]
    async fn test_schema_org_preferred_over_ai() {
        let result = parse_from_html_with_ai(JSON_LD_HTML, None, &options_with(true, false)).await;
        assert!(result.success);
        assert_eq!(result.source, ParseSource::SchemaOrg);
    }

    #[tokio::test]
    async fn test_ai_fallback_success_is_sanitized() {
        let result =
            parse_from_html_with_ai(PLAIN_HTML, Some("https://example.com/soup"), &options_with(true, false))
                .await;
        assert!(result.success);
        assert_eq!(result.source, ParseSource::Ai);
        let recipe = result.recipe.unwrap();
        assert_eq!(recipe.title, "Stub Soup");
        assert_eq!(recipe.ingredients, vec!["1 onion"]);
        assert_eq!(recipe.source_url.as_deref(), Some("https://example.com/soup"));
        // 0.6 base + title + ingredients + instructions
        assert!((result.confidence - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_ai_failure_combines_errors() {
        let result = parse_from_html_with_ai(PLAIN_HTML, None, &options_with(true, true)).await;
        assert!(!result.success);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.source, ParseSource::Ai);
        assert_eq!(result.errors.len(), 2);
        assert!(result.errors[0].contains("model overloaded"));
        assert_eq!(result.errors[1], "No schema.org recipe data found on page");
    }

    #[tokio::test]
    async fn test_disabled_ai_is_not_called() {
        let mut options = options_with(false, false);
        let result = parse_from_html_with_ai(PLAIN_HTML, None, &options).await;
        assert!(!result.success);
        assert_eq!(result.source, ParseSource::SchemaOrg);
        assert!(result
            .errors
            .contains(&ImportError::AiUnavailable.to_string()));

        options.use_ai = false;
        options.ai_service = Some(Arc::new(StubAi { enabled: true, fail: false }));
        let result = parse_from_html_with_ai(PLAIN_HTML, None, &options).await;
        assert!(!result.success);
        assert_eq!(result.errors, vec!["No schema.org recipe data found on page"]);
    }

    #[tokio::test]
    async fn test_image_path() {
        let image = ImageSource::Path("card.jpg".to_string());
        let result = parse_from_image_with_ai(&image, &options_with(true, false)).await;
        assert!(result.success);
        assert_eq!(result.source, ParseSource::Ai);
        let recipe = result.recipe.unwrap();
        assert_eq!(recipe.title, "Card Cake");
        assert_eq!(recipe.servings, Some(8));
        // 0.6 base + title + ingredients + servings
        assert!((result.confidence - 0.9).abs() < 1e-9);

        let result = parse_from_image_with_ai(&image, &ParseOptions::default()).await;
        assert!(!result.success);
        assert_eq!(result.errors, vec![ImportError::AiUnavailable.to_string()]);

        let result = parse_from_image_with_ai(&image, &options_with(true, true)).await;
        assert!(!result.success);
        assert!(result.errors[0].contains("image unreadable"));
    }

    #[tokio::test]
    async fn test_url_scheme_rejected_before_fetch() {
        let result = parse_from_url("ftp://example.com/recipe", &ParseOptions::default()).await;
        assert!(!result.success);
        assert!(result.errors[0].contains("ftp"));

        let result =
            parse_from_url_with_ai("javascript:alert(1)", &options_with(true, false)).await;
        assert!(!result.success);
        assert_eq!(result.source, ParseSource::SchemaOrg);
    }

    #[test]
    fn test_options_from_config() {
        let mut config = ImportConfig::default();
        config.timeout_ms = 2500;
        config.use_ai = true;
        let options = ParseOptions::from_config(&config);
        assert_eq!(options.timeout, Duration::from_millis(2500));
        assert!(options.use_ai);
        assert!(options.ai_service.is_none());
        assert!(format!("{:?}", options).contains("use_ai: true"));
    }
}
