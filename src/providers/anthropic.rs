use crate::config::ProviderConfig;
use crate::model::ParsedRecipe;
use crate::providers::{
    html_to_prompt_text, parse_fields_response, AiError, ImageSource, RawRecipeFields,
    RecipeAiService, RECIPE_EXTRACTION_PROMPT, VISION_EXTRACTION_PROMPT,
};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider from configuration
    pub fn new(config: &ProviderConfig) -> Result<Self, AiError> {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
            .ok_or("ANTHROPIC_API_KEY not found in config or environment")?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| "https://api.anthropic.com".to_string());

        Ok(AnthropicProvider {
            client: Client::new(),
            api_key,
            base_url,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        AnthropicProvider {
            client: Client::new(),
            api_key,
            base_url,
            model,
            temperature: 0.0,
            max_tokens: 4000,
        }
    }

    async fn message(&self, system: Option<&str>, content: Value) -> Result<String, AiError> {
        let mut body = json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
            "messages": [
                {
                    "role": "user",
                    "content": content
                }
            ]
        });
        if let Some(system) = system {
            body["system"] = json!(system);
        }

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("Anthropic API error ({status}): {body}").into());
        }

        let response_body: Value = response.json().await?;
        debug!("{:?}", response_body);

        let text = response_body["content"][0]["text"]
            .as_str()
            .ok_or("Failed to extract content from Anthropic response")?
            .to_string();

        Ok(text)
    }
}

#[async_trait]
impl RecipeAiService for AnthropicProvider {
    fn provider_name(&self) -> &str {
        "anthropic"
    }

    fn is_enabled(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    async fn parse_recipe(&self, html: &str) -> Result<ParsedRecipe, AiError> {
        let text = self
            .message(
                Some(RECIPE_EXTRACTION_PROMPT),
                json!(html_to_prompt_text(html)),
            )
            .await?;
        Ok(parse_fields_response(&text)?.into_recipe())
    }

    async fn vision_extract(&self, image: &ImageSource) -> Result<RawRecipeFields, AiError> {
        let (media_type, data) = image.to_base64().await?;
        let text = self
            .message(
                None,
                json!([
                    {
                        "type": "image",
                        "source": {"type": "base64", "media_type": media_type, "data": data}
                    },
                    {"type": "text", "text": VISION_EXTRACTION_PROMPT}
                ]),
            )
            .await?;
        parse_fields_response(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn test_config() -> ProviderConfig {
        ProviderConfig {
            enabled: true,
            model: "claude-3-5-sonnet-20241022".to_string(),
            temperature: 0.0,
            max_tokens: 4000,
            api_key: Some("test-key".to_string()),
            base_url: None,
        }
    }

    #[test]
    fn test_new_from_config() {
        let provider = AnthropicProvider::new(&test_config()).unwrap();
        assert_eq!(provider.provider_name(), "anthropic");
        assert_eq!(provider.base_url, "https://api.anthropic.com");
        assert!(provider.is_enabled());
    }

    #[tokio::test]
    async fn test_parse_recipe() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .match_header("x-api-key", "test-key")
            .match_header("anthropic-version", ANTHROPIC_VERSION)
            .match_body(Matcher::PartialJson(
                json!({"system": RECIPE_EXTRACTION_PROMPT}),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"content": [{"type": "text", "text": "{\"title\": \"Flatbread\", \"ingredients\": [\"2 cups flour\"], \"instructions\": [\"Mix\", \"Bake\"]}"}]}"#,
            )
            .create_async()
            .await;

        let provider = AnthropicProvider::with_base_url(
            "test-key".to_string(),
            server.url(),
            "claude-3-5-sonnet-20241022".to_string(),
        );
        let recipe = provider
            .parse_recipe("<body><h1>Flatbread</h1></body>")
            .await
            .unwrap();
        assert_eq!(recipe.title, "Flatbread");
        assert_eq!(recipe.ingredients, vec!["2 cups flour"]);
        assert_eq!(recipe.instructions, vec!["Mix", "Bake"]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_vision_extract_sends_image_block() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .match_body(Matcher::PartialJson(json!({
                "messages": [{
                    "role": "user",
                    "content": [{
                        "type": "image",
                        "source": {"type": "base64", "media_type": "image/jpeg", "data": "ZmFrZQ=="}
                    }]
                }]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"content": [{"type": "text", "text": "{\"title\": \"Card\", \"servings\": 2}"}]}"#,
            )
            .create_async()
            .await;

        let provider = AnthropicProvider::with_base_url(
            "test-key".to_string(),
            server.url(),
            "claude-3-5-sonnet-20241022".to_string(),
        );
        let image = ImageSource::Base64 {
            data: "ZmFrZQ==".to_string(),
            media_type: "image/jpeg".to_string(),
        };
        let fields = provider.vision_extract(&image).await.unwrap();
        assert_eq!(fields.title.as_deref(), Some("Card"));
        assert_eq!(fields.servings, Some(2));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_api_error_is_reported() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/messages")
            .with_status(529)
            .with_body(r#"{"error": {"type": "overloaded_error"}}"#)
            .create_async()
            .await;

        let provider = AnthropicProvider::with_base_url(
            "test-key".to_string(),
            server.url(),
            "claude-3-5-sonnet-20241022".to_string(),
        );
        let err = provider.parse_recipe("<p>x</p>").await.unwrap_err();
        assert!(err.to_string().contains("overloaded_error"));
    }
}
