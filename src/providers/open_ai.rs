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

pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider from configuration
    pub fn new(config: &ProviderConfig) -> Result<Self, AiError> {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or("OPENAI_API_KEY not found in config or environment")?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| "https://api.openai.com".to_string());

        Ok(OpenAIProvider {
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
        OpenAIProvider {
            client: Client::new(),
            api_key,
            base_url,
            model,
            temperature: 0.0,
            max_tokens: 4000,
        }
    }

    async fn complete(&self, messages: Value) -> Result<String, AiError> {
        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&json!({
                "model": self.model,
                "messages": messages,
                "temperature": self.temperature,
                "max_tokens": self.max_tokens,
                "response_format": {"type": "json_object"}
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("OpenAI API error ({status}): {body}").into());
        }

        let response_body: Value = response.json().await?;
        debug!("{:?}", response_body);
        let content = response_body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or("Failed to extract content from response")?
            .to_string();

        Ok(content)
    }
}

#[async_trait]
impl RecipeAiService for OpenAIProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    fn is_enabled(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    async fn parse_recipe(&self, html: &str) -> Result<ParsedRecipe, AiError> {
        let content = self
            .complete(json!([
                {"role": "system", "content": RECIPE_EXTRACTION_PROMPT},
                {"role": "user", "content": html_to_prompt_text(html)}
            ]))
            .await?;
        Ok(parse_fields_response(&content)?.into_recipe())
    }

    async fn vision_extract(&self, image: &ImageSource) -> Result<RawRecipeFields, AiError> {
        let (media_type, data) = image.to_base64().await?;
        let content = self
            .complete(json!([
                {
                    "role": "user",
                    "content": [
                        {"type": "text", "text": VISION_EXTRACTION_PROMPT},
                        {"type": "image_url", "image_url": {"url": format!("data:{media_type};base64,{data}")}}
                    ]
                }
            ]))
            .await?;
        parse_fields_response(&content)
    }
}
