use crate::config::AiConfig;
use crate::providers::{AiError, AnthropicProvider, OpenAIProvider, RecipeAiService};
use log::debug;
use std::sync::Arc;

/// Resolve the `[ai]` section into a ready collaborator.
///
/// `Ok(None)` means AI is switched off: no providers are configured, or the
/// default one has `enabled = false`. A default provider that is missing,
/// unknown or has no usable API key is an error.
pub fn service_from_config(config: &AiConfig) -> Result<Option<Arc<dyn RecipeAiService>>, AiError> {
    if config.providers.is_empty() {
        return Ok(None);
    }

    let name = config.default_provider.as_str();
    let Some(provider) = config.providers.get(name) else {
        return Err(format!("default AI provider '{name}' has no [ai.providers.{name}] section").into());
    };
    if !provider.enabled {
        debug!("AI provider '{}' is disabled in configuration", name);
        return Ok(None);
    }

    let service: Arc<dyn RecipeAiService> = match name {
        "openai" => Arc::new(OpenAIProvider::new(provider)?),
        "anthropic" => Arc::new(AnthropicProvider::new(provider)?),
        other => {
            return Err(
                format!("unsupported AI provider '{other}', expected openai or anthropic").into(),
            )
        }
    };

    if !service.is_enabled() {
        return Err(format!("AI provider '{name}' has an empty API key").into());
    }
    debug!("Using {} for AI fallback", service.provider_name());
    Ok(Some(service))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;
    use std::collections::HashMap;

    fn ai_config(default_provider: &str, api_key: &str, enabled: bool) -> AiConfig {
        let provider = ProviderConfig {
            enabled,
            model: "recipe-model".to_string(),
            temperature: 0.0,
            max_tokens: 1000,
            api_key: Some(api_key.to_string()),
            base_url: None,
        };
        AiConfig {
            default_provider: default_provider.to_string(),
            providers: HashMap::from([(default_provider.to_string(), provider)]),
        }
    }

    #[test]
    fn test_no_providers_means_no_ai() {
        assert!(service_from_config(&AiConfig::default()).unwrap().is_none());
    }

    #[test]
    fn test_builds_each_supported_provider() {
        for name in ["openai", "anthropic"] {
            let service = service_from_config(&ai_config(name, "sk-test", true))
                .unwrap()
                .unwrap();
            assert_eq!(service.provider_name(), name);
            assert!(service.is_enabled());
        }
    }

    #[test]
    fn test_disabled_provider_switches_ai_off() {
        let service = service_from_config(&ai_config("anthropic", "sk-test", false)).unwrap();
        assert!(service.is_none());
    }

    #[test]
    fn test_blank_api_key_is_rejected() {
        let err = service_from_config(&ai_config("openai", "  ", true)).err().unwrap();
        assert!(err.to_string().contains("empty API key"));
    }

    #[test]
    fn test_unknown_and_missing_defaults() {
        let err = service_from_config(&ai_config("gemini", "key", true)).err().unwrap();
        assert!(err.to_string().contains("unsupported AI provider 'gemini'"));

        let mut config = ai_config("openai", "key", true);
        config.default_provider = "anthropic".to_string();
        let err = service_from_config(&config).err().unwrap();
        assert!(err.to_string().contains("[ai.providers.anthropic]"));
    }
}
