use thiserror::Error;

/// Errors that can occur while fetching or extracting a recipe
#[derive(Error, Debug)]
pub enum ImportError {
    /// Transport-level failure while fetching the page
    #[error("Failed to fetch URL: {0}")]
    FetchError(#[from] reqwest::Error),

    /// The URL could not be parsed at all
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Only http and https pages are fetched
    #[error("Unsupported URL scheme '{0}', only http and https are allowed")]
    UnsupportedScheme(String),

    /// The server answered with a non-success status
    #[error("HTTP request failed with status {0}")]
    HttpStatus(u16),

    /// The fetch was aborted after the configured timeout
    #[error("Request timed out after {0}ms")]
    Timeout(u64),

    /// The page carries neither JSON-LD nor microdata Recipe markup
    #[error("No schema.org recipe data found on page")]
    NoSchemaOrgData,

    /// AI fallback was requested but no enabled AI service is configured
    #[error("AI service is not configured or not enabled")]
    AiUnavailable,

    /// The AI collaborator returned an error
    #[error("AI parsing failed: {0}")]
    AiFailed(String),

    /// The AI collaborator answered but found nothing recipe-like
    #[error("AI found no recipe in the input")]
    AiNoRecipe,

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}
