use std::sync::Arc;
use std::time::Duration;

use crate::pipeline::{
    parse_from_html, parse_from_html_with_ai, parse_from_image_with_ai, parse_from_url,
    parse_from_url_with_ai, ParseOptions,
};
use crate::providers::{ImageSource, RecipeAiService};
use crate::{ImportError, ParseResult};

/// Represents the input source for a recipe
#[derive(Debug, Clone)]
pub enum InputSource {
    /// Fetch the page from a URL
    Url(String),
    /// Parse HTML that was already fetched
    Html {
        html: String,
        source_url: Option<String>,
    },
    /// Read a photographed recipe through the AI service
    Image(ImageSource),
}

/// Builder for configuring and executing a recipe parse
#[derive(Debug, Default)]
pub struct RecipeParserBuilder {
    source: Option<InputSource>,
    options: ParseOptions,
}

impl RecipeParserBuilder {
    /// Set the input source to a URL
    ///
    /// # Example
    /// ```
    /// use recipe_extract::RecipeParser;
    ///
    /// let builder = RecipeParser::builder()
    ///     .url("https://example.com/recipe");
    /// ```
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.source = Some(InputSource::Url(url.into()));
        self
    }

    /// Set the input source to an HTML document
    ///
    /// # Example
    /// ```
    /// use recipe_extract::RecipeParser;
    ///
    /// let builder = RecipeParser::builder()
    ///     .html("<html>...</html>", Some("https://example.com/recipe"));
    /// ```
    pub fn html(mut self, html: impl Into<String>, source_url: Option<&str>) -> Self {
        self.source = Some(InputSource::Html {
            html: html.into(),
            source_url: source_url.map(str::to_string),
        });
        self
    }

    /// Set the input source to an image file
    ///
    /// Images are only readable through the AI service's vision capability,
    /// so an enabled service must be supplied with [`Self::ai_service`].
    pub fn image(mut self, image_path: impl Into<String>) -> Self {
        self.source = Some(InputSource::Image(ImageSource::Path(image_path.into())));
        self
    }

    /// Set the input source to base64-encoded image data
    pub fn image_base64(mut self, data: impl Into<String>, media_type: impl Into<String>) -> Self {
        self.source = Some(InputSource::Image(ImageSource::Base64 {
            data: data.into(),
            media_type: media_type.into(),
        }));
        self
    }

    /// Set a timeout for HTTP requests
    ///
    /// # Example
    /// ```
    /// use recipe_extract::RecipeParser;
    /// use std::time::Duration;
    ///
    /// let builder = RecipeParser::builder()
    ///     .url("https://example.com/recipe")
    ///     .timeout(Duration::from_secs(30));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.options.timeout = duration;
        self
    }

    /// Set the user agent sent when fetching pages
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.options.user_agent = Some(user_agent.into());
        self
    }

    /// Fall back to the AI service when a page has no schema.org markup
    pub fn use_ai(mut self, use_ai: bool) -> Self {
        self.options.use_ai = use_ai;
        self
    }

    /// Set the AI service used for fallback and image parsing
    pub fn ai_service(mut self, service: Arc<dyn RecipeAiService>) -> Self {
        self.options.ai_service = Some(service);
        self
    }

    /// Replace all options at once, e.g. with [`ParseOptions::from_config`]
    pub fn options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Run the parse
    ///
    /// Extraction failures are reported inside the returned [`ParseResult`];
    /// the only error is a builder without an input source.
    ///
    /// # Example
    /// ```no_run
    /// # use recipe_extract::RecipeParser;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let result = RecipeParser::builder()
    ///     .url("https://example.com/recipe")
    ///     .parse()
    ///     .await?;
    /// println!("{}", result.success);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn parse(self) -> Result<ParseResult, ImportError> {
        let source = self.source.ok_or_else(|| {
            ImportError::BuilderError(
                "No input source specified. Use .url(), .html() or .image()".to_string(),
            )
        })?;
        let options = self.options;

        let result = match source {
            InputSource::Url(url) if options.use_ai => parse_from_url_with_ai(&url, &options).await,
            InputSource::Url(url) => parse_from_url(&url, &options).await,
            InputSource::Html { html, source_url } if options.use_ai => {
                parse_from_html_with_ai(&html, source_url.as_deref(), &options).await
            }
            InputSource::Html { html, source_url } => parse_from_html(&html, source_url.as_deref()),
            InputSource::Image(image) => parse_from_image_with_ai(&image, &options).await,
        };
        Ok(result)
    }
}

/// Main entry point for the builder API
pub struct RecipeParser;

impl RecipeParser {
    /// Creates a new builder for parsing recipes
    ///
    /// # Example
    /// ```
    /// use recipe_extract::RecipeParser;
    ///
    /// let builder = RecipeParser::builder();
    /// ```
    pub fn builder() -> RecipeParserBuilder {
        RecipeParserBuilder::default()
    }
}
