use clap::Parser;
use log::{debug, warn};
use recipe_extract::{
    normalize_ingredients, parse_from_html, parse_from_html_with_ai, parse_from_image_with_ai,
    parse_from_url, parse_from_url_with_ai, ImageSource, ImportConfig, ParseOptions, ParseResult,
};
use serde_json::json;
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "recipe-extract",
    version,
    about = "Extract a structured recipe from a web page, HTML file or photo (JSON output)"
)]
struct Cli {
    /// URL to fetch, or a file path with --html-file / --image
    source: String,

    /// Treat SOURCE as a local HTML file
    #[arg(long, conflicts_with = "image")]
    html_file: bool,

    /// Treat SOURCE as a recipe photo read by the AI service
    #[arg(long)]
    image: bool,

    /// Fall back to the AI service when the page has no schema.org markup
    #[arg(long)]
    ai: bool,

    /// Also print the ingredient lines split into quantity, unit and name
    #[arg(long)]
    normalize: bool,

    /// Fetch timeout in milliseconds (overrides configuration)
    #[arg(long)]
    timeout_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let config = ImportConfig::load().unwrap_or_else(|e| {
        warn!("Failed to load configuration, using defaults: {}", e);
        ImportConfig::default()
    });
    let mut options = ParseOptions::from_config(&config);
    if let Some(ms) = cli.timeout_ms {
        options.timeout = Duration::from_millis(ms);
    }
    if cli.ai {
        options.use_ai = true;
    }
    debug!("{:?}", options);

    let result = run(&cli, &options).await?;

    let output = if cli.normalize {
        let ingredients = result
            .recipe
            .as_ref()
            .map(|recipe| normalize_ingredients(&recipe.ingredients))
            .unwrap_or_default();
        json!({ "result": result, "normalizedIngredients": ingredients })
    } else {
        serde_json::to_value(&result)?
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    if !result.success {
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cli: &Cli, options: &ParseOptions) -> Result<ParseResult, Box<dyn std::error::Error>> {
    if cli.image {
        let image = ImageSource::Path(cli.source.clone());
        return Ok(parse_from_image_with_ai(&image, options).await);
    }

    if cli.html_file {
        let html = tokio::fs::read_to_string(&cli.source).await?;
        let result = if options.use_ai {
            parse_from_html_with_ai(&html, None, options).await
        } else {
            parse_from_html(&html, None)
        };
        return Ok(result);
    }

    let result = if options.use_ai {
        parse_from_url_with_ai(&cli.source, options).await
    } else {
        parse_from_url(&cli.source, options).await
    };
    Ok(result)
}
