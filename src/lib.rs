//! Extract structured recipes from web pages and normalize their ingredient
//! lines.
//!
//! Pages are read from schema.org markup (JSON-LD first, then microdata).
//! When a page has none, an optional AI service can parse it instead. Either
//! way the result is a [`ParsedRecipe`] whose ingredient lines can be split
//! into quantity, unit, name, notes and category with
//! [`normalize_ingredient`].
//!
//! ```
//! use recipe_extract::{normalize_ingredient, parse_from_html, Unit};
//!
//! let html = r#"<script type="application/ld+json">
//!     {"@type": "Recipe", "name": "Pancakes", "recipeIngredient": ["1 1/2 cups flour"]}
//! </script>"#;
//!
//! let result = parse_from_html(html, None);
//! let recipe = result.recipe.unwrap();
//! let flour = normalize_ingredient(&recipe.ingredients[0]);
//! assert_eq!(flour.quantity, 1.5);
//! assert_eq!(flour.unit, Unit::Cup);
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod extractors;
pub mod fetcher;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod providers;
pub mod schema;

pub use builder::{InputSource, RecipeParser, RecipeParserBuilder};
pub use config::ImportConfig;
pub use error::ImportError;
pub use extractors::extract_schema_org;
pub use model::{ParseResult, ParseSource, ParsedRecipe, RecipeDuration};
pub use normalize::{
    normalize_ingredient, normalize_ingredients, IngredientCategory, NormalizedIngredient, Unit,
};
pub use pipeline::{
    calculate_confidence, parse_from_html, parse_from_html_with_ai, parse_from_image_with_ai,
    parse_from_url, parse_from_url_with_ai, ParseOptions,
};
pub use providers::{ImageSource, RawRecipeFields, RecipeAiService};
pub use schema::{schema_org_to_recipe, SchemaOrgRecipe};
