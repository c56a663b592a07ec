use crate::schema::SchemaOrgRecipe;
use log::debug;

mod json_ld;
mod microdata;

pub use self::json_ld::{find_first, is_recipe_type, JsonLdExtractor};
pub use self::microdata::MicrodataExtractor;

/// A source of schema.org Recipe data inside an HTML document.
pub trait Extractor {
    fn name(&self) -> &'static str;
    /// Returns `None` when this format carries no Recipe; never fails.
    fn extract(&self, html: &str) -> Option<SchemaOrgRecipe>;
}

/// Pull a schema.org Recipe out of raw HTML.
///
/// JSON-LD always wins over microdata; microdata is only consulted when no
/// JSON-LD block holds a Recipe.
pub fn extract_schema_org(html: &str) -> Option<SchemaOrgRecipe> {
    let extractors: Vec<Box<dyn Extractor>> =
        vec![Box::new(JsonLdExtractor), Box::new(MicrodataExtractor)];

    for extractor in extractors {
        if let Some(recipe) = extractor.extract(html) {
            debug!("Recipe found by {} extractor", extractor.name());
            return Some(recipe);
        }
        debug!("{} extractor found no recipe", extractor.name());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_ld_preferred_over_microdata() {
        let html = r#"
        <html><head>
        <script type="application/ld+json">{"@type": "Recipe", "name": "From JSON-LD"}</script>
        </head><body>
        <div itemscope itemtype="https://schema.org/Recipe">
            <h1 itemprop="name">From Microdata</h1>
        </div>
        </body></html>
        "#;
        let recipe = extract_schema_org(html).unwrap();
        assert_eq!(recipe.name.as_deref(), Some("From JSON-LD"));
    }

    #[test]
    fn test_microdata_used_when_json_ld_has_no_recipe() {
        let html = r#"
        <script type="application/ld+json">{"@type": "WebSite", "name": "Blog"}</script>
        <div itemscope itemtype="https://schema.org/Recipe">
            <h1 itemprop="name">From Microdata</h1>
        </div>
        "#;
        let recipe = extract_schema_org(html).unwrap();
        assert_eq!(recipe.name.as_deref(), Some("From Microdata"));
    }

    #[test]
    fn test_plain_page_has_no_recipe() {
        assert!(extract_schema_org("<html><body><p>Hello</p></body></html>").is_none());
        assert!(extract_schema_org("").is_none());
    }
}
