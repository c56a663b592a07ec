use super::Extractor;
use crate::schema::SchemaOrgRecipe;
use log::debug;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// JSON-LD script blocks, case-insensitive, non-greedy across tag bodies.
static JSONLD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]*type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#)
        .expect("Invalid JSON-LD regex")
});

pub struct JsonLdExtractor;

impl Extractor for JsonLdExtractor {
    fn name(&self) -> &'static str {
        "json_ld"
    }

    fn extract(&self, html: &str) -> Option<SchemaOrgRecipe> {
        for (index, cap) in JSONLD_REGEX.captures_iter(html).enumerate() {
            let Some(body) = cap.get(1) else {
                continue;
            };

            let json: Value = match serde_json::from_str(body.as_str().trim()) {
                Ok(json) => json,
                Err(e) => {
                    debug!("JsonLdExtractor: skipping malformed block {}: {}", index, e);
                    continue;
                }
            };

            if let Some(node) = find_first(&json, &is_recipe_type) {
                debug!("JsonLdExtractor: Recipe found in block {}", index);
                if let Some(recipe) = SchemaOrgRecipe::from_json(node) {
                    return Some(recipe);
                }
            }
        }
        None
    }
}

/// Depth-first, document-order search for the first node matching `predicate`.
/// A node is tested before its children; `@graph` arrays and top-level arrays
/// are ordinary children.
pub fn find_first<'a, F>(value: &'a Value, predicate: &F) -> Option<&'a Value>
where
    F: Fn(&Value) -> bool,
{
    if predicate(value) {
        return Some(value);
    }
    match value {
        Value::Object(map) => map.values().find_map(|child| find_first(child, predicate)),
        Value::Array(items) => items.iter().find_map(|child| find_first(child, predicate)),
        _ => None,
    }
}

/// `@type` is `"Recipe"` or an array containing it.
pub fn is_recipe_type(value: &Value) -> bool {
    let is_recipe = |v: &Value| {
        v.as_str()
            .is_some_and(|s| s.trim().eq_ignore_ascii_case("recipe"))
    };
    match value.get("@type") {
        Some(Value::Array(types)) => types.iter().any(is_recipe),
        Some(other) => is_recipe(other),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_html_document(json_ld: &str) -> String {
        format!(
            r#"
            <!DOCTYPE html>
            <html>
            <head>
                <script type="application/ld+json">
                    {json_ld}
                </script>
            </head>
            <body></body>
            </html>
            "#
        )
    }

    #[test]
    fn test_root_recipe() {
        let html = create_html_document(r#"{"@context": "https://schema.org/", "@type": "Recipe", "name": "Soup"}"#);
        let recipe = JsonLdExtractor.extract(&html).unwrap();
        assert_eq!(recipe.name.as_deref(), Some("Soup"));
    }

    #[test]
    fn test_graph_nesting() {
        let html = create_html_document(
            r#"{
                "@context": "https://schema.org",
                "@graph": [
                    {"@type": "WebPage", "name": "Page"},
                    {"@type": "Person", "name": "Author"},
                    {"@type": ["Recipe", "NewsArticle"], "name": "Graph Recipe"}
                ]
            }"#,
        );
        let recipe = JsonLdExtractor.extract(&html).unwrap();
        assert_eq!(recipe.name.as_deref(), Some("Graph Recipe"));
    }

    #[test]
    fn test_top_level_array() {
        let html = create_html_document(
            r#"[{"@type": "WebSite", "name": "Site"}, {"@type": "Recipe", "name": "Array Recipe"}]"#,
        );
        let recipe = JsonLdExtractor.extract(&html).unwrap();
        assert_eq!(recipe.name.as_deref(), Some("Array Recipe"));
    }

    #[test]
    fn test_malformed_block_is_skipped() {
        let html = r#"
            <script type="application/ld+json">{ "@type": "Recipe", "name": </script>
            <SCRIPT TYPE="application/LD+JSON">{"@type": "Recipe", "name": "Second Block"}</SCRIPT>
        "#;
        let recipe = JsonLdExtractor.extract(html).unwrap();
        assert_eq!(recipe.name.as_deref(), Some("Second Block"));
    }

    #[test]
    fn test_first_match_wins_in_document_order() {
        let value = json!({
            "mainEntity": {"@type": "Recipe", "name": "First"},
            "@graph": [{"@type": "Recipe", "name": "Second"}]
        });
        let found = find_first(&value, &is_recipe_type).unwrap();
        assert_eq!(found["name"], "First");
    }

    #[test]
    fn test_is_recipe_type() {
        assert!(is_recipe_type(&json!({"@type": "Recipe"})));
        assert!(is_recipe_type(&json!({"@type": "recipe"})));
        assert!(is_recipe_type(&json!({"@type": ["Thing", "Recipe"]})));
        assert!(!is_recipe_type(&json!({"@type": "WebPage"})));
        assert!(!is_recipe_type(&json!({"name": "Recipe"})));
        assert!(!is_recipe_type(&json!("Recipe")));
    }

    #[test]
    fn test_no_recipe_in_blocks() {
        let html = create_html_document(r#"{"@type": "Organization", "name": "Acme"}"#);
        assert!(JsonLdExtractor.extract(&html).is_none());
    }
}
