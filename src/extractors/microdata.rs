use super::Extractor;
use crate::schema::{
    Description, ImageField, IngredientEntry, InstructionItem, RecipeIngredients,
    RecipeInstructions, RecipeYield, SchemaOrgRecipe,
};
use log::debug;
use scraper::{ElementRef, Html, Selector};

/// Elements whose end starts a new line of text.
const BLOCK_ELEMENTS: &[&str] = &[
    "p", "li", "div", "h1", "h2", "h3", "h4", "h5", "h6", "tr", "section",
];

pub struct MicrodataExtractor;

/// One element carrying an `itemprop` of the Recipe item itself.
struct MicroProp<'a> {
    element: ElementRef<'a>,
}

impl MicroProp<'_> {
    fn is(&self, prop: &str) -> bool {
        self.element
            .value()
            .attr("itemprop")
            .is_some_and(|names| names.split_whitespace().any(|name| name == prop))
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.element
            .value()
            .attr(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn text(&self) -> String {
        element_text(self.element)
    }

    /// `content` attribute when present, otherwise the inline text.
    fn value(&self) -> Option<String> {
        self.attr("content")
            .or_else(|| Some(self.text()))
            .filter(|v| !v.is_empty())
    }
}

impl MicrodataExtractor {
    /// First item whose `itemtype` names a Recipe.
    fn find_recipe_scope<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        let selector = Selector::parse("[itemscope][itemtype]").ok()?;
        document.select(&selector).find(|element| {
            element
                .value()
                .attr("itemtype")
                .is_some_and(is_recipe_itemtype)
        })
    }

    /// Every `itemprop` element of the Recipe itself, skipping properties
    /// that belong to nested items such as the author.
    fn collect_props<'a>(&self, scope: ElementRef<'a>) -> Vec<MicroProp<'a>> {
        let Ok(selector) = Selector::parse("[itemprop]") else {
            return Vec::new();
        };
        scope
            .select(&selector)
            .filter(|element| !inside_nested_item(*element, scope))
            .map(|element| MicroProp { element })
            .collect()
    }
}

impl Extractor for MicrodataExtractor {
    fn name(&self) -> &'static str {
        "microdata"
    }

    fn extract(&self, html: &str) -> Option<SchemaOrgRecipe> {
        let document = Html::parse_document(html);
        let scope = self.find_recipe_scope(&document)?;
        let props = self.collect_props(scope);
        debug!("MicrodataExtractor: {} itemprop elements in Recipe scope", props.len());

        let first = |prop: &str| props.iter().find(|p| p.is(prop)).and_then(MicroProp::value);
        let all = |prop: &str| -> Vec<String> {
            props
                .iter()
                .filter(|p| p.is(prop))
                .filter_map(MicroProp::value)
                .collect()
        };
        let time = |prop: &str| {
            props.iter().find(|p| p.is(prop)).and_then(|p| {
                p.attr("content")
                    .or_else(|| p.attr("datetime"))
                    .or_else(|| Some(p.text()))
                    .filter(|v| !v.is_empty())
            })
        };

        let Some(name) = first("name").map(|n| single_line(&n)) else {
            debug!("MicrodataExtractor: Recipe item has no name");
            return None;
        };

        let mut ingredients = all("recipeIngredient");
        if ingredients.is_empty() {
            ingredients = all("ingredients");
        }
        let recipe_ingredient = (!ingredients.is_empty()).then(|| {
            RecipeIngredients::Many(
                ingredients
                    .iter()
                    .map(|line| IngredientEntry::Text(single_line(line)))
                    .collect(),
            )
        });

        let mut steps = all("recipeInstructions");
        let recipe_instructions = match steps.len() {
            0 => None,
            1 => steps.pop().map(RecipeInstructions::Text),
            _ => Some(RecipeInstructions::Steps(
                steps
                    .iter()
                    .map(|step| InstructionItem::Text(single_line(step)))
                    .collect(),
            )),
        };

        let image = props
            .iter()
            .find(|p| p.is("image"))
            .and_then(|p| p.attr("src").or_else(|| p.attr("content")));

        Some(SchemaOrgRecipe {
            name: Some(name),
            description: first("description").map(Description::Text),
            recipe_ingredient,
            recipe_instructions,
            prep_time: time("prepTime"),
            cook_time: time("cookTime"),
            total_time: time("totalTime"),
            recipe_yield: first("recipeYield").map(RecipeYield::Text),
            image: image.map(ImageField::Url),
        })
    }
}

fn is_recipe_itemtype(itemtype: &str) -> bool {
    itemtype.split_whitespace().any(|t| {
        let t = t.trim_end_matches('/').to_ascii_lowercase();
        t.ends_with("schema.org/recipe") || t.ends_with("data-vocabulary.org/recipe")
    })
}

/// Whether an `itemscope` element other than `scope` sits between `element`
/// and `scope`.
fn inside_nested_item(element: ElementRef, scope: ElementRef) -> bool {
    for ancestor in element.ancestors() {
        if ancestor.id() == scope.id() {
            return false;
        }
        let opens_item = ancestor
            .value()
            .as_element()
            .is_some_and(|el| el.attr("itemscope").is_some());
        if opens_item {
            return true;
        }
    }
    false
}

/// Visible text of an element: block boundaries become line breaks and runs
/// of whitespace collapse per line.
fn element_text(element: ElementRef) -> String {
    let mut raw = String::new();
    push_text(element, &mut raw);
    raw.lines()
        .map(single_line)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn push_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            continue;
        }
        let Some(child) = ElementRef::wrap(child) else {
            continue;
        };
        match child.value().name() {
            "script" | "style" | "noscript" => {}
            "br" => out.push('\n'),
            name => {
                push_text(child, out);
                if BLOCK_ELEMENTS.contains(&name) {
                    out.push('\n');
                }
            }
        }
    }
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
