/// System prompt for pulling a recipe out of page text.
///
/// The reply shape matches [`super::RawRecipeFields`] so the text and vision
/// paths share one parser.
pub const RECIPE_EXTRACTION_PROMPT: &str = r#"You extract cooking recipes from web page text.

Reply with a single JSON object and nothing else, using exactly these keys:
{
  "title": string or null,
  "description": string or null,
  "ingredients": [string],
  "instructions": [string],
  "prep_time_minutes": integer or null,
  "cook_time_minutes": integer or null,
  "total_time_minutes": integer or null,
  "servings": integer or null
}

Rules:
- Copy each ingredient line as written, including its quantity and unit.
- Give one instruction step per array entry, without step numbers.
- Ignore navigation, comments, ads and unrelated stories.
- Use null or an empty array when the page does not state a value.
- If the page contains no recipe, return empty arrays and a null title."#;

/// Prompt sent alongside a photo of a recipe card or cookbook page.
pub const VISION_EXTRACTION_PROMPT: &str = r#"This image shows a recipe, for example a handwritten card or a cookbook page.

Transcribe it into a single JSON object and nothing else, using exactly these keys:
{
  "title": string or null,
  "description": string or null,
  "ingredients": [string],
  "instructions": [string],
  "prep_time_minutes": integer or null,
  "cook_time_minutes": integer or null,
  "total_time_minutes": integer or null,
  "servings": integer or null
}

Copy ingredient lines as written, one per entry, and split the method into steps.
Use null or an empty array for anything that is not legible or not present."#;
