use serde::{Deserialize, Serialize};
use std::fmt;

/// Grocery aisle an ingredient belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngredientCategory {
    Produce,
    Meat,
    Seafood,
    Dairy,
    Bakery,
    Frozen,
    Pantry,
    Spices,
    Beverages,
    Other,
}

impl IngredientCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngredientCategory::Produce => "produce",
            IngredientCategory::Meat => "meat",
            IngredientCategory::Seafood => "seafood",
            IngredientCategory::Dairy => "dairy",
            IngredientCategory::Bakery => "bakery",
            IngredientCategory::Frozen => "frozen",
            IngredientCategory::Pantry => "pantry",
            IngredientCategory::Spices => "spices",
            IngredientCategory::Beverages => "beverages",
            IngredientCategory::Other => "other",
        }
    }
}

impl fmt::Display for IngredientCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Checked in this order; the first list with a substring hit wins, so
// "salt" lands in pantry even though spices also lists it.
const CATEGORY_KEYWORDS: &[(IngredientCategory, &[&str])] = &[
    (
        IngredientCategory::Produce,
        &[
            "apple", "banana", "lemon", "lime", "orange", "onion", "garlic", "potato",
            "tomato", "carrot", "celery", "lettuce", "spinach", "kale", "cabbage", "broccoli",
            "cauliflower", "zucchini", "cucumber", "bell pepper", "jalapeno", "jalapeño",
            "mushroom", "avocado", "berries", "strawberr", "blueberr", "raspberr", "grape",
            "peach", "pear", "mango", "pineapple", "eggplant", "scallion", "shallot", "leek",
            "ginger", "cilantro", "parsley", "basil", "mint", "squash", "pumpkin", "asparagus",
            "green bean", "sweet potato", "radish", "beet",
        ],
    ),
    (
        IngredientCategory::Meat,
        &[
            "chicken", "beef", "pork", "lamb", "turkey", "bacon", "sausage", "steak", "veal",
            "prosciutto", "pancetta", "chorizo", "duck", "venison", "ground meat", "meatball",
            "salami", "pepperoni",
        ],
    ),
    (
        IngredientCategory::Seafood,
        &[
            "salmon", "tuna", "shrimp", "prawn", "cod", "crab", "lobster", "scallop", "clam",
            "mussel", "oyster", "fish", "anchov", "tilapia", "halibut", "squid", "sardine",
        ],
    ),
    (
        IngredientCategory::Dairy,
        &[
            "milk", "butter", "cheese", "cream", "yogurt", "yoghurt", "egg", "parmesan",
            "mozzarella", "cheddar", "ricotta", "ghee", "feta",
        ],
    ),
    (
        IngredientCategory::Bakery,
        &[
            "bread", "bun", "bagel", "tortilla", "pita", "croissant", "baguette", "muffin",
            "dinner roll", "naan",
        ],
    ),
    (
        IngredientCategory::Frozen,
        &["frozen", "ice cream", "sorbet"],
    ),
    (
        IngredientCategory::Pantry,
        &[
            "flour", "sugar", "salt", "oil", "vinegar", "rice", "pasta", "noodle", "spaghetti",
            "baking soda", "baking powder", "yeast", "honey", "syrup", "stock", "broth",
            "soy sauce", "ketchup", "mustard", "mayonnaise", "cornstarch", "oats", "lentil",
            "chickpea", "almond", "peanut", "walnut", "pecan", "chocolate", "cocoa", "vanilla",
            "sauce", "jam", "beans", "quinoa",
        ],
    ),
    (
        IngredientCategory::Spices,
        &[
            "pepper", "salt", "cumin", "paprika", "cinnamon", "oregano", "thyme", "rosemary",
            "nutmeg", "chili powder", "cayenne", "turmeric", "bay leaf", "bay leaves",
            "coriander", "curry", "seasoning", "spice", "cardamom", "sage", "dill", "clove",
        ],
    ),
    (
        IngredientCategory::Beverages,
        &["water", "juice", "wine", "beer", "coffee", "tea", "soda", "liquor", "rum", "vodka"],
    ),
];

/// First category whose keyword list has a substring match in `name`.
pub fn categorize(name: &str) -> IngredientCategory {
    let lower = name.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lower.contains(keyword)))
        .map(|(category, _)| *category)
        .unwrap_or(IngredientCategory::Other)
}
