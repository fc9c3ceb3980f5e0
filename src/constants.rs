pub const RECIPE_FILTER_LIMIT: i64 = 100;
pub const INGREDIENT_SUGGESTION_LIMIT: usize = 5;

/// Fraction of the viewport width a drag has to pass before it counts as a decision.
pub const SWIPE_THRESHOLD_FRACTION: f64 = 0.25;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3030";

pub const MEAL_TYPES: &[(&str, &str)] = &[
    ("breakfast", "Breakfast"),
    ("lunch", "Lunch"),
    ("dinner", "Dinner"),
    ("snack", "Snack"),
    ("dessert", "Dessert"),
];

pub const DIET_TYPES: &[(&str, &str)] = &[
    ("omnivore", "Omnivore"),
    ("vegetarian", "Vegetarian"),
    ("vegan", "Vegan"),
    ("pescatarian", "Pescatarian"),
    ("keto", "Keto"),
    ("gluten_free", "Gluten free"),
];
