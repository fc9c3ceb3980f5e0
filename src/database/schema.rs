use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type Uuid = i32;

/// One candidate dish, as presented to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub cooking_time_minutes: u32,
    pub energy_kcal: Option<f64>,
    pub image_uri: Option<String>,
    pub ingredients: Vec<String>,
    /// Execution order. Never sorted or deduplicated.
    pub steps: Vec<RecipeStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeStep {
    pub description: String,
}

impl RecipeStep {
    pub fn new(description: &str) -> Self {
        Self {
            description: description.to_string(),
        }
    }
}

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct RecipeRow {
    pub id: Uuid,
    pub name: String,
    pub cooking_time: i32,
    pub meal_type: Option<String>,
    pub diet_type: Option<String>,
    pub energy_kcal: Option<f64>,
    pub image_uri: Option<String>,
}

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct RecipeIngredientRow {
    pub recipe_id: Uuid,
    pub position: i32,
    pub name: String,
}

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct RecipeStepRow {
    pub recipe_id: Uuid,
    pub position: i32,
    pub description: String,
}

impl RecipeRow {
    /// Attaches ingredient and step lines, which must already be sorted by position.
    pub fn into_recipe(self, ingredients: Vec<String>, steps: Vec<RecipeStep>) -> Recipe {
        Recipe {
            id: self.id.to_string(),
            name: self.name,
            cooking_time_minutes: self.cooking_time.max(0) as u32,
            energy_kcal: self.energy_kcal,
            image_uri: self.image_uri,
            ingredients,
            steps,
        }
    }
}

/// Predicates for `/recipes_filter`. Unset fields don't constrain the result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    pub cooking_time: Option<u32>,
    pub meal_type: Option<String>,
    pub diet_type: Option<String>,
    pub ingredients: Vec<String>,
}

impl FilterCriteria {
    pub fn apply_preferences(mut self, preferences: &UserPreferences) -> Self {
        if self.diet_type.is_none() {
            self.diet_type = preferences.diet_type.first().cloned();
        }
        self
    }

    /// Query parameters in the filter service's naming; unset fields are left out.
    ///
    /// Ingredients travel as one comma separated value, so a name containing a comma
    /// arrives at the service as two ingredients.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![];

        if let Some(cooking_time) = self.cooking_time {
            query.push(("cookingTime", cooking_time.to_string()));
        }
        if let Some(meal_type) = &self.meal_type {
            query.push(("mealType", meal_type.to_owned()));
        }
        if let Some(diet_type) = &self.diet_type {
            query.push(("dietType", diet_type.to_owned()));
        }
        if !self.ingredients.is_empty() {
            query.push(("ingredients", self.ingredients.join(",")));
        }

        query
    }

    /// Stable textual form, used as a cache key. Ingredient order and case don't matter.
    pub fn cache_key(&self) -> String {
        let mut ingredients: Vec<String> =
            self.ingredients.iter().map(|i| i.to_lowercase()).collect();
        ingredients.sort();
        ingredients.dedup();

        serde_json::json!([
            self.cooking_time,
            self.meal_type,
            self.diet_type,
            ingredients
        ])
        .to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    /// The first entry fills an unset `dietType` filter.
    pub diet_type: Vec<String>,
    /// Recipes with an ingredient line mentioning any of these are never dealt.
    pub food_allergies: Vec<String>,
    /// Free-form notes kept for the user. Stored and returned as is; they don't filter anything.
    pub dietary_restrictions: Vec<String>,
}

impl UserPreferences {
    /// True when any ingredient line mentions one of the user's allergies.
    pub fn excludes(&self, recipe: &Recipe) -> bool {
        let allergies: Vec<String> = self
            .food_allergies
            .iter()
            .map(|a| a.trim().to_lowercase())
            .filter(|a| !a.is_empty())
            .collect();

        recipe.ingredients.iter().any(|line| {
            let line = line.to_lowercase();
            allergies.iter().any(|allergy| line.contains(allergy.as_str()))
        })
    }
}

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct PreferencesRow {
    pub user_id: String,
    pub diet_type: Vec<String>,
    pub food_allergies: Vec<String>,
    pub dietary_restrictions: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<PreferencesRow> for UserPreferences {
    fn from(value: PreferencesRow) -> Self {
        Self {
            diet_type: value.diet_type,
            food_allergies: value.food_allergies,
            dietary_restrictions: value.dietary_restrictions,
        }
    }
}
