//! Where recommendation sessions get their recipes from.

use std::{collections::HashMap, sync::Mutex, time::Duration};

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    error::{FetchError, IngestError},
    ingest::ingest_recipes,
    schema::{FilterCriteria, Recipe},
    SessionConfig,
};

/// The filter and autocomplete collaborators, enabling mockability in tests.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Recipes matching `criteria`. An empty match is `FetchError::NoRecipesMatched`.
    async fn filter_recipes(&self, criteria: &FilterCriteria) -> Result<Vec<Recipe>, FetchError>;

    async fn suggest_ingredients(&self, partial: &str) -> Result<Vec<String>, FetchError>;
}

/// Talks to the filter service over HTTP.
pub struct HttpRecipeSource {
    base_url: String,
    inner: reqwest::Client,
}

impl HttpRecipeSource {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(&config.base_url)
    }

    pub fn with_client(base_url: &str, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            inner: client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, FetchError> {
        let url = self.url(path);
        log::debug!("> GET {url} {query:?}");

        let response = self
            .inner
            .get(&url)
            .query(query)
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| IngestError::InvalidJson(format!("{e}")).into())
    }
}

#[async_trait]
impl RecipeSource for HttpRecipeSource {
    async fn filter_recipes(&self, criteria: &FilterCriteria) -> Result<Vec<Recipe>, FetchError> {
        let body = self.get_json("recipes_filter", &criteria.to_query()).await?;
        let recipes = ingest_recipes(body)?;

        if recipes.is_empty() {
            return Err(FetchError::NoRecipesMatched);
        }

        Ok(recipes)
    }

    async fn suggest_ingredients(&self, partial: &str) -> Result<Vec<String>, FetchError> {
        let body = self
            .get_json("ingredients", &[("ingredient", partial.to_string())])
            .await?;

        serde_json::from_value(body).map_err(|e| IngestError::InvalidJson(format!("{e}")).into())
    }
}

/// Canned responses for tests.
pub struct MockRecipeSource {
    recipes: Result<Vec<Recipe>, FetchError>,
    suggestions: HashMap<String, (Vec<String>, Duration)>,
    last_criteria: Mutex<Option<FilterCriteria>>,
}

impl MockRecipeSource {
    pub fn new() -> Self {
        Self {
            recipes: Ok(vec![]),
            suggestions: HashMap::new(),
            last_criteria: Mutex::new(None),
        }
    }

    pub fn with_recipes(mut self, recipes: Vec<Recipe>) -> Self {
        self.recipes = Ok(recipes);
        self
    }

    pub fn with_error(mut self, error: FetchError) -> Self {
        self.recipes = Err(error);
        self
    }

    /// Suggestions for `partial`, delivered after `delay`.
    pub fn with_suggestions(mut self, partial: &str, names: &[&str], delay: Duration) -> Self {
        self.suggestions.insert(
            partial.to_string(),
            (names.iter().map(|n| n.to_string()).collect(), delay),
        );
        self
    }

    /// The criteria of the most recent `filter_recipes` call.
    pub fn last_criteria(&self) -> Option<FilterCriteria> {
        self.last_criteria
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }
}

impl Default for MockRecipeSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecipeSource for MockRecipeSource {
    async fn filter_recipes(&self, criteria: &FilterCriteria) -> Result<Vec<Recipe>, FetchError> {
        if let Ok(mut last) = self.last_criteria.lock() {
            *last = Some(criteria.clone());
        }

        match &self.recipes {
            Ok(recipes) if recipes.is_empty() => Err(FetchError::NoRecipesMatched),
            Ok(recipes) => Ok(recipes.clone()),
            Err(e) => Err(e.clone()),
        }
    }

    async fn suggest_ingredients(&self, partial: &str) -> Result<Vec<String>, FetchError> {
        match self.suggestions.get(partial) {
            Some((names, delay)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(*delay).await;
                }
                Ok(names.clone())
            }
            None => Ok(vec![]),
        }
    }
}
