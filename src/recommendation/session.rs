use crate::{
    error::{EmptyDeck, FetchError},
    schema::{Recipe, UserPreferences},
    Deck, HttpRecipeSource, RecipeSource, SessionConfig, SwipeDecision, SwipeThreshold,
};

#[derive(Debug, Clone, PartialEq)]
pub enum SwipeOutcome {
    Accepted(Recipe),
    Rejected,
    /// Released inside the threshold, the card goes back to neutral.
    NoOp,
    /// A decision was made but nothing was pending.
    Empty,
}

/// One pass through the recommendation flow, from query results to accepted recipes.
#[derive(Debug)]
pub struct RecommendationSession {
    deck: Deck,
    threshold: SwipeThreshold,
}

impl RecommendationSession {
    /// Queries `source` with the configured criteria, filled in and filtered by `preferences`.
    pub async fn start<S: RecipeSource + ?Sized>(
        source: &S,
        config: &SessionConfig,
        preferences: Option<&UserPreferences>,
    ) -> Result<Self, FetchError> {
        let criteria = match preferences {
            Some(preferences) => config.criteria.clone().apply_preferences(preferences),
            None => config.criteria.clone(),
        };

        let mut recipes = source.filter_recipes(&criteria).await?;

        if let Some(preferences) = preferences {
            let before = recipes.len();
            recipes.retain(|recipe| !preferences.excludes(recipe));
            log::debug!("> Dropped {} recipes over allergies", before - recipes.len());

            if recipes.is_empty() {
                return Err(FetchError::NoRecipesMatched);
            }
        }

        Ok(Self::from_recipes(recipes, config))
    }

    /// [`Self::start`] against the filter service at `config.base_url`.
    pub async fn connect(
        config: &SessionConfig,
        preferences: Option<&UserPreferences>,
    ) -> Result<Self, FetchError> {
        Self::start(&HttpRecipeSource::from_config(config), config, preferences).await
    }

    pub fn from_recipes(recipes: Vec<Recipe>, config: &SessionConfig) -> Self {
        Self {
            deck: Deck::new(recipes),
            threshold: config.swipe_threshold,
        }
    }

    /// Applies a released drag of `displacement` pixels on a `viewport_width` wide screen.
    pub fn swipe(&mut self, displacement: f64, viewport_width: f64) -> SwipeOutcome {
        match self.threshold.decide(displacement, viewport_width) {
            SwipeDecision::Accept => self
                .deck
                .accept()
                .map(SwipeOutcome::Accepted)
                .unwrap_or(SwipeOutcome::Empty),
            SwipeDecision::Reject => self
                .deck
                .reject()
                .map(|_| SwipeOutcome::Rejected)
                .unwrap_or(SwipeOutcome::Empty),
            SwipeDecision::NoOp => SwipeOutcome::NoOp,
        }
    }

    pub fn current(&self) -> Option<&Recipe> {
        self.deck.current()
    }

    pub fn accept(&mut self) -> Result<Recipe, EmptyDeck> {
        self.deck.accept()
    }

    pub fn reject(&mut self) -> Result<(), EmptyDeck> {
        self.deck.reject()
    }

    pub fn reset(&mut self) {
        self.deck.reset()
    }

    pub fn is_exhausted(&self) -> bool {
        self.deck.is_exhausted()
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{schema::FilterCriteria, MockRecipeSource};

    fn recipe(id: &str, ingredients: &[&str]) -> Recipe {
        Recipe {
            id: id.to_string(),
            name: format!("Recipe {id}"),
            cooking_time_minutes: 20,
            energy_kcal: None,
            image_uri: None,
            ingredients: ingredients.iter().map(|i| i.to_string()).collect(),
            steps: vec![],
        }
    }

    fn config() -> SessionConfig {
        SessionConfig::new("http://localhost:3030")
    }

    #[test]
    fn swipes_drive_the_deck() {
        let mut session =
            RecommendationSession::from_recipes(vec![recipe("a", &[]), recipe("b", &[])], &config());

        assert_eq!(session.swipe(50., 400.), SwipeOutcome::NoOp);
        assert_eq!(session.current().unwrap().id, "a");

        assert_eq!(session.swipe(-150., 400.), SwipeOutcome::Rejected);
        assert_eq!(
            session.swipe(150., 400.),
            SwipeOutcome::Accepted(recipe("b", &[]))
        );
        assert_eq!(session.swipe(150., 400.), SwipeOutcome::Empty);
        assert_eq!(session.swipe(-150., 400.), SwipeOutcome::Empty);

        session.reset();
        assert_eq!(session.current().unwrap().id, "a");
    }

    #[tokio::test]
    async fn preferences_shape_the_query_and_the_deck() {
        let source = MockRecipeSource::new().with_recipes(vec![
            recipe("satay", &["peanut butter", "chicken"]),
            recipe("salad", &["lettuce"]),
        ]);
        let preferences = UserPreferences {
            diet_type: vec![String::from("omnivore")],
            food_allergies: vec![String::from("peanut")],
            ..Default::default()
        };

        let session = RecommendationSession::start(&source, &config(), Some(&preferences))
            .await
            .unwrap();

        assert_eq!(
            source.last_criteria(),
            Some(FilterCriteria {
                diet_type: Some(String::from("omnivore")),
                ..Default::default()
            })
        );
        assert_eq!(session.deck().pending_len(), 1);
        assert_eq!(session.current().unwrap().id, "salad");
    }

    #[tokio::test]
    async fn everything_filtered_out_means_no_match() {
        let source = MockRecipeSource::new().with_recipes(vec![recipe("satay", &["peanuts"])]);
        let preferences = UserPreferences {
            food_allergies: vec![String::from("peanut")],
            ..Default::default()
        };

        let err = RecommendationSession::start(&source, &config(), Some(&preferences))
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::NoRecipesMatched);
    }

    #[tokio::test]
    async fn source_failures_surface_unchanged() {
        let source = MockRecipeSource::new().with_error(FetchError::Status(503));

        let err = RecommendationSession::start(&source, &config(), None)
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::Status(503));
        assert!(err.is_retryable());
    }
}
