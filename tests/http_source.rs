use std::{collections::HashMap, net::SocketAddr};

use recipe_deck_sdk::{
    error::{FetchError, IngestError},
    schema::FilterCriteria,
    HttpRecipeSource, RecipeSource, RecommendationSession, SessionConfig, SwipeOutcome,
};
use serde_json::json;
use warp::{http::StatusCode, reply::Reply, Filter};

/// Filter service stand-in. `mealType` picks the kind of response.
fn spawn_filter_service() -> SocketAddr {
    let recipes_filter = warp::path("recipes_filter")
        .and(warp::path::end())
        .and(warp::query::<HashMap<String, String>>())
        .map(|query: HashMap<String, String>| {
            let diet = query.get("dietType").cloned().unwrap_or_default();

            match query.get("mealType").map(|m| m.as_str()) {
                Some("empty") => warp::reply::json(&json!([])).into_response(),
                Some("broken") => warp::reply::json(&json!([{ "name": "No id" }])).into_response(),
                Some("garbage") => "<html>".into_response(),
                Some("down") => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
                _ => warp::reply::json(&json!([
                    {
                        "id": "A",
                        "name": format!("{diet} bowl"),
                        "cookingTimeMinutes": 10,
                        "ingredients": ["rice", "beans"],
                        "steps": [{ "description": "Cook rice" }, { "description": "Add beans" }]
                    },
                    { "id": "B", "name": "Toast", "cookingTimeMinutes": 5 },
                    { "id": 3, "name": "Soup", "cookingTimeMinutes": 30, "energyKcal": 250 }
                ]))
                .into_response(),
            }
        });

    let ingredients = warp::path("ingredients")
        .and(warp::path::end())
        .and(warp::query::<HashMap<String, String>>())
        .map(|query: HashMap<String, String>| {
            let partial = query.get("ingredient").cloned().unwrap_or_default();
            warp::reply::json(&vec![format!("{partial}ato"), format!("{partial}atillo")])
        });

    let (addr, server) =
        warp::serve(recipes_filter.or(ingredients)).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);

    addr
}

fn source(addr: SocketAddr) -> HttpRecipeSource {
    HttpRecipeSource::new(&format!("http://{addr}/"))
}

fn criteria(meal_type: &str) -> FilterCriteria {
    FilterCriteria {
        meal_type: Some(meal_type.to_string()),
        diet_type: Some(String::from("vegan")),
        ..Default::default()
    }
}

#[tokio::test]
async fn fetches_and_ingests_recipes() {
    let source = source(spawn_filter_service());

    let recipes = source.filter_recipes(&criteria("dinner")).await.unwrap();

    assert_eq!(recipes.len(), 3);
    assert_eq!(recipes[0].name, "vegan bowl");
    assert_eq!(recipes[0].steps[1].description, "Add beans");
    assert!(recipes[1].steps.is_empty());
    assert_eq!(recipes[2].id, "3");
    assert_eq!(recipes[2].energy_kcal, Some(250.));
}

#[tokio::test]
async fn nothing_matched_is_not_a_failure() {
    let source = source(spawn_filter_service());

    let err = source.filter_recipes(&criteria("empty")).await.unwrap_err();
    assert_eq!(err, FetchError::NoRecipesMatched);
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn malformed_responses_are_told_apart() {
    let source = source(spawn_filter_service());

    let err = source.filter_recipes(&criteria("broken")).await.unwrap_err();
    assert_eq!(
        err,
        FetchError::Malformed(IngestError::MissingField { index: 0, field: "id" })
    );

    let err = source.filter_recipes(&criteria("garbage")).await.unwrap_err();
    assert!(matches!(err, FetchError::Malformed(IngestError::InvalidJson(_))));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn server_errors_carry_the_status() {
    let source = source(spawn_filter_service());

    let err = source.filter_recipes(&criteria("down")).await.unwrap_err();
    assert_eq!(err, FetchError::Status(500));
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let source = HttpRecipeSource::new("http://127.0.0.1:1");

    let err = source.filter_recipes(&FilterCriteria::default()).await.unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));
}

#[tokio::test]
async fn suggests_ingredients() {
    let source = source(spawn_filter_service());

    let names = source.suggest_ingredients("tom").await.unwrap();
    assert_eq!(names, vec!["tomato", "tomatillo"]);
}

#[tokio::test]
async fn session_fails_when_the_service_is_unreachable() {
    let config = SessionConfig::new("http://127.0.0.1:1");

    let err = RecommendationSession::connect(&config, None).await.unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));
}

#[tokio::test]
async fn recommendation_walkthrough() {
    let addr = spawn_filter_service();
    let config = SessionConfig::new(&format!("http://{addr}/")).with_criteria(criteria("dinner"));

    let mut session = RecommendationSession::connect(&config, None).await.unwrap();
    let ids = |session: &RecommendationSession| -> (Vec<String>, Vec<String>) {
        (
            session.deck().pending().map(|r| r.id.clone()).collect(),
            session.deck().rejected().iter().map(|r| r.id.clone()).collect(),
        )
    };

    assert_eq!(session.swipe(-120., 400.), SwipeOutcome::Rejected);
    assert_eq!(ids(&session), (vec!["B".into(), "3".into()], vec!["A".into()]));

    match session.swipe(120., 400.) {
        SwipeOutcome::Accepted(recipe) => assert_eq!(recipe.id, "B"),
        outcome => panic!("expected an accept, got {outcome:?}"),
    }
    assert_eq!(ids(&session), (vec!["3".into()], vec!["A".into()]));

    session.reject().unwrap();
    assert_eq!(ids(&session), (vec![], vec!["A".into(), "3".into()]));
    assert!(session.current().is_none());
    assert!(!session.is_exhausted());

    session.reset();
    assert_eq!(ids(&session), (vec!["A".into(), "3".into()], vec![]));
}
