use std::{collections::HashMap, convert::Infallible};

use serde_json::json;
use warp::{
    http::StatusCode,
    reply::{self, Reply, Response},
};

use crate::{
    actions::{
        fetch_filtered_recipes, fetch_filtered_recipes_cached, get_preferences, save_preferences,
        search_ingredients, search_ingredients_cached,
    },
    error::{not_found, TypeError},
    form::Form,
    schema::{FilterCriteria, UserPreferences},
    ServiceState,
};

fn error_reply(error: potion::Error) -> Response {
    let status =
        StatusCode::from_u16(error.code as u16).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    reply::with_status(reply::json(&json!({ "error": error.info })), status).into_response()
}

fn bad_request(error: TypeError) -> Response {
    reply::with_status(
        reply::json(&json!({ "error": error.to_string() })),
        StatusCode::BAD_REQUEST,
    )
    .into_response()
}

fn json_or_error<T: serde::Serialize>(result: Result<T, potion::Error>) -> Response {
    match result {
        Ok(value) => reply::json(&value).into_response(),
        Err(e) => error_reply(e),
    }
}

pub async fn recipes_filter(
    query: HashMap<String, String>,
    state: ServiceState,
) -> Result<Response, Infallible> {
    let criteria = match FilterCriteria::try_from(&Form::from_query(query)) {
        Ok(criteria) => criteria,
        Err(e) => return Ok(bad_request(e)),
    };

    let result = match state.cache.clone() {
        Some(mut cache) => fetch_filtered_recipes_cached(criteria, &state.pool, &mut cache).await,
        None => fetch_filtered_recipes(&criteria, &state.pool).await,
    };

    Ok(json_or_error(result))
}

pub async fn ingredients(
    query: HashMap<String, String>,
    state: ServiceState,
) -> Result<Response, Infallible> {
    let partial = match Form::from_query(query).get_optional_str("ingredient") {
        Ok(partial) => partial.unwrap_or_default(),
        Err(e) => return Ok(bad_request(e)),
    };

    let result = match state.cache.clone() {
        Some(mut cache) => search_ingredients_cached(&partial, &state.pool, &mut cache).await,
        None => search_ingredients(&partial, &state.pool).await,
    };

    Ok(json_or_error(result))
}

/// Nothing stored is a 404; an empty document is never made up.
fn stored_preferences(
    preferences: Option<UserPreferences>,
) -> Result<UserPreferences, potion::Error> {
    preferences.ok_or_else(|| not_found("No preferences stored"))
}

pub async fn read_preferences(user_id: String, state: ServiceState) -> Result<Response, Infallible> {
    let result = get_preferences(&user_id, &state.pool)
        .await
        .and_then(stored_preferences);

    Ok(json_or_error(result))
}

pub async fn write_preferences(
    user_id: String,
    preferences: UserPreferences,
    state: ServiceState,
) -> Result<Response, Infallible> {
    Ok(match save_preferences(&user_id, &preferences, &state.pool).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_reply(e),
    })
}
