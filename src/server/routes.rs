use std::{collections::HashMap, convert::Infallible};

use redis::aio::MultiplexedConnection;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};
use warp::{Filter, Rejection, Reply};

use crate::{
    error::{CacheError, QueryError},
    CacheLifetime, ServiceConfig,
};

use super::handlers;

#[derive(Clone)]
pub struct ServiceState {
    pub pool: Pool<Postgres>,
    pub cache: Option<MultiplexedConnection>,
}

impl ServiceState {
    pub fn new(pool: Pool<Postgres>, cache: Option<MultiplexedConnection>) -> Self {
        Self { pool, cache }
    }

    pub async fn connect(config: &ServiceConfig) -> Result<Self, potion::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&config.database_url)
            .await
            .map_err(|e| -> potion::Error { QueryError::from(e).into() })?;

        let cache = match &config.redis_url {
            Some(url) => {
                let client = redis::Client::open(url.as_str())
                    .map_err(|e| -> potion::Error { CacheError::from(e).into() })?;
                let mut connection = client
                    .get_multiplexed_async_connection()
                    .await
                    .map_err(|e| -> potion::Error { CacheError::from(e).into() })?;

                // Recipes may have changed while the service was down.
                for lifetime in CacheLifetime::all() {
                    lifetime.invalidate(&mut connection).await?;
                }
                Some(connection)
            }
            None => None,
        };

        Ok(Self::new(pool, cache))
    }
}

fn with_state(state: ServiceState) -> impl Filter<Extract = (ServiceState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

/// `/recipes_filter`, `/ingredients` and `/preferences/<user_id>`.
pub fn routes(state: ServiceState) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let recipes_filter = warp::path("recipes_filter")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<HashMap<String, String>>())
        .and(with_state(state.clone()))
        .and_then(handlers::recipes_filter);

    let ingredients = warp::path("ingredients")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<HashMap<String, String>>())
        .and(with_state(state.clone()))
        .and_then(handlers::ingredients);

    let read_preferences = warp::path!("preferences" / String)
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handlers::read_preferences);

    let write_preferences = warp::path!("preferences" / String)
        .and(warp::put())
        .and(warp::body::json())
        .and(with_state(state))
        .and_then(handlers::write_preferences);

    recipes_filter
        .or(ingredients)
        .or(read_preferences)
        .or(write_preferences)
        .with(warp::log("recipe_deck_sdk"))
}

pub async fn serve(config: &ServiceConfig) -> Result<(), potion::Error> {
    let state = ServiceState::connect(config).await?;
    log::info!("Serving recipes on {}", config.bind_addr);

    warp::serve(routes(state)).run(config.bind_addr).await;

    Ok(())
}
