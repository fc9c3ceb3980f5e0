use std::{env, fmt::Display, net::SocketAddr, str::FromStr};

use crate::{
    error::TypeError,
    schema::FilterCriteria,
    SwipeThreshold, DEFAULT_BIND_ADDR,
};

/// Settings of the filter service side, read from the environment.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub database_url: String,
    pub redis_url: Option<String>,
    pub bind_addr: SocketAddr,
}

impl ServiceConfig {
    pub fn load() -> Result<Self, TypeError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, TypeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("RECIPE_DATABASE_URL")
            .ok_or_else(|| TypeError::new("RECIPE_DATABASE_URL is not set"))?;

        let redis_url = lookup("RECIPE_REDIS_URL").filter(|url| !url.is_empty());
        if redis_url.is_none() {
            log::warn!("RECIPE_REDIS_URL not set, filter results won't be cached");
        }

        Ok(Self {
            database_url,
            redis_url,
            bind_addr: try_load(&lookup, "RECIPE_BIND_ADDR", DEFAULT_BIND_ADDR)?,
        })
    }
}

fn try_load<T, F>(lookup: &F, key: &str, default: &str) -> Result<T, TypeError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .unwrap_or_else(|| {
            log::warn!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| TypeError::new(&format!("Invalid {key} value: {e}")))
}

/// Everything the component that builds a deck needs to know, passed in explicitly.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub base_url: String,
    pub criteria: FilterCriteria,
    pub swipe_threshold: SwipeThreshold,
}

impl SessionConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            criteria: FilterCriteria::default(),
            swipe_threshold: SwipeThreshold::default(),
        }
    }

    pub fn with_criteria(mut self, criteria: FilterCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    pub fn with_swipe_fraction(mut self, fraction: f64) -> Self {
        self.swipe_threshold = SwipeThreshold::new(fraction);
        self
    }
}
