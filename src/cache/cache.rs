use std::future::Future;

use redis::{aio::MultiplexedConnection, AsyncCommands, FromRedisValue, ToRedisArgs};
use redis_macros::{FromRedisValue, ToRedisArgs};
use serde::{Deserialize, Serialize};

use crate::error::CacheError;

const RECIPE_CACHE_BIND: &str = "recipe-cache-key";
const INGREDIENT_CACHE_BIND: &str = "ingredient-cache-key";

// Caching - keys

#[derive(Serialize, Clone, Debug)]
pub struct CacheKey<T: ToString + Serialize> {
    _value: T,
    _type: CacheKeyType,
}

impl<T: ToString + Serialize> CacheKey<T> {
    pub fn from(r#type: CacheKeyType, key: T) -> Self {
        Self {
            _value: key,
            _type: r#type,
        }
    }

    pub fn to_string(&self) -> String {
        self.into()
    }
}

impl<T: ToString + Serialize> Into<String> for &CacheKey<T> {
    fn into(self) -> String {
        match self._type {
            CacheKeyType::RecipeFilter => format!("recipe-filter-{}", self._value.to_string()),
            CacheKeyType::IngredientSearch => {
                format!("ingredient-search-{}", self._value.to_string())
            }
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum CacheKeyType {
    RecipeFilter,
    IngredientSearch,
}

impl CacheKeyType {
    pub fn new<T: ToString + Serialize>(self, key: T) -> CacheKey<T> {
        CacheKey::from(self, key)
    }
}

impl<T: ToString + Serialize> Into<CacheLifetime> for &CacheKey<T> {
    fn into(self) -> CacheLifetime {
        match self._type {
            CacheKeyType::RecipeFilter => CacheLifetime::BindRecipeCache,
            CacheKeyType::IngredientSearch => CacheLifetime::BindIngredientCache,
        }
    }
}

// Cache - wrappers

/// A cached value stays valid for as long as the generation stored under its bind key is unchanged.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum CacheLifetime {
    BindRecipeCache,
    BindIngredientCache,
}

impl CacheLifetime {
    fn bind_key(&self) -> &'static str {
        match self {
            CacheLifetime::BindRecipeCache => RECIPE_CACHE_BIND,
            CacheLifetime::BindIngredientCache => INGREDIENT_CACHE_BIND,
        }
    }

    pub async fn get_cache_bind(
        &self,
        cache: &mut MultiplexedConnection,
    ) -> Result<Option<String>, potion::Error> {
        get_cache_value::<&str, String>(self.bind_key(), cache).await
    }

    pub async fn validate_cache_bind(
        &self,
        bind: &Option<String>,
        cache: &mut MultiplexedConnection,
    ) -> Result<bool, potion::Error> {
        Ok(bind_is_current(bind, &self.get_cache_bind(cache).await?))
    }

    /// Drops every value bound to this lifetime by moving its bind to a fresh generation.
    pub async fn invalidate(&self, cache: &mut MultiplexedConnection) -> Result<(), potion::Error> {
        let generation = fresh_generation();
        log::trace!("> Invalidating {} -> {generation}", self.bind_key());

        set_cache_value(self.bind_key(), generation, cache).await
    }

    pub fn all() -> [CacheLifetime; 2] {
        [CacheLifetime::BindRecipeCache, CacheLifetime::BindIngredientCache]
    }
}

fn fresh_generation() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn bind_is_current(bind: &Option<String>, current: &Option<String>) -> bool {
    bind == current
}

#[derive(Serialize, serde::Deserialize, FromRedisValue, ToRedisArgs, Clone)]
pub struct RedisValue<T: serde::Serialize + Send + Sync + Clone> {
    pub value: T,
    _lifetime: CacheLifetime,
    _bind: Option<String>,
}

impl<T: serde::Serialize + Send + Sync + Clone + for<'a> Deserialize<'a>> RedisValue<T> {
    async fn new(
        value: T,
        lifetime: CacheLifetime,
        cache: &mut MultiplexedConnection,
    ) -> Result<Self, potion::Error> {
        let bind = lifetime.get_cache_bind(cache).await?;

        Ok(Self {
            value,
            _lifetime: lifetime,
            _bind: bind,
        })
    }

    async fn validate(&self, cache: &mut MultiplexedConnection) -> Result<bool, potion::Error> {
        self._lifetime.validate_cache_bind(&self._bind, cache).await
    }

    /// Returns the cached value for `key`, or runs `callback` and caches its result.
    /// Cache write failures are logged and otherwise ignored.
    pub async fn get_or<'a, F, Fut, K>(
        key: CacheKey<K>,
        cache: &mut MultiplexedConnection,
        callback: F,
    ) -> Result<RedisValue<T>, potion::Error>
    where
        K: ToString + Serialize + Clone + Send + Sync,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, potion::Error>> + Send + 'a,
    {
        let name = key.to_string();

        let value = get_cache_value::<String, RedisValue<T>>(name.clone(), cache)
            .await
            .unwrap_or_else(|_| {
                let mut c = cache.clone();
                let k = name.clone();
                tokio::spawn(async move {
                    log::error!("> Failed to deserialize cached value. Deleting {}", &k);
                    if let Err(e) = delete_cache_value(k, &mut c).await {
                        log::error!("> Failed to delete cached value! {e:?}");
                    }
                });
                None
            });

        // * Cannot use .map(|| {...}) due to async closures
        let value = match value {
            Some(value) => {
                log::trace!("> Found {name}");
                match value.validate(cache).await? {
                    true => Some(value),
                    false => {
                        log::trace!("> Invalidated {name}");
                        None
                    }
                }
            }
            None => None,
        };

        match value {
            Some(value) => Ok(value),
            None => {
                log::trace!("> Fetching {name}");
                let value = callback().await?;
                let lifetime: CacheLifetime = (&key).into();
                let value = RedisValue::new(value, lifetime, cache).await?;

                if let Err(e) = set_cache_value::<String, RedisValue<T>>(name, value.clone(), cache).await {
                    log::error!("{e:?}");
                }

                Ok(value)
            }
        }
    }
}

// Cache - raw handlers

pub async fn set_cache_value<K: ToRedisArgs + Send + Sync, V: ToRedisArgs + Send + Sync>(
    key: K,
    value: V,
    cache: &mut MultiplexedConnection,
) -> Result<(), potion::Error> {
    let _: () = cache
        .set(key, value)
        .await
        .map_err(|e| -> potion::Error { CacheError::from(e).into() })?;

    Ok(())
}

pub async fn delete_cache_value<K: ToRedisArgs + Send + Sync>(
    key: K,
    cache: &mut MultiplexedConnection,
) -> Result<(), potion::Error> {
    let _: () = cache
        .del(key)
        .await
        .map_err(|e| -> potion::Error { CacheError::from(e).into() })?;

    Ok(())
}

pub async fn get_cache_value<K: ToRedisArgs + Send + Sync, V: FromRedisValue>(
    key: K,
    cache: &mut MultiplexedConnection,
) -> Result<Option<V>, potion::Error> {
    let value: Option<V> = cache
        .get(key)
        .await
        .map_err(|e| -> potion::Error { CacheError::from(e).into() })?;

    Ok(value)
}
