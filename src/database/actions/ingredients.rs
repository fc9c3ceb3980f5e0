use std::cmp::Ordering;

use redis::aio::MultiplexedConnection;
use sqlx::{Pool, Postgres};

use crate::{error::QueryError, CacheKeyType, RedisValue, INGREDIENT_SUGGESTION_LIMIT};

use super::like_pattern;

/// Autocomplete for partially typed ingredient names.
pub async fn search_ingredients(
    partial: &str,
    pool: &Pool<Postgres>,
) -> Result<Vec<String>, potion::Error> {
    let partial = partial.trim();
    if partial.is_empty() {
        return Ok(vec![]);
    }

    // Over-fetch a little so re-ranking has something to choose from
    let candidates: Vec<(String,)> = sqlx::query_as(
        "SELECT name FROM ingredients WHERE name ILIKE $1 ORDER BY LENGTH(name), name LIMIT $2",
    )
    .bind(like_pattern(partial))
    .bind((INGREDIENT_SUGGESTION_LIMIT * 4) as i64)
    .fetch_all(pool)
    .await
    .map_err(|e| -> potion::Error { QueryError::from(e).into() })?;

    Ok(rank_suggestions(
        partial,
        candidates.into_iter().map(|c| c.0).collect(),
    ))
}

pub async fn search_ingredients_cached(
    partial: &str,
    pool: &Pool<Postgres>,
    cache: &mut MultiplexedConnection,
) -> Result<Vec<String>, potion::Error> {
    let partial = partial.trim().to_lowercase();
    if partial.is_empty() {
        return Ok(vec![]);
    }

    let key = CacheKeyType::IngredientSearch.new(partial.clone());
    let pool = pool.clone();

    let value = RedisValue::get_or(key, cache, move || async move {
        search_ingredients(&partial, &pool).await
    })
    .await?;

    Ok(value.value)
}

/// Prefix matches first, then by Jaro-Winkler similarity to what was typed.
pub fn rank_suggestions(partial: &str, candidates: Vec<String>) -> Vec<String> {
    let partial = partial.trim().to_lowercase();

    let mut scored: Vec<(bool, f64, String)> = candidates
        .into_iter()
        .map(|name| {
            let lower = name.to_lowercase();
            (
                lower.starts_with(&partial),
                strsim::jaro_winkler(&partial, &lower),
                name,
            )
        })
        .collect();

    scored.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then(b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal))
            .then(a.2.cmp(&b.2))
    });
    scored.dedup_by(|a, b| a.2.eq_ignore_ascii_case(&b.2));

    scored
        .into_iter()
        .take(INGREDIENT_SUGGESTION_LIMIT)
        .map(|(_, _, name)| name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn prefix_matches_come_first() {
        let ranked = rank_suggestions(
            "tom",
            names(&["cherry tomato", "tomato", "tomatillo", "sun-dried tomato"]),
        );

        assert_eq!(ranked[0], "tomato");
        assert_eq!(ranked[1], "tomatillo");
        assert_eq!(ranked.len(), 4);
    }

    #[test]
    fn suggestions_are_bounded() {
        let ranked = rank_suggestions(
            "a",
            names(&["apple", "apricot", "avocado", "anise", "almond", "arugula", "asparagus"]),
        );
        assert_eq!(ranked.len(), INGREDIENT_SUGGESTION_LIMIT);
    }

    #[test]
    fn duplicate_spellings_collapse() {
        let ranked = rank_suggestions("rice", names(&["Rice", "rice", "rice vinegar"]));
        assert_eq!(ranked.len(), 2);
    }
}
