use std::collections::HashMap;

use redis::aio::MultiplexedConnection;
use sqlx::{Pool, Postgres, QueryBuilder};

use crate::{
    error::QueryError,
    schema::{
        FilterCriteria, Recipe, RecipeIngredientRow, RecipeRow, RecipeStep, RecipeStepRow, Uuid,
    },
    CacheKeyType, RedisValue, RECIPE_FILTER_LIMIT,
};

/// Escapes `ILIKE` wildcards so user input only ever matches literally.
pub fn like_pattern(value: &str) -> String {
    let escaped = value
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");

    format!("%{escaped}%")
}

pub fn build_filter_query(criteria: &FilterCriteria) -> QueryBuilder<'static, Postgres> {
    let mut query_builder: QueryBuilder<Postgres> = QueryBuilder::new(
        "SELECT r.id, r.name, r.cooking_time, r.meal_type, r.diet_type, r.energy_kcal, r.image_uri FROM recipes r WHERE TRUE",
    );

    if let Some(cooking_time) = criteria.cooking_time {
        query_builder
            .push(" AND r.cooking_time <= ")
            .push_bind(cooking_time.min(i32::MAX as u32) as i32);
    }

    if let Some(meal_type) = &criteria.meal_type {
        query_builder
            .push(" AND LOWER(r.meal_type) = LOWER(")
            .push_bind(meal_type.to_owned())
            .push(")");
    }

    if let Some(diet_type) = &criteria.diet_type {
        query_builder
            .push(" AND LOWER(r.diet_type) = LOWER(")
            .push_bind(diet_type.to_owned())
            .push(")");
    }

    // Every requested ingredient has to be present
    for ingredient in criteria.ingredients.iter() {
        query_builder
            .push(" AND EXISTS (SELECT 1 FROM recipe_ingredients ri WHERE ri.recipe_id = r.id AND ri.name ILIKE ")
            .push_bind(like_pattern(ingredient))
            .push(")");
    }

    query_builder
        .push(" ORDER BY r.cooking_time, r.name LIMIT ")
        .push_bind(RECIPE_FILTER_LIMIT);

    query_builder
}

pub async fn fetch_filtered_recipes(
    criteria: &FilterCriteria,
    pool: &Pool<Postgres>,
) -> Result<Vec<Recipe>, potion::Error> {
    let mut query_builder = build_filter_query(criteria);
    log::debug!("> Filtering recipes: {}", query_builder.sql());

    let rows: Vec<RecipeRow> = query_builder
        .build_query_as()
        .fetch_all(pool)
        .await
        .map_err(|e| -> potion::Error { QueryError::from(e).into() })?;

    if rows.is_empty() {
        return Ok(vec![]);
    }

    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
    let mut ingredients = list_recipe_ingredients(&ids, pool).await?;
    let mut steps = list_recipe_steps(&ids, pool).await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let ingredients = ingredients.remove(&row.id).unwrap_or_default();
            let steps = steps.remove(&row.id).unwrap_or_default();
            row.into_recipe(ingredients, steps)
        })
        .collect())
}

/// Same as [`fetch_filtered_recipes`], served from redis while the recipe cache bind holds.
pub async fn fetch_filtered_recipes_cached(
    criteria: FilterCriteria,
    pool: &Pool<Postgres>,
    cache: &mut MultiplexedConnection,
) -> Result<Vec<Recipe>, potion::Error> {
    let key = CacheKeyType::RecipeFilter.new(criteria.cache_key());
    let pool = pool.clone();

    let value = RedisValue::get_or(key, cache, move || async move {
        fetch_filtered_recipes(&criteria, &pool).await
    })
    .await?;

    Ok(value.value)
}

pub async fn list_recipe_ingredients(
    ids: &[Uuid],
    pool: &Pool<Postgres>,
) -> Result<HashMap<Uuid, Vec<String>>, potion::Error> {
    let rows: Vec<RecipeIngredientRow> = sqlx::query_as(
        "
        SELECT recipe_id, position, name
        FROM recipe_ingredients
        WHERE recipe_id = ANY($1)
        ORDER BY recipe_id, position
    ",
    )
    .bind(ids)
    .fetch_all(pool)
    .await
    .map_err(|e| -> potion::Error { QueryError::from(e).into() })?;

    let mut hashmap: HashMap<Uuid, Vec<String>> = HashMap::new();
    rows.into_iter().for_each(|row| {
        hashmap.entry(row.recipe_id).or_default().push(row.name);
    });

    Ok(hashmap)
}

pub async fn list_recipe_steps(
    ids: &[Uuid],
    pool: &Pool<Postgres>,
) -> Result<HashMap<Uuid, Vec<RecipeStep>>, potion::Error> {
    let rows: Vec<RecipeStepRow> = sqlx::query_as(
        "
        SELECT recipe_id, position, description
        FROM recipe_steps
        WHERE recipe_id = ANY($1)
        ORDER BY recipe_id, position
    ",
    )
    .bind(ids)
    .fetch_all(pool)
    .await
    .map_err(|e| -> potion::Error { QueryError::from(e).into() })?;

    Ok(group_steps(rows))
}

/// Rows arrive sorted by position, so pushing in order keeps the procedure intact.
fn group_steps(rows: Vec<RecipeStepRow>) -> HashMap<Uuid, Vec<RecipeStep>> {
    let mut hashmap: HashMap<Uuid, Vec<RecipeStep>> = HashMap::new();
    rows.into_iter().for_each(|row| {
        hashmap
            .entry(row.recipe_id)
            .or_default()
            .push(RecipeStep {
                description: row.description,
            });
    });

    hashmap
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconstrained_query_only_orders_and_limits() {
        let query_builder = build_filter_query(&FilterCriteria::default());
        assert_eq!(
            query_builder.sql(),
            "SELECT r.id, r.name, r.cooking_time, r.meal_type, r.diet_type, r.energy_kcal, r.image_uri FROM recipes r WHERE TRUE ORDER BY r.cooking_time, r.name LIMIT $1"
        );
    }

    #[test]
    fn every_criterion_adds_a_bound_predicate() {
        let criteria = FilterCriteria {
            cooking_time: Some(20),
            meal_type: Some(String::from("dinner")),
            diet_type: Some(String::from("vegan")),
            ingredients: vec![String::from("tofu"), String::from("rice")],
        };

        let query_builder = build_filter_query(&criteria);
        let sql = query_builder.sql();

        assert!(sql.contains("r.cooking_time <= $1"));
        assert!(sql.contains("LOWER(r.meal_type) = LOWER($2)"));
        assert!(sql.contains("LOWER(r.diet_type) = LOWER($3)"));
        assert!(sql.contains("ri.name ILIKE $4"));
        assert!(sql.contains("ri.name ILIKE $5"));
        assert!(sql.ends_with("LIMIT $6"));
    }

    #[test]
    fn like_patterns_escape_wildcards() {
        assert_eq!(like_pattern(" tofu "), "%tofu%");
        assert_eq!(like_pattern("100%_rye"), "%100\\%\\_rye%");
    }

    #[test]
    fn grouped_steps_keep_their_order() {
        let rows = vec![
            RecipeStepRow {
                recipe_id: 1,
                position: 0,
                description: String::from("Chop"),
            },
            RecipeStepRow {
                recipe_id: 2,
                position: 0,
                description: String::from("Boil"),
            },
            RecipeStepRow {
                recipe_id: 1,
                position: 1,
                description: String::from("Fry"),
            },
        ];

        let grouped = group_steps(rows);
        assert_eq!(
            grouped[&1],
            vec![RecipeStep::new("Chop"), RecipeStep::new("Fry")]
        );
        assert_eq!(grouped[&2], vec![RecipeStep::new("Boil")]);
    }
}
