use sqlx::{Pool, Postgres};

use crate::{
    error::QueryError,
    schema::{PreferencesRow, UserPreferences},
};

pub async fn get_preferences(
    user_id: &str,
    pool: &Pool<Postgres>,
) -> Result<Option<UserPreferences>, potion::Error> {
    let row: Option<PreferencesRow> =
        sqlx::query_as("SELECT * FROM user_preferences WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await
            .map_err(|e| -> potion::Error { QueryError::from(e).into() })?;

    Ok(row.map(UserPreferences::from))
}

pub async fn save_preferences(
    user_id: &str,
    preferences: &UserPreferences,
    pool: &Pool<Postgres>,
) -> Result<(), potion::Error> {
    sqlx::query(
        "
        INSERT INTO user_preferences (user_id, diet_type, food_allergies, dietary_restrictions, updated_at)
        VALUES ($1, $2, $3, $4, NOW())
        ON CONFLICT (user_id) DO UPDATE SET
            diet_type = EXCLUDED.diet_type,
            food_allergies = EXCLUDED.food_allergies,
            dietary_restrictions = EXCLUDED.dietary_restrictions,
            updated_at = NOW();
    ",
    )
    .bind(user_id)
    .bind(&preferences.diet_type)
    .bind(&preferences.food_allergies)
    .bind(&preferences.dietary_restrictions)
    .execute(pool)
    .await
    .map_err(|e| -> potion::Error { QueryError::from(e).into() })?;

    log::debug!("> Saved preferences for {user_id}");

    Ok(())
}
