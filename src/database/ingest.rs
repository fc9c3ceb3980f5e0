//! Conversion of filter service responses into [`Recipe`] values.
//!
//! Validation happens here and only here; the deck trusts whatever it is handed.

use std::collections::HashSet;

use serde_json::{Map, Value};

use super::{
    error::IngestError,
    schema::{Recipe, RecipeStep},
};

/// Ids must be unique across the whole response, after `1` and `"1"` are both read as `"1"`.
pub fn ingest_recipes(value: Value) -> Result<Vec<Recipe>, IngestError> {
    let records = match value {
        Value::Array(records) => records,
        _ => return Err(IngestError::NotAnArray),
    };

    let mut seen = HashSet::with_capacity(records.len());
    let mut recipes = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        let recipe = ingest_recipe(index, record)?;
        if !seen.insert(recipe.id.clone()) {
            return Err(invalid(index, "id", "duplicate id"));
        }
        recipes.push(recipe);
    }

    Ok(recipes)
}

fn ingest_recipe(index: usize, value: &Value) -> Result<Recipe, IngestError> {
    let record = value.as_object().ok_or(IngestError::InvalidField {
        index,
        field: "recipe",
        reason: String::from("expected an object"),
    })?;

    Ok(Recipe {
        id: read_id(index, record)?,
        name: read_name(index, record)?,
        cooking_time_minutes: read_cooking_time(index, record)?,
        energy_kcal: read_energy(index, record)?,
        image_uri: read_optional_str(index, record, "imageUri")?,
        ingredients: read_ingredients(index, record)?,
        steps: read_steps(index, record)?,
    })
}

fn invalid(index: usize, field: &'static str, reason: &str) -> IngestError {
    IngestError::InvalidField {
        index,
        field,
        reason: reason.to_string(),
    }
}

fn read_id(index: usize, record: &Map<String, Value>) -> Result<String, IngestError> {
    match record.get("id") {
        Some(Value::String(id)) if !id.trim().is_empty() => Ok(id.trim().to_string()),
        Some(Value::Number(id)) if id.is_i64() || id.is_u64() => Ok(id.to_string()),
        Some(Value::Null) | None => Err(IngestError::MissingField { index, field: "id" }),
        Some(_) => Err(invalid(index, "id", "expected a string or an integer")),
    }
}

fn read_name(index: usize, record: &Map<String, Value>) -> Result<String, IngestError> {
    match record.get("name") {
        Some(Value::String(name)) if !name.trim().is_empty() => Ok(name.to_owned()),
        Some(Value::Null) | None => Err(IngestError::MissingField {
            index,
            field: "name",
        }),
        Some(_) => Err(invalid(index, "name", "expected a non-empty string")),
    }
}

fn read_cooking_time(index: usize, record: &Map<String, Value>) -> Result<u32, IngestError> {
    let value = record
        .get("cookingTimeMinutes")
        .or_else(|| record.get("cookingTime"));

    let minutes = match value {
        Some(Value::Null) | None => return Ok(0),
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        Some(_) => None,
    };

    minutes
        .and_then(|m| u32::try_from(m).ok())
        .ok_or_else(|| invalid(index, "cookingTimeMinutes", "expected a non-negative integer"))
}

fn read_energy(index: usize, record: &Map<String, Value>) -> Result<Option<f64>, IngestError> {
    match record.get("energyKcal") {
        Some(Value::Null) | None => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(_) => Err(invalid(index, "energyKcal", "expected a number")),
    }
}

fn read_optional_str(
    index: usize,
    record: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, IngestError> {
    match record.get(field) {
        Some(Value::Null) | None => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.to_owned())),
        Some(_) => Err(invalid(index, field, "expected a string")),
    }
}

fn read_ingredients(index: usize, record: &Map<String, Value>) -> Result<Vec<String>, IngestError> {
    match record.get("ingredients") {
        Some(Value::Null) | None => Ok(vec![]),
        Some(Value::String(lines)) => Ok(lines
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .map(|l| l.to_owned())
            .collect()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(|s| s.to_owned())
                    .ok_or_else(|| invalid(index, "ingredients", "expected strings"))
            })
            .collect(),
        Some(_) => Err(invalid(index, "ingredients", "expected a list or text")),
    }
}

fn read_steps(index: usize, record: &Map<String, Value>) -> Result<Vec<RecipeStep>, IngestError> {
    match record.get("steps") {
        Some(Value::Null) | None => Ok(vec![]),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item.get("description") {
                Some(Value::String(description)) => Ok(RecipeStep::new(description)),
                _ => Err(invalid(index, "steps", "every step needs a description")),
            })
            .collect(),
        Some(_) => Err(invalid(index, "steps", "expected a list")),
    }
}
