use std::{collections::HashMap, str::FromStr};

use serde_json::Value;

use super::{error::TypeError, schema::FilterCriteria};
use crate::{DIET_TYPES, MEAL_TYPES};

pub type FormData = HashMap<String, Value>;

pub struct Form {
    inner: HashMap<String, Value>,
}

impl Form {
    pub fn from_data(data: FormData) -> Self {
        Self { inner: data }
    }

    pub fn from_query(query: HashMap<String, String>) -> Self {
        Self {
            inner: query
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect(),
        }
    }

    /// Trimmed string value. Missing keys and blank values are both `None`.
    pub fn get_optional_str(&self, key: &str) -> Result<Option<String>, TypeError> {
        match self.inner.get(key) {
            Some(Value::String(v)) if v.trim().is_empty() => Ok(None),
            Some(Value::String(v)) => Ok(Some(v.trim().to_string())),
            Some(Value::Null) | None => Ok(None),
            Some(_) => Err(TypeError::new(&format!("Invalid {key}"))),
        }
    }

    pub fn get_optional_number<T>(&self, key: &str) -> Result<Option<T>, TypeError>
    where
        T: FromStr,
    {
        match self.get_optional_str(key)? {
            Some(v) => v
                .parse()
                .map(Some)
                .map_err(|_e| TypeError::new(&format!("Invalid {key}"))),
            None => Ok(None),
        }
    }

    /// One of the values in `choices`, matched case-insensitively and returned as listed.
    pub fn get_optional_choice(
        &self,
        key: &str,
        choices: &[(&'static str, &'static str)],
    ) -> Result<Option<String>, TypeError> {
        match self.get_optional_str(key)? {
            Some(v) => choices
                .iter()
                .find(|(value, _label)| value.eq_ignore_ascii_case(&v))
                .map(|(value, _label)| Some(value.to_string()))
                .ok_or_else(|| TypeError::new(&format!("Invalid {key}: {v}"))),
            None => Ok(None),
        }
    }

    /// Comma separated list, entries trimmed, empty entries dropped.
    pub fn get_list(&self, key: &str) -> Result<Vec<String>, TypeError> {
        Ok(self
            .get_optional_str(key)?
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .map(|s| s.to_owned())
                    .collect()
            })
            .unwrap_or_default())
    }
}

impl TryFrom<&Form> for FilterCriteria {
    type Error = TypeError;

    fn try_from(form: &Form) -> Result<Self, Self::Error> {
        Ok(Self {
            cooking_time: form.get_optional_number::<u32>("cookingTime")?,
            meal_type: form.get_optional_choice("mealType", MEAL_TYPES)?,
            diet_type: form.get_optional_choice("dietType", DIET_TYPES)?,
            ingredients: form.get_list("ingredients")?,
        })
    }
}
