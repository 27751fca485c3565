use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::{ValidationErrors, parse_date, parse_number};

/// One day of tracked food intake.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyNutrition {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fats: u32,
    pub created_on: DateTime<Utc>,
}

impl DailyNutrition {
    #[must_use]
    pub fn path(&self) -> String {
        format!("/nutrition/{}", self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionInput {
    pub date: NaiveDate,
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fats: u32,
}

impl NutritionInput {
    pub fn from_fields(
        date: &str,
        calories: &str,
        protein: &str,
        carbs: &str,
        fats: &str,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let date = parse_date("date", date, &mut errors);
        let calories = parse_number("calories", calories, &mut errors);
        let protein = parse_number("protein", protein, &mut errors);
        let carbs = parse_number("carbs", carbs, &mut errors);
        let fats = parse_number("fats", fats, &mut errors);
        match (date, calories, protein, carbs, fats) {
            (Some(date), Some(calories), Some(protein), Some(carbs), Some(fats)) => {
                errors.finish(Self { date, calories, protein, carbs, fats })
            },
            _ => Err(errors),
        }
    }
}

/// A weigh-in. At most one per user per day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BodyWeight {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    #[serde(rename = "bodyweight")]
    pub weight: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyWeightInput {
    pub date: NaiveDate,
    #[serde(rename = "bodyweight")]
    pub weight: u32,
}

impl BodyWeightInput {
    pub fn from_fields(date: &str, weight: &str) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let date = parse_date("date", date, &mut errors);
        let weight = parse_number("bodyweight", weight, &mut errors);
        match (date, weight) {
            (Some(date), Some(weight)) => errors.finish(Self { date, weight }),
            _ => Err(errors),
        }
    }
}
