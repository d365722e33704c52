use axum::Json;
use serde::{Deserialize, Serialize};

use super::{WebError, WebResult};

const MINIMUM_DAILY_CALORIES: f64 = 1200.0;
const GOAL_ADJUSTMENT: f64 = 500.0;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    fn factor(self) -> f64 {
        match self {
            Self::Sedentary => 1.2,
            Self::Light => 1.375,
            Self::Moderate => 1.55,
            Self::Active => 1.725,
            Self::VeryActive => 1.9,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Lose,
    #[default]
    Maintain,
    Gain,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalorieRequest {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age: u32,
    pub sex: Sex,
    pub activity_level: ActivityLevel,
    #[serde(default)]
    pub goal: Goal,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalorieEstimate {
    pub bmr: u32,
    pub maintenance_calories: u32,
    pub target_calories: u32,
}

fn check_range(name: &str, value: f64, min: f64, max: f64) -> WebResult<()> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(WebError::InvalidInput(format!(
            "{name} must be between {min} and {max}"
        )))
    }
}

/// Daily calorie estimate from the Mifflin-St Jeor equation.
pub fn estimate_calories(request: &CalorieRequest) -> WebResult<CalorieEstimate> {
    check_range("weightKg", request.weight_kg, 20.0, 400.0)?;
    check_range("heightCm", request.height_cm, 50.0, 260.0)?;
    check_range("age", f64::from(request.age), 13.0, 120.0)?;

    let sex_offset = match request.sex {
        Sex::Male => 5.0,
        Sex::Female => -161.0,
    };
    let bmr = 10.0 * request.weight_kg + 6.25 * request.height_cm
        - 5.0 * f64::from(request.age)
        + sex_offset;

    let maintenance = bmr * request.activity_level.factor();
    let target = match request.goal {
        Goal::Lose => maintenance - GOAL_ADJUSTMENT,
        Goal::Maintain => maintenance,
        Goal::Gain => maintenance + GOAL_ADJUSTMENT,
    }
    .max(MINIMUM_DAILY_CALORIES);

    Ok(CalorieEstimate {
        bmr: bmr.round() as u32,
        maintenance_calories: maintenance.round() as u32,
        target_calories: target.round() as u32,
    })
}

pub async fn calories(Json(request): Json<CalorieRequest>) -> WebResult<Json<CalorieEstimate>> {
    tracing::debug!("calories: {:?}", request);
    Ok(Json(estimate_calories(&request)?))
}
