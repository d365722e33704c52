use axum::{extract::Query, Json};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{WebError, WebResult};

pub const DEFAULT_PLAN_DAYS: u32 = 7;
pub const MAX_PLAN_DAYS: u32 = 14;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

const SLOTS: [MealSlot; 4] = [
    MealSlot::Breakfast,
    MealSlot::Lunch,
    MealSlot::Dinner,
    MealSlot::Snack,
];

// (name, kcal)
const BREAKFASTS: &[(&str, u32)] = &[
    ("Overnight oats with berries", 380),
    ("Greek yogurt parfait", 320),
    ("Spinach and feta omelette", 410),
    ("Avocado toast with egg", 450),
    ("Banana peanut butter smoothie", 390),
];

const LUNCHES: &[(&str, u32)] = &[
    ("Grilled chicken quinoa bowl", 560),
    ("Lentil and vegetable soup", 430),
    ("Turkey and hummus wrap", 510),
    ("Chickpea salad with tahini", 480),
    ("Tuna nicoise salad", 520),
];

const DINNERS: &[(&str, u32)] = &[
    ("Baked salmon with roasted vegetables", 620),
    ("Beef and broccoli stir fry", 650),
    ("Vegetable curry with brown rice", 590),
    ("Whole wheat pasta primavera", 610),
    ("Chicken fajitas", 640),
];

const SNACKS: &[(&str, u32)] = &[
    ("Apple with almond butter", 200),
    ("Carrot sticks and hummus", 150),
    ("Trail mix", 220),
    ("Cottage cheese with pineapple", 180),
];

impl MealSlot {
    fn catalogue(self) -> &'static [(&'static str, u32)] {
        match self {
            Self::Breakfast => BREAKFASTS,
            Self::Lunch => LUNCHES,
            Self::Dinner => DINNERS,
            Self::Snack => SNACKS,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PlannedMeal {
    pub slot: MealSlot,
    pub name: &'static str,
    pub calories: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    pub day: u32,
    pub meals: Vec<PlannedMeal>,
    pub total_calories: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MealPlan {
    pub id: Uuid,
    pub days: Vec<DayPlan>,
}

/// Builds a throwaway plan by picking one catalogue meal per slot per day.
pub fn generate_sample_plan<R>(rng: &mut R, days: u32) -> MealPlan
where
    R: Rng,
{
    let days = (1..=days)
        .map(|day| {
            let meals = SLOTS
                .iter()
                .map(|&slot| {
                    let catalogue = slot.catalogue();
                    let (name, calories) = catalogue[rng.gen_range(0..catalogue.len())];
                    PlannedMeal {
                        slot,
                        name,
                        calories,
                    }
                })
                .collect::<Vec<_>>();
            let total_calories = meals.iter().map(|meal| meal.calories).sum();

            DayPlan {
                day,
                meals,
                total_calories,
            }
        })
        .collect();

    MealPlan {
        id: Uuid::new_v4(),
        days,
    }
}

#[derive(Debug, Deserialize)]
pub struct SampleQuery {
    days: Option<u32>,
}

pub async fn sample_plan(Query(query): Query<SampleQuery>) -> WebResult<Json<MealPlan>> {
    let days = query.days.unwrap_or(DEFAULT_PLAN_DAYS);
    if !(1..=MAX_PLAN_DAYS).contains(&days) {
        return Err(WebError::InvalidInput(format!(
            "days must be between 1 and {MAX_PLAN_DAYS}"
        )));
    }

    let plan = generate_sample_plan(&mut rand::thread_rng(), days);
    tracing::debug!("Generated sample plan {} for {} day(s)", plan.id, days);
    Ok(Json(plan))
}
