use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One logged set-group for an exercise on a date. Matching against a
/// template's exercises is by case-insensitive name, not by id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkoutProgress {
    pub id: Uuid,
    pub date: NaiveDate,
    pub exercise: String,
    pub weight: f64,
    pub sets: i32,
    pub reps: i32,
}

/// Raw completion row, one per (user, workout day, date).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct CompletionRecord {
    pub workout_day_id: String,
    pub date: NaiveDate,
    pub is_completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProgressRequest {
    pub exercise: String,
    pub weight: f64,
    pub sets: i32,
    pub reps: i32,
    pub date: NaiveDate,
}
