use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{CompletionRecord, WorkoutProgress};

#[derive(FromRow)]
struct ProgressRow {
    id: Uuid,
    date: NaiveDate,
    exercise_name: String,
    weight: f64,
    sets: i32,
    reps: i32,
}

#[derive(Clone)]
pub struct ProgressService {
    db: PgPool,
}

impl ProgressService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn exercise_progress(&self, user_id: Uuid) -> Result<Vec<WorkoutProgress>, AppError> {
        let rows = sqlx::query_as::<_, ProgressRow>(
            "SELECT id, date, exercise_name, weight, sets, reps
             FROM exercise_progress
             WHERE user_id = $1
             ORDER BY date ASC",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .map_err(|e| AppError::persistence("fetch exercise progress", e))?;

        Ok(rows
            .into_iter()
            .map(|row| WorkoutProgress {
                id: row.id,
                date: row.date,
                exercise: row.exercise_name,
                weight: row.weight,
                sets: row.sets,
                reps: row.reps,
            })
            .collect())
    }

    pub async fn add_progress(
        &self,
        user_id: Uuid,
        exercise_name: &str,
        weight: f64,
        sets: i32,
        reps: i32,
        date: NaiveDate,
    ) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO exercise_progress (user_id, exercise_name, weight, sets, reps, date)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(user_id)
        .bind(exercise_name)
        .bind(weight)
        .bind(sets)
        .bind(reps)
        .bind(date)
        .execute(&self.db)
        .await
        .map_err(|e| AppError::persistence("add exercise progress", e))?;

        Ok(())
    }

    pub async fn completed_workouts(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<CompletionRecord>, AppError> {
        let records = sqlx::query_as::<_, CompletionRecord>(
            "SELECT workout_day_id, date, is_completed
             FROM completed_workouts
             WHERE user_id = $1
             ORDER BY date DESC",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .map_err(|e| AppError::persistence("fetch completed workouts", e))?;

        Ok(records)
    }
}
