use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    CompletedWorkout, CompletedWorkoutDetails, Exercise, UserWorkout, WorkoutDay,
};

use super::template_service::TemplateService;

/// Resolve which template day falls on a calendar date: the day sequence
/// cycles from the start date by plain modular arithmetic. A missed or
/// skipped day does not shift the cycle.
pub fn resolve_day_for_date(workout: &UserWorkout, date: NaiveDate) -> Option<&WorkoutDay> {
    let diff_days = (date - workout.start_date).num_days().unsigned_abs() as usize;

    if !workout.template.days.is_empty() {
        let total = workout.template.days.len();
        return workout.template.days.get(diff_days % total);
    }

    // Legacy shape: days grouped into weeks, flattened in week order.
    let weeks = workout.weeks.as_ref()?;
    let all_days: Vec<&WorkoutDay> = weeks.iter().flat_map(|week| week.days.iter()).collect();
    if all_days.is_empty() {
        return None;
    }
    Some(all_days[diff_days % all_days.len()])
}

pub fn is_completed(workout: &UserWorkout, date: NaiveDate) -> bool {
    workout
        .completed_workouts
        .iter()
        .any(|record| record.date == date && record.completed)
}

pub fn is_skipped(workout: &UserWorkout, date: NaiveDate) -> bool {
    workout
        .completed_workouts
        .iter()
        .any(|record| record.date == date && !record.completed)
}

#[derive(FromRow)]
struct UserWorkoutRow {
    template_id: Uuid,
    start_date: NaiveDate,
}

#[derive(FromRow)]
struct CompletedRow {
    workout_day_id: String,
    date: NaiveDate,
    is_completed: bool,
}

#[derive(FromRow)]
struct DayNameRow {
    name: String,
}

#[derive(FromRow)]
struct ProgressNameRow {
    exercise_name: String,
    weight: f64,
    sets: i32,
    reps: i32,
}

#[derive(Clone)]
pub struct ScheduleService {
    db: PgPool,
    templates: TemplateService,
}

impl ScheduleService {
    pub fn new(db: PgPool, templates: TemplateService) -> Self {
        Self { db, templates }
    }

    /// Swap the user's active schedule binding in one transaction:
    /// deactivate every existing binding, insert the new active one. A
    /// failure rolls back, so the user is never left with zero bindings.
    pub async fn activate_template(
        &self,
        user_id: Uuid,
        template_id: Uuid,
        start_date: NaiveDate,
    ) -> Result<(), AppError> {
        let mut tx = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::persistence("activate template", e))?;

        sqlx::query("UPDATE user_workouts SET is_active = FALSE WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::persistence("deactivate bindings", e))?;

        sqlx::query(
            "INSERT INTO user_workouts (user_id, template_id, start_date, is_active)
             VALUES ($1, $2, $3, TRUE)",
        )
        .bind(user_id)
        .bind(template_id)
        .bind(start_date)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::persistence("insert binding", e))?;

        tx.commit()
            .await
            .map_err(|e| AppError::persistence("activate template", e))?;

        Ok(())
    }

    /// Upsert the completion status for `(user, day, date)`. Idempotent,
    /// last write wins; re-marking overwrites the prior status.
    pub async fn mark_completion(
        &self,
        user_id: Uuid,
        workout_day_id: &str,
        date: NaiveDate,
        completed: bool,
    ) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO completed_workouts (user_id, workout_day_id, date, is_completed)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (user_id, workout_day_id, date)
             DO UPDATE SET is_completed = EXCLUDED.is_completed",
        )
        .bind(user_id)
        .bind(workout_day_id)
        .bind(date)
        .bind(completed)
        .execute(&self.db)
        .await
        .map_err(|e| AppError::persistence("mark completion", e))?;

        Ok(())
    }

    /// The user's active binding, hydrated with its template and every
    /// completion record.
    pub async fn get_active_workout(&self, user_id: Uuid) -> Result<Option<UserWorkout>, AppError> {
        let row = sqlx::query_as::<_, UserWorkoutRow>(
            "SELECT template_id, start_date
             FROM user_workouts
             WHERE user_id = $1 AND is_active = TRUE
             ORDER BY created_at DESC
             LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| AppError::persistence("get active workout", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let Some(template) = self.templates.get_template_by_uuid(row.template_id).await? else {
            warn!("Active binding references missing template {}", row.template_id);
            return Ok(None);
        };

        let completed = sqlx::query_as::<_, CompletedRow>(
            "SELECT workout_day_id, date, is_completed
             FROM completed_workouts
             WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .map_err(|e| AppError::persistence("fetch completed workouts", e))?;

        Ok(Some(UserWorkout {
            template,
            user_id,
            start_date: row.start_date,
            completed_workouts: completed
                .into_iter()
                .map(|record| CompletedWorkout {
                    date: record.date,
                    day_id: record.workout_day_id,
                    completed: record.is_completed,
                })
                .collect(),
            weeks: None,
        }))
    }

    /// A day's name and exercises with planned values overridden by the
    /// same-date progress entries, matched by case-insensitive name.
    pub async fn completed_workout_details(
        &self,
        user_id: Uuid,
        workout_day_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<CompletedWorkoutDetails>, AppError> {
        let day = sqlx::query_as::<_, DayNameRow>(
            "SELECT name FROM workout_days WHERE id = $1",
        )
        .bind(workout_day_id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| AppError::persistence("fetch workout day", e))?;

        let Some(day) = day else {
            return Ok(None);
        };

        let progress = sqlx::query_as::<_, ProgressNameRow>(
            "SELECT exercise_name, weight, sets, reps
             FROM exercise_progress
             WHERE user_id = $1 AND date = $2",
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(&self.db)
        .await
        .map_err(|e| AppError::persistence("fetch exercise progress", e))?;

        let exercises = self
            .templates
            .fetch_exercises(workout_day_id)
            .await?
            .into_iter()
            .map(|exercise| {
                let logged = progress
                    .iter()
                    .find(|p| p.exercise_name.eq_ignore_ascii_case(&exercise.name));
                match logged {
                    Some(logged) => Exercise {
                        sets: logged.sets,
                        reps: logged.reps,
                        weight: Some(logged.weight),
                        ..exercise
                    },
                    None => exercise,
                }
            })
            .collect();

        Ok(Some(CompletedWorkoutDetails {
            id: workout_day_id.to_string(),
            name: day.name,
            date,
            exercises,
        }))
    }

    /// Write edited exercises back to the template and, when a date is
    /// given, record them as that date's logged progress. An exercise
    /// without an id cannot be updated and is logged and skipped.
    pub async fn update_day_exercises(
        &self,
        workout_day_id: Uuid,
        exercises: &[Exercise],
        user_id: Uuid,
        date: Option<NaiveDate>,
    ) -> Result<(), AppError> {
        for exercise in exercises {
            let Some(exercise_id) = exercise.id else {
                warn!(
                    "Exercise '{}' on day {workout_day_id} has no id, cannot update",
                    exercise.name
                );
                continue;
            };

            sqlx::query(
                "UPDATE exercises
                 SET name = $1, sets = $2, reps = $3, rpe = $4, rest_seconds = $5, notes = $6
                 WHERE id = $7",
            )
            .bind(&exercise.name)
            .bind(exercise.sets)
            .bind(exercise.reps)
            .bind(exercise.rpe)
            .bind(exercise.rest_seconds)
            .bind(&exercise.notes)
            .bind(exercise_id)
            .execute(&self.db)
            .await
            .map_err(|e| AppError::persistence("update exercise", e))?;

            let Some(date) = date else {
                continue;
            };

            let existing = sqlx::query_scalar::<_, Uuid>(
                "SELECT id FROM exercise_progress
                 WHERE user_id = $1 AND exercise_name = $2 AND date = $3",
            )
            .bind(user_id)
            .bind(&exercise.name)
            .bind(date)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| AppError::persistence("check exercise progress", e))?;

            match existing {
                Some(progress_id) => {
                    if let Err(e) = sqlx::query(
                        "UPDATE exercise_progress SET sets = $1, reps = $2, weight = $3 WHERE id = $4",
                    )
                    .bind(exercise.sets)
                    .bind(exercise.reps)
                    .bind(exercise.weight.unwrap_or(0.0))
                    .bind(progress_id)
                    .execute(&self.db)
                    .await
                    {
                        warn!("Failed to update progress for '{}': {e}", exercise.name);
                    }
                }
                None => {
                    // Only record new progress when a weight was logged.
                    let Some(weight) = exercise.weight else {
                        continue;
                    };
                    if let Err(e) = sqlx::query(
                        "INSERT INTO exercise_progress (user_id, exercise_name, sets, reps, weight, date)
                         VALUES ($1, $2, $3, $4, $5, $6)",
                    )
                    .bind(user_id)
                    .bind(&exercise.name)
                    .bind(exercise.sets)
                    .bind(exercise.reps)
                    .bind(weight)
                    .bind(date)
                    .execute(&self.db)
                    .await
                    {
                        warn!("Failed to insert progress for '{}': {e}", exercise.name);
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, WorkoutTemplate, WorkoutWeek};
    use chrono::Duration;

    fn day(number: i32, name: &str, rest: bool) -> WorkoutDay {
        WorkoutDay {
            id: None,
            day_number: number,
            name: name.to_string(),
            is_rest_day: rest,
            exercises: Vec::new(),
        }
    }

    fn seven_day_workout(start: NaiveDate) -> UserWorkout {
        UserWorkout {
            template: WorkoutTemplate {
                id: "t".to_string(),
                name: "Test".to_string(),
                description: String::new(),
                difficulty: Difficulty::Beginner,
                category: String::new(),
                days: (1..=7).map(|n| day(n, &format!("Day {n}"), n > 5)).collect(),
                created_by: None,
            },
            user_id: Uuid::new_v4(),
            start_date: start,
            completed_workouts: Vec::new(),
            weeks: None,
        }
    }

    #[test]
    fn resolution_is_periodic_over_seven_days() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let workout = seven_day_workout(start);

        for k in 0..30 {
            let a = resolve_day_for_date(&workout, start + Duration::days(k)).unwrap();
            let b = resolve_day_for_date(&workout, start + Duration::days(k + 7)).unwrap();
            assert_eq!(a.day_number, b.day_number);
        }
    }

    #[test]
    fn start_date_resolves_to_first_day() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let workout = seven_day_workout(start);
        let resolved = resolve_day_for_date(&workout, start).unwrap();
        assert_eq!(resolved.day_number, 1);
    }

    #[test]
    fn legacy_weeks_shape_is_flattened_in_order() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut workout = seven_day_workout(start);
        workout.template.days = Vec::new();
        workout.weeks = Some(vec![
            WorkoutWeek {
                days: vec![day(1, "W1D1", false), day(2, "W1D2", false)],
            },
            WorkoutWeek {
                days: vec![day(1, "W2D1", false)],
            },
        ]);

        let names: Vec<&str> = (0..4)
            .map(|k| {
                resolve_day_for_date(&workout, start + Duration::days(k))
                    .unwrap()
                    .name
                    .as_str()
            })
            .collect();
        assert_eq!(names, vec!["W1D1", "W1D2", "W2D1", "W1D1"]);
    }

    #[test]
    fn empty_shapes_resolve_to_none() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut workout = seven_day_workout(start);
        workout.template.days = Vec::new();
        assert!(resolve_day_for_date(&workout, start).is_none());

        workout.weeks = Some(vec![WorkoutWeek { days: Vec::new() }]);
        assert!(resolve_day_for_date(&workout, start).is_none());
    }

    #[test]
    fn completion_lookup_distinguishes_completed_and_skipped() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut workout = seven_day_workout(start);
        workout.completed_workouts = vec![
            CompletedWorkout {
                date: start,
                day_id: "1".to_string(),
                completed: true,
            },
            CompletedWorkout {
                date: start + Duration::days(1),
                day_id: "2".to_string(),
                completed: false,
            },
        ];

        assert!(is_completed(&workout, start));
        assert!(!is_skipped(&workout, start));
        assert!(is_skipped(&workout, start + Duration::days(1)));
        assert!(!is_completed(&workout, start + Duration::days(1)));
        assert!(!is_completed(&workout, start + Duration::days(2)));
        assert!(!is_skipped(&workout, start + Duration::days(2)));
    }
}
