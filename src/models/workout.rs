use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single exercise within a workout day. `id` is assigned on persistence;
/// before that, identity is positional within the day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub name: String,
    pub sets: i32,
    pub reps: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpe: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_seconds: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

/// One day of a template. `day_number` is 1..=7, Monday through Sunday.
/// A rest day carries an empty exercise list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkoutDay {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub day_number: i32,
    pub name: String,
    pub is_rest_day: bool,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Beginner" => Some(Difficulty::Beginner),
            "Intermediate" => Some(Difficulty::Intermediate),
            "Advanced" => Some(Difficulty::Advanced),
            _ => None,
        }
    }
}

/// A reusable workout plan. Persisted templates use a UUID string id;
/// AI-generated templates that have not been saved yet carry a synthetic
/// `generated-<epoch-millis>` id. `created_by == None` marks a seed template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkoutTemplate {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub category: String,
    pub days: Vec<WorkoutDay>,
    #[serde(default)]
    pub created_by: Option<Uuid>,
}

/// Completion status of one scheduled day. `day_id` holds the workout day
/// UUID when known, otherwise the day number as a string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletedWorkout {
    pub date: NaiveDate,
    pub day_id: String,
    pub completed: bool,
}

/// Legacy template shape: days grouped into explicit weeks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkoutWeek {
    #[serde(default)]
    pub days: Vec<WorkoutDay>,
}

/// A template bound to a user's schedule from a given start date.
/// At most one binding is active per user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserWorkout {
    #[serde(flatten)]
    pub template: WorkoutTemplate,
    pub user_id: Uuid,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub completed_workouts: Vec<CompletedWorkout>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weeks: Option<Vec<WorkoutWeek>>,
}

/// A completed day's name and exercises, with planned values overridden
/// by any same-date logged progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedWorkoutDetails {
    pub id: String,
    pub name: String,
    pub date: NaiveDate,
    pub exercises: Vec<Exercise>,
}

pub fn is_generated_id(id: &str) -> bool {
    id.starts_with("generated-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_id_prefix_is_recognized() {
        assert!(is_generated_id("generated-1714000000000"));
        assert!(!is_generated_id("b9a4f9a0-0000-0000-0000-000000000000"));
        assert!(!is_generated_id(""));
    }

    #[test]
    fn template_deserializes_without_id_or_created_by() {
        let json = r#"{
            "name": "Push Pull Legs",
            "difficulty": "Intermediate",
            "days": []
        }"#;
        let template: WorkoutTemplate = serde_json::from_str(json).unwrap();
        assert_eq!(template.id, "");
        assert_eq!(template.created_by, None);
        assert_eq!(template.difficulty, Difficulty::Intermediate);
    }
}
