use chrono::{Datelike, Duration, Utc};
use uuid::Uuid;

use crate::models::UserWorkout;

use super::schedule_service::resolve_day_for_date;

const EXPORT_HORIZON_DAYS: i64 = 30;

/// Render the active schedule as an iCalendar payload: one event per
/// resolved non-rest day over a 30-day horizon from the start date,
/// 09:00 start, one hour long, title = day name, description = the
/// day's exercise lines.
pub fn export_schedule(workout: &UserWorkout) -> String {
    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        "PRODID:-//gym-planner//Workout Schedule//EN".to_string(),
    ];

    let stamp = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();

    for offset in 0..EXPORT_HORIZON_DAYS {
        let date = workout.start_date + Duration::days(offset);
        let Some(day) = resolve_day_for_date(workout, date) else {
            continue;
        };
        if day.is_rest_day {
            continue;
        }

        let description = day
            .exercises
            .iter()
            .map(|exercise| {
                let mut line = format!(
                    "{} — {} sets x {} reps",
                    exercise.name, exercise.sets, exercise.reps
                );
                if let Some(rpe) = exercise.rpe {
                    line.push_str(&format!(" @ RPE {rpe}"));
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n");

        lines.push("BEGIN:VEVENT".to_string());
        lines.push(format!("UID:{}@gym-planner", Uuid::new_v4()));
        lines.push(format!("DTSTAMP:{stamp}"));
        lines.push(format!(
            "DTSTART:{:04}{:02}{:02}T090000",
            date.year(),
            date.month(),
            date.day()
        ));
        lines.push("DURATION:PT1H".to_string());
        lines.push(format!("SUMMARY:{}", escape_text(&day.name)));
        lines.push(format!("DESCRIPTION:{}", escape_text(&description)));
        lines.push("END:VEVENT".to_string());
    }

    lines.push("END:VCALENDAR".to_string());
    lines.join("\r\n") + "\r\n"
}

/// RFC 5545 text escaping: backslash, comma, semicolon and newlines.
fn escape_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace(',', "\\,")
        .replace(';', "\\;")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, Exercise, UserWorkout, WorkoutDay, WorkoutTemplate};
    use pretty_assertions::assert_eq;
    use chrono::NaiveDate;

    fn workout_with_days(days: Vec<WorkoutDay>) -> UserWorkout {
        UserWorkout {
            template: WorkoutTemplate {
                id: "t".to_string(),
                name: "Plan".to_string(),
                description: String::new(),
                difficulty: Difficulty::Beginner,
                category: String::new(),
                days,
                created_by: None,
            },
            user_id: Uuid::new_v4(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            completed_workouts: Vec::new(),
            weeks: None,
        }
    }

    fn training_day(number: i32, name: &str) -> WorkoutDay {
        WorkoutDay {
            id: None,
            day_number: number,
            name: name.to_string(),
            is_rest_day: false,
            exercises: vec![Exercise {
                id: None,
                name: "Squat".to_string(),
                sets: 3,
                reps: 10,
                rpe: Some(8.0),
                rest_seconds: None,
                notes: None,
                weight: None,
            }],
        }
    }

    fn rest_day(number: i32) -> WorkoutDay {
        WorkoutDay {
            id: None,
            day_number: number,
            name: "Rest".to_string(),
            is_rest_day: true,
            exercises: Vec::new(),
        }
    }

    #[test]
    fn rest_days_are_skipped() {
        // 1 training day + 6 rest days cycling over 30 days: ceil(30/7) hits
        // the training day 5 times.
        let mut days = vec![training_day(1, "Full Body")];
        days.extend((2..=7).map(rest_day));
        let ics = export_schedule(&workout_with_days(days));

        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 5);
        assert!(ics.starts_with("BEGIN:VCALENDAR"));
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
    }

    #[test]
    fn events_carry_exercise_lines_and_default_time() {
        let mut days = vec![training_day(1, "Push Day")];
        days.extend((2..=7).map(rest_day));
        let ics = export_schedule(&workout_with_days(days));

        assert!(ics.contains("SUMMARY:Push Day"));
        assert!(ics.contains("DTSTART:20240101T090000"));
        assert!(ics.contains("DURATION:PT1H"));
        assert!(ics.contains("DESCRIPTION:Squat — 3 sets x 10 reps @ RPE 8"));
    }

    #[test]
    fn text_is_escaped() {
        let mut days = vec![training_day(1, "Push, Pull; Legs")];
        days.extend((2..=7).map(rest_day));
        let ics = export_schedule(&workout_with_days(days));
        assert!(ics.contains("SUMMARY:Push\\, Pull\\; Legs"));
    }
}
