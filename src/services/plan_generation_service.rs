use chrono::Utc;

use crate::errors::GenerationError;
use crate::models::WorkoutTemplate;

use super::openai_client::OpenAiClient;

const SYSTEM_PROMPT: &str = r#"You are a professional fitness coach specializing in creating personalized workout plans.
Generate a detailed workout template based on the user's request.

The response MUST be a valid JSON object with the following structure:
{
  "name": "Name of the workout plan",
  "description": "Detailed description of the workout plan",
  "difficulty": "Beginner, Intermediate, or Advanced",
  "category": "Strength, Hypertrophy, Endurance, etc.",
  "days": [
    {
      "day_number": 1,
      "name": "Day name (e.g., Push Day, Upper Body, etc.)",
      "is_rest_day": false,
      "exercises": [
        {
          "name": "Exercise name",
          "sets": 3,
          "reps": 10,
          "rpe": 8,
          "rest_seconds": 60,
          "notes": "Any specific notes"
        }
      ]
    }
  ]
}

Ensure the workout plan is tailored to the user's specific needs and goals.
There needs to be 7 days, representing Monday to Sunday.
For rest days, set "is_rest_day" to true and include an empty exercises array.
For exercise days, set "is_rest_day" to false and include the exercises.
In a request, user may send their current workout routine and ask for a change in the plan.
In that case, when you create the workout plan, you should consider the current workout routine and ensure that his changes and needs are met.
The workout plan should be comprehensive and easy to follow.
DO NOT include any explanations or text outside the JSON object."#;

const GENERATION_TEMPERATURE: f32 = 0.7;

/// Builds the prompt, calls the completion upstream, extracts the embedded
/// JSON object and validates its shape. Generation is non-deterministic:
/// identical prompts may yield different plans.
#[derive(Clone)]
pub struct PlanGenerationService {
    client: OpenAiClient,
}

impl PlanGenerationService {
    pub fn new(client: OpenAiClient) -> Self {
        Self { client }
    }

    pub async fn generate(
        &self,
        prompt: &str,
        current_template_context: Option<&str>,
    ) -> Result<WorkoutTemplate, GenerationError> {
        let user_prompt = match current_template_context {
            Some(context) => format!("{prompt}\n\nCurrent workout routine:\n{context}"),
            None => prompt.to_string(),
        };

        let content = self
            .client
            .chat_completion(SYSTEM_PROMPT, &user_prompt, GENERATION_TEMPERATURE)
            .await?;

        let mut template = parse_generated_template(&content)?;
        template.id = format!("generated-{}", Utc::now().timestamp_millis());
        template.created_by = None;

        Ok(template)
    }
}

/// Parse a template out of free-form model output. The response is not
/// trusted to be pure JSON, so the span from the first `{` to the last `}`
/// is extracted and parsed, then shape-checked.
pub fn parse_generated_template(content: &str) -> Result<WorkoutTemplate, GenerationError> {
    let json = extract_json_object(content).ok_or(GenerationError::NoJsonFound)?;
    let template: WorkoutTemplate = serde_json::from_str(json)?;
    validate_generated(&template).map_err(GenerationError::InvalidShape)?;
    Ok(template)
}

fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}

fn validate_generated(template: &WorkoutTemplate) -> Result<(), String> {
    if template.name.trim().is_empty() {
        return Err("template name is empty".to_string());
    }
    if template.days.len() != 7 {
        return Err(format!("expected 7 days, got {}", template.days.len()));
    }

    let mut seen = [false; 7];
    for day in &template.days {
        if !(1..=7).contains(&day.day_number) {
            return Err(format!("day number {} out of range", day.day_number));
        }
        let slot = (day.day_number - 1) as usize;
        if seen[slot] {
            return Err(format!("duplicate day number {}", day.day_number));
        }
        seen[slot] = true;

        if day.is_rest_day && !day.exercises.is_empty() {
            return Err(format!("rest day {} has exercises", day.day_number));
        }
        if !day.is_rest_day && day.exercises.is_empty() {
            return Err(format!("training day {} has no exercises", day.day_number));
        }

        for exercise in &day.exercises {
            if exercise.name.trim().is_empty() {
                return Err(format!("unnamed exercise on day {}", day.day_number));
            }
            if exercise.sets < 1 || exercise.reps < 1 {
                return Err(format!(
                    "exercise '{}' has non-positive sets or reps",
                    exercise.name
                ));
            }
            if let Some(rpe) = exercise.rpe {
                if !(1.0..=10.0).contains(&rpe) {
                    return Err(format!("exercise '{}' has RPE {rpe}", exercise.name));
                }
            }
        }
    }

    Ok(())
}

/// Textual serialization of a template, appended to the user prompt so the
/// model can produce a delta-aware revision of the current plan.
pub fn template_context(template: &WorkoutTemplate) -> String {
    let mut lines = vec![
        format!("Name: {}", template.name),
        format!("Description: {}", template.description),
        format!("Difficulty: {}", template.difficulty.as_str()),
        format!("Category: {}", template.category),
    ];

    for day in &template.days {
        if day.is_rest_day {
            lines.push(format!("Day {} — {}: rest day", day.day_number, day.name));
            continue;
        }
        lines.push(format!("Day {} — {}:", day.day_number, day.name));
        for exercise in &day.exercises {
            let mut line = format!(
                "  {}: {} sets x {} reps",
                exercise.name, exercise.sets, exercise.reps
            );
            if let Some(weight) = exercise.weight {
                line.push_str(&format!(" @ {weight} kg"));
            }
            if let Some(rpe) = exercise.rpe {
                line.push_str(&format!(" (RPE {rpe})"));
            }
            lines.push(line);
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Difficulty;

    fn sample_template_json() -> String {
        let days: Vec<String> = (1..=7)
            .map(|n| {
                if n % 2 == 0 {
                    format!(
                        r#"{{"day_number": {n}, "name": "Rest", "is_rest_day": true, "exercises": []}}"#
                    )
                } else {
                    format!(
                        r#"{{"day_number": {n}, "name": "Training {n}", "is_rest_day": false,
                            "exercises": [{{"name": "Squat", "sets": 3, "reps": 10, "rpe": 8}}]}}"#
                    )
                }
            })
            .collect();
        format!(
            r#"{{"name": "X", "description": "Full body", "difficulty": "Beginner",
                "category": "Strength", "days": [{}]}}"#,
            days.join(",")
        )
    }

    #[test]
    fn extraction_is_robust_to_surrounding_prose() {
        let content = format!("Here is your plan:\n{}\nEnjoy!", sample_template_json());
        let template = parse_generated_template(&content).unwrap();
        assert_eq!(template.name, "X");
        assert_eq!(template.difficulty, Difficulty::Beginner);
        assert_eq!(template.days.len(), 7);
    }

    #[test]
    fn extraction_fails_on_non_json_text() {
        let result = parse_generated_template("Sorry, I can't help");
        assert!(matches!(result, Err(GenerationError::NoJsonFound)));
    }

    #[test]
    fn malformed_json_is_a_parse_failure() {
        let result = parse_generated_template("{\"name\": \"X\", }");
        assert!(matches!(result, Err(GenerationError::ParseFailure(_))));
    }

    #[test]
    fn rest_day_with_exercises_is_rejected() {
        let json = sample_template_json().replace(
            r#""name": "Rest", "is_rest_day": true, "exercises": []"#,
            r#""name": "Rest", "is_rest_day": true, "exercises": [{"name": "Curl", "sets": 3, "reps": 12}]"#,
        );
        let result = parse_generated_template(&json);
        assert!(matches!(result, Err(GenerationError::InvalidShape(_))));
    }

    #[test]
    fn wrong_day_count_is_rejected() {
        let json = r#"{"name": "X", "difficulty": "Beginner", "days": [
            {"day_number": 1, "name": "A", "is_rest_day": true, "exercises": []}
        ]}"#;
        let result = parse_generated_template(json);
        assert!(matches!(result, Err(GenerationError::InvalidShape(_))));
    }

    #[test]
    fn duplicate_day_numbers_are_rejected() {
        let json = sample_template_json().replace(r#""day_number": 3"#, r#""day_number": 1"#);
        let result = parse_generated_template(&json);
        assert!(matches!(result, Err(GenerationError::InvalidShape(_))));
    }

    #[test]
    fn context_serialization_lists_days_and_exercises() {
        let template = parse_generated_template(&sample_template_json()).unwrap();
        let context = template_context(&template);
        assert!(context.contains("Name: X"));
        assert!(context.contains("Difficulty: Beginner"));
        assert!(context.contains("Day 2 — Rest: rest day"));
        assert!(context.contains("Squat: 3 sets x 10 reps (RPE 8)"));
    }
}
