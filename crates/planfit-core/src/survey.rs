//! Survey answers and preference branches.
//!
//! Field names serialize in camelCase so the serialized forms embedded in
//! provider prompts match the browser form field names.

use serde::{Deserialize, Serialize};

/// Self-reported gender, as submitted on the base survey form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Parse a form value. Unrecognized input falls back to `Male`, the
    /// formula's `+5` branch; form pages only offer the two known values.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "female" => Self::Female,
            _ => Self::Male,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

/// Self-reported activity level driving the calorie multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
    SuperActive,
    /// Anything the form did not recognize. Carries the sedentary multiplier.
    Unknown,
}

impl ActivityLevel {
    /// Parse a form value; unknown or missing input maps to `Unknown`.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "sedentary" => Self::Sedentary,
            "lightly_active" => Self::LightlyActive,
            "moderately_active" => Self::ModeratelyActive,
            "very_active" => Self::VeryActive,
            "super_active" => Self::SuperActive,
            _ => Self::Unknown,
        }
    }
}

/// Body metrics and goal collected by the base survey form.
///
/// Written once per session by the survey submission; the generate step reads
/// it back verbatim. Malformed numeric form input is coerced upstream (floats
/// to NaN, integers to 0) rather than rejected, so these fields can carry
/// nonsensical values without making anything panic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyData {
    pub gender: Gender,
    /// Height in centimeters.
    pub height: f64,
    /// Weight in kilograms.
    pub weight: f64,
    /// Age in years.
    pub age: i64,
    pub activity_level: ActivityLevel,
    pub goal: String,
}

/// Answers from the workout survey page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPreferences {
    pub days: i64,
    pub time_per_day: i64,
    /// Checkbox group; a single selection still arrives as a one-element list.
    pub exercise_type: Vec<String>,
}

/// Answers from the meal survey page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPreferences {
    pub meals_per_day: i64,
    pub snacks_per_day: i64,
    /// Bool-like form value, stored verbatim.
    pub packed_lunch: String,
    pub dietary_restrictions: Vec<String>,
}

/// The branch a session committed to, as a tagged union.
///
/// A session holds at most one of these; submitting the other survey page
/// replaces it, so "both present" is unrepresentable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanPreferences {
    Workout(WorkoutPreferences),
    Meal(MealPreferences),
}

impl PlanPreferences {
    pub fn kind(&self) -> PlanKind {
        match self {
            Self::Workout(_) => PlanKind::Lifting,
            Self::Meal(_) => PlanKind::Meals,
        }
    }
}

/// Which kind of plan the generate step produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanKind {
    Lifting,
    Meals,
}

impl PlanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lifting => "lifting",
            Self::Meals => "meals",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_level_parse_known_values() {
        assert_eq!(ActivityLevel::parse("sedentary"), ActivityLevel::Sedentary);
        assert_eq!(
            ActivityLevel::parse("moderately_active"),
            ActivityLevel::ModeratelyActive
        );
        assert_eq!(ActivityLevel::parse("super_active"), ActivityLevel::SuperActive);
    }

    #[test]
    fn test_activity_level_parse_unknown_falls_back() {
        assert_eq!(ActivityLevel::parse(""), ActivityLevel::Unknown);
        assert_eq!(ActivityLevel::parse("couch_potato"), ActivityLevel::Unknown);
    }

    #[test]
    fn test_gender_parse() {
        assert_eq!(Gender::parse("female"), Gender::Female);
        assert_eq!(Gender::parse("FEMALE"), Gender::Female);
        assert_eq!(Gender::parse("male"), Gender::Male);
        assert_eq!(Gender::parse("other"), Gender::Male);
    }

    #[test]
    fn test_survey_data_serializes_camel_case() {
        let survey = SurveyData {
            gender: Gender::Male,
            height: 180.0,
            weight: 80.0,
            age: 25,
            activity_level: ActivityLevel::ModeratelyActive,
            goal: "bulk".to_string(),
        };
        let json = serde_json::to_string(&survey).unwrap();
        assert!(json.contains("\"activityLevel\":\"moderately_active\""));
        assert!(json.contains("\"gender\":\"male\""));
    }

    #[test]
    fn test_workout_preferences_serialize_field_names() {
        let prefs = WorkoutPreferences {
            days: 3,
            time_per_day: 45,
            exercise_type: vec!["push".to_string()],
        };
        let json = serde_json::to_string(&prefs).unwrap();
        assert!(json.contains("\"timePerDay\":45"));
        assert!(json.contains("\"exerciseType\":[\"push\"]"));
    }

    #[test]
    fn test_plan_preferences_kind() {
        let workout = PlanPreferences::Workout(WorkoutPreferences {
            days: 3,
            time_per_day: 45,
            exercise_type: vec![],
        });
        assert_eq!(workout.kind(), PlanKind::Lifting);

        let meals = PlanPreferences::Meal(MealPreferences {
            meals_per_day: 3,
            snacks_per_day: 2,
            packed_lunch: "yes".to_string(),
            dietary_restrictions: vec![],
        });
        assert_eq!(meals.kind(), PlanKind::Meals);
        assert_eq!(meals.kind().as_str(), "meals");
    }
}
