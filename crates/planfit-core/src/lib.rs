//! Core domain model for planfit.
//!
//! Pure types and functions shared by the web surface: the survey data a
//! browser session accumulates, the calorie estimate shown on the plan
//! chooser, and the formatter that turns raw model output into list markup.

mod calories;
mod format;
mod survey;

pub use calories::estimate_daily_calories;
pub use format::format_plan_text;
pub use survey::{
    ActivityLevel, Gender, MealPreferences, PlanKind, PlanPreferences, SurveyData,
    WorkoutPreferences,
};
