//! Prompt assembly and plan generation.
//!
//! The provider receives one instruction string embedding the branch name
//! and the session's serialized answers. The streamed response is drained to
//! completion before any formatting or rendering happens; nothing is
//! delivered to the browser incrementally.

use futures::StreamExt;

use planfit_core::{format_plan_text, PlanKind, PlanPreferences, SurveyData};
use planfit_providers::TextGenerator;

use crate::error::WebError;

/// A rendered plan. Lives only for the duration of one response.
#[derive(Debug, Clone)]
pub struct GeneratedPlan {
    pub kind: PlanKind,
    pub plan_html: String,
}

/// Build the provider instruction from the session's answers.
pub fn build_prompt(kind: PlanKind, survey: &SurveyData, preferences: &PlanPreferences) -> String {
    let personal_info = serde_json::to_string(survey).unwrap_or_default();
    let requirements = match preferences {
        PlanPreferences::Workout(workout) => serde_json::to_string(workout),
        PlanPreferences::Meal(meals) => serde_json::to_string(meals),
    }
    .unwrap_or_default();

    format!(
        "{} plan based on survey and secondary data. \
         Here is the personal info: {}. \
         Here are the plan requirements: {}",
        kind.as_str(),
        personal_info,
        requirements
    )
}

/// Invoke the provider, drain the stream, and format the result.
pub async fn generate_plan(
    generator: &dyn TextGenerator,
    kind: PlanKind,
    survey: &SurveyData,
    preferences: &PlanPreferences,
) -> Result<GeneratedPlan, WebError> {
    let prompt = build_prompt(kind, survey, preferences);

    tracing::info!(kind = kind.as_str(), provider = generator.provider(), "generating plan");

    let mut stream = generator.generate_stream(&prompt).await?;
    let mut text = String::new();
    while let Some(chunk) = stream.next().await {
        text.push_str(&chunk?);
    }

    Ok(GeneratedPlan {
        kind,
        plan_html: format_plan_text(&text),
    })
}
