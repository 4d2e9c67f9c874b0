//! Daily calorie estimation (Mifflin-St Jeor).

use crate::survey::{ActivityLevel, Gender, SurveyData};

impl ActivityLevel {
    /// Fixed activity factor applied to the BMR. Unknown levels carry the
    /// sedentary factor.
    pub fn multiplier(&self) -> f64 {
        match self {
            Self::Sedentary | Self::Unknown => 1.2,
            Self::LightlyActive => 1.375,
            Self::ModeratelyActive => 1.55,
            Self::VeryActive => 1.725,
            Self::SuperActive => 1.9,
        }
    }
}

/// Estimate total daily energy expenditure, rounded to the nearest calorie.
///
/// `bmr = 10*weight + 6.25*height - 5*age + 5` for men, `-161` in place of
/// `+5` for women, scaled by the activity factor. Never fails: NaN metrics
/// (from uncoerced form input) round-trip to a nonsensical but finite result.
pub fn estimate_daily_calories(survey: &SurveyData) -> i64 {
    let base = 10.0 * survey.weight + 6.25 * survey.height - 5.0 * survey.age as f64;
    let bmr = match survey.gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    };
    (bmr * survey.activity_level.multiplier()).round() as i64
}
