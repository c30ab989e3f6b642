//! Adult height prediction (Khamis-Roche method)
//!
//! Closed-form regression over current stature, current weight, and
//! mid-parental stature, with sex-specific coefficients looked up by
//! half-year age bracket. One evaluation per invocation; the only branch is
//! the bracket lookup. Inputs are range-checked by the API layer before this
//! module runs; [`predict`] assumes in-range values.

use crate::units::{format_feet_inches, inches_to_cm};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Athlete sex, as used by the prediction tables and stored profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn parse(s: &str) -> Option<Sex> {
        match s.to_ascii_lowercase().as_str() {
            "male" | "m" => Some(Sex::Male),
            "female" | "f" => Some(Sex::Female),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }

    /// Published standard error of the regression estimate, inches
    fn standard_error(&self) -> f64 {
        match self {
            Sex::Male => 1.7,
            Sex::Female => 1.5,
        }
    }
}

/// Accepted input ranges, enforced by the API validation layer
pub const AGE_YEARS: RangeInclusive<f64> = 8.0..=18.0;
pub const HEIGHT_IN: RangeInclusive<f64> = 36.0..=84.0;
pub const WEIGHT_LB: RangeInclusive<f64> = 40.0..=400.0;
pub const PARENT_HEIGHT_IN: RangeInclusive<f64> = 48.0..=84.0;

/// Transient prediction inputs; never persisted as-is
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PredictionInput {
    pub sex: Sex,
    pub age_years: f64,
    pub height_in: f64,
    pub weight_lb: f64,
    pub mother_height_in: f64,
    pub father_height_in: f64,
}

/// Computed prediction, persisted only via the explicit save operation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionResult {
    pub predicted_height_in: f64,
    pub predicted_height_cm: f64,
    /// Symmetric +/- band around the point estimate, inches
    pub margin_in: f64,
    /// Percent of predicted adult height already attained, capped at 100
    pub percent_complete: f64,
    pub remaining_in: f64,
    pub remaining_cm: f64,
    pub interpretation: String,
    pub recommended_positions: Vec<String>,
}

/// Regression coefficients for one half-year age bracket
struct AgeBracket {
    age_min: f64,
    intercept: f64,
    stature: f64,
    weight: f64,
    midparent: f64,
}

// Half-year brackets over [8.0, 18.0). Coefficients shift weight from the
// mid-parental term onto current stature as the athlete approaches maturity;
// the stature coefficient approaches 1 and the remaining terms vanish.
const MALE_BRACKETS: [AgeBracket; 20] = [
    AgeBracket { age_min: 8.0, intercept: 0.7680, stature: 1.1711, weight: -0.00560, midparent: 0.1456 },
    AgeBracket { age_min: 8.5, intercept: 0.7590, stature: 1.1586, weight: -0.00530, midparent: 0.1378 },
    AgeBracket { age_min: 9.0, intercept: 0.7500, stature: 1.1467, weight: -0.00500, midparent: 0.1300 },
    AgeBracket { age_min: 9.5, intercept: 0.7410, stature: 1.1352, weight: -0.00470, midparent: 0.1222 },
    AgeBracket { age_min: 10.0, intercept: 0.7320, stature: 1.1241, weight: -0.00440, midparent: 0.1144 },
    AgeBracket { age_min: 10.5, intercept: 0.7248, stature: 1.1156, weight: -0.00416, midparent: 0.1082 },
    AgeBracket { age_min: 11.0, intercept: 0.7176, stature: 1.1073, weight: -0.00392, midparent: 0.1019 },
    AgeBracket { age_min: 11.5, intercept: 0.7086, stature: 1.0972, weight: -0.00362, midparent: 0.0941 },
    AgeBracket { age_min: 12.0, intercept: 0.6996, stature: 1.0876, weight: -0.00332, midparent: 0.0863 },
    AgeBracket { age_min: 12.5, intercept: 0.6870, stature: 1.0746, weight: -0.00290, midparent: 0.0754 },
    AgeBracket { age_min: 13.0, intercept: 0.6744, stature: 1.0623, weight: -0.00248, midparent: 0.0645 },
    AgeBracket { age_min: 13.5, intercept: 0.6627, stature: 1.0513, weight: -0.00209, midparent: 0.0543 },
    AgeBracket { age_min: 14.0, intercept: 0.6510, stature: 1.0409, weight: -0.00170, midparent: 0.0442 },
    AgeBracket { age_min: 14.5, intercept: 0.6372, stature: 1.0291, weight: -0.00124, midparent: 0.0322 },
    AgeBracket { age_min: 15.0, intercept: 0.6234, stature: 1.0179, weight: -0.00078, midparent: 0.0203 },
    AgeBracket { age_min: 15.5, intercept: 0.6168, stature: 1.0127, weight: -0.00056, midparent: 0.0146 },
    AgeBracket { age_min: 16.0, intercept: 0.6102, stature: 1.0076, weight: -0.00034, midparent: 0.0088 },
    AgeBracket { age_min: 16.5, intercept: 0.6072, stature: 1.0053, weight: -0.00024, midparent: 0.0062 },
    AgeBracket { age_min: 17.0, intercept: 0.6042, stature: 1.0031, weight: -0.00014, midparent: 0.0036 },
    AgeBracket { age_min: 17.5, intercept: 0.6027, stature: 1.0020, weight: -0.00009, midparent: 0.0023 },
];

const FEMALE_BRACKETS: [AgeBracket; 20] = [
    AgeBracket { age_min: 8.0, intercept: 0.7350, stature: 1.1277, weight: -0.00450, midparent: 0.1170 },
    AgeBracket { age_min: 8.5, intercept: 0.7254, stature: 1.1163, weight: -0.00418, midparent: 0.1087 },
    AgeBracket { age_min: 9.0, intercept: 0.7158, stature: 1.1052, weight: -0.00386, midparent: 0.1004 },
    AgeBracket { age_min: 9.5, intercept: 0.7047, stature: 1.0930, weight: -0.00349, midparent: 0.0907 },
    AgeBracket { age_min: 10.0, intercept: 0.6936, stature: 1.0813, weight: -0.00312, midparent: 0.0811 },
    AgeBracket { age_min: 10.5, intercept: 0.6816, stature: 1.0693, weight: -0.00272, midparent: 0.0707 },
    AgeBracket { age_min: 11.0, intercept: 0.6696, stature: 1.0577, weight: -0.00232, midparent: 0.0603 },
    AgeBracket { age_min: 11.5, intercept: 0.6561, stature: 1.0454, weight: -0.00187, midparent: 0.0486 },
    AgeBracket { age_min: 12.0, intercept: 0.6426, stature: 1.0336, weight: -0.00142, midparent: 0.0369 },
    AgeBracket { age_min: 12.5, intercept: 0.6318, stature: 1.0246, weight: -0.00106, midparent: 0.0276 },
    AgeBracket { age_min: 13.0, intercept: 0.6210, stature: 1.0160, weight: -0.00070, midparent: 0.0182 },
    AgeBracket { age_min: 13.5, intercept: 0.6156, stature: 1.0117, weight: -0.00052, midparent: 0.0135 },
    AgeBracket { age_min: 14.0, intercept: 0.6102, stature: 1.0076, weight: -0.00034, midparent: 0.0088 },
    AgeBracket { age_min: 14.5, intercept: 0.6069, stature: 1.0051, weight: -0.00023, midparent: 0.0060 },
    AgeBracket { age_min: 15.0, intercept: 0.6036, stature: 1.0027, weight: -0.00012, midparent: 0.0031 },
    AgeBracket { age_min: 15.5, intercept: 0.6024, stature: 1.0018, weight: -0.00008, midparent: 0.0021 },
    AgeBracket { age_min: 16.0, intercept: 0.6012, stature: 1.0009, weight: -0.00004, midparent: 0.0010 },
    AgeBracket { age_min: 16.5, intercept: 0.6009, stature: 1.0007, weight: -0.00003, midparent: 0.0008 },
    AgeBracket { age_min: 17.0, intercept: 0.6003, stature: 1.0002, weight: -0.00001, midparent: 0.0003 },
    AgeBracket { age_min: 17.5, intercept: 0.6001, stature: 1.0001, weight: -0.00000, midparent: 0.0001 },
];

/// Height cutoffs (inches) mapping predicted adult height to suitable field
/// positions. Data only; scanned top-down for the first row at or under the
/// prediction.
const MALE_POSITION_CUTOFFS: [(f64, &[&str]); 5] = [
    (76.0, &["Offensive Tackle", "Defensive End", "Tight End"]),
    (73.0, &["Quarterback", "Tight End", "Linebacker", "Wide Receiver"]),
    (70.0, &["Quarterback", "Wide Receiver", "Safety", "Linebacker"]),
    (67.0, &["Running Back", "Wide Receiver", "Cornerback"]),
    (0.0, &["Running Back", "Cornerback", "Kicker", "Return Specialist"]),
];

const FEMALE_POSITION_CUTOFFS: [(f64, &[&str]); 5] = [
    (71.0, &["Offensive Tackle", "Defensive End", "Tight End"]),
    (68.0, &["Quarterback", "Tight End", "Linebacker", "Wide Receiver"]),
    (65.0, &["Quarterback", "Wide Receiver", "Safety", "Linebacker"]),
    (62.0, &["Running Back", "Wide Receiver", "Cornerback"]),
    (0.0, &["Running Back", "Cornerback", "Kicker", "Return Specialist"]),
];

fn bracket_for(sex: Sex, age_years: f64) -> &'static AgeBracket {
    let table: &[AgeBracket; 20] = match sex {
        Sex::Male => &MALE_BRACKETS,
        Sex::Female => &FEMALE_BRACKETS,
    };
    let index = (((age_years - 8.0) * 2.0).floor() as usize).min(table.len() - 1);
    &table[index]
}

/// Positions suited to a predicted adult height, from the static cutoff table
pub fn recommended_positions(sex: Sex, predicted_height_in: f64) -> Vec<String> {
    let cutoffs: &[(f64, &[&str])] = match sex {
        Sex::Male => &MALE_POSITION_CUTOFFS,
        Sex::Female => &FEMALE_POSITION_CUTOFFS,
    };
    cutoffs
        .iter()
        .find(|(min_in, _)| predicted_height_in >= *min_in)
        .map(|(_, positions)| positions.iter().map(|p| p.to_string()).collect())
        .unwrap_or_default()
}

/// Predict adult height from validated inputs.
pub fn predict(input: &PredictionInput) -> PredictionResult {
    let bracket = bracket_for(input.sex, input.age_years);
    let midparent = (input.mother_height_in + input.father_height_in) / 2.0;

    let predicted_in = bracket.intercept
        + bracket.stature * input.height_in
        + bracket.weight * input.weight_lb
        + bracket.midparent * midparent;

    let percent_complete = ((input.height_in / predicted_in) * 100.0).min(100.0);
    let remaining_in = (predicted_in - input.height_in).max(0.0);
    let margin_in = input.sex.standard_error();

    let interpretation = format!(
        "Projected adult height {} ({:.1} in) \u{b1} {:.1} in; {:.0}% of adult height reached, about {:.1} in of growth remaining.",
        format_feet_inches(predicted_in),
        predicted_in,
        margin_in,
        percent_complete,
        remaining_in,
    );

    PredictionResult {
        predicted_height_in: round1(predicted_in),
        predicted_height_cm: round1(inches_to_cm(predicted_in)),
        margin_in,
        percent_complete: round1(percent_complete),
        remaining_in: round1(remaining_in),
        remaining_cm: round1(inches_to_cm(remaining_in)),
        interpretation,
        recommended_positions: recommended_positions(input.sex, predicted_in),
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
