use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalculatorError {
    #[error("Please enter a valid height and weight.")]
    InvalidBodyMeasurements,

    #[error("Please enter a valid age, height and weight.")]
    InvalidCalorieInput,

    #[error("Unknown gender \"{0}\". Use male or female.")]
    UnknownGender(String),

    #[error("Unknown activity level \"{0}\". Use sedentary, light, moderate, active or very-active.")]
    UnknownActivity(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            Self::Underweight
        } else if bmi < 25.0 {
            Self::Normal
        } else if bmi < 30.0 {
            Self::Overweight
        } else {
            Self::Obese
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Underweight => "Kurus (Underweight)",
            Self::Normal => "Normal",
            Self::Overweight => "Gemuk (Overweight)",
            Self::Obese => "Sangat Gemuk (Obese)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BmiResult {
    pub height_cm: f64,
    pub weight_kg: f64,
    pub bmi: f64,
    pub category: BmiCategory,
}

pub fn calculate_bmi(height_cm: f64, weight_kg: f64) -> Result<BmiResult, CalculatorError> {
    if !is_positive(height_cm) || !is_positive(weight_kg) {
        return Err(CalculatorError::InvalidBodyMeasurements);
    }

    let height_m = height_cm / 100.0;
    let bmi = weight_kg / (height_m * height_m);

    Ok(BmiResult {
        height_cm,
        weight_kg,
        bmi,
        category: BmiCategory::from_bmi(bmi),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl FromStr for Gender {
    type Err = CalculatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" | "pria" | "laki-laki" => Ok(Self::Male),
            "female" | "f" | "wanita" | "perempuan" => Ok(Self::Female),
            other => Err(CalculatorError::UnknownGender(other.to_string())),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub fn factor(&self) -> f64 {
        match self {
            Self::Sedentary => 1.2,
            Self::Light => 1.375,
            Self::Moderate => 1.55,
            Self::Active => 1.725,
            Self::VeryActive => 1.9,
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = CalculatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "sedentary" => Ok(Self::Sedentary),
            "light" => Ok(Self::Light),
            "moderate" => Ok(Self::Moderate),
            "active" => Ok(Self::Active),
            "very-active" => Ok(Self::VeryActive),
            other => Err(CalculatorError::UnknownActivity(other.to_string())),
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sedentary => "sedentary",
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Active => "active",
            Self::VeryActive => "very-active",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalorieResult {
    pub age: u32,
    pub gender: Gender,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity: ActivityLevel,
    pub bmr: f64,
    pub tdee: f64,
}

impl CalorieResult {
    pub fn rounded_tdee(&self) -> i64 {
        self.tdee.round() as i64
    }
}

/// Daily energy needs from the Mifflin-St Jeor basal rate scaled by activity.
pub fn estimate_calories(
    age: u32,
    gender: Gender,
    height_cm: f64,
    weight_kg: f64,
    activity: ActivityLevel,
) -> Result<CalorieResult, CalculatorError> {
    if age == 0 || !is_positive(height_cm) || !is_positive(weight_kg) {
        return Err(CalculatorError::InvalidCalorieInput);
    }

    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);
    let bmr = match gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    };

    Ok(CalorieResult {
        age,
        gender,
        height_cm,
        weight_kg,
        activity,
        bmr,
        tdee: bmr * activity.factor(),
    })
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_bmi() {
        let result = calculate_bmi(170.0, 70.0).unwrap();

        assert_eq!(format!("{:.2}", result.bmi), "24.22");
        assert_eq!(result.category, BmiCategory::Normal);
        assert_eq!(result.category.label(), "Normal");
    }

    #[test]
    fn obese_bmi() {
        let result = calculate_bmi(160.0, 90.0).unwrap();

        assert!((result.bmi - 35.156).abs() < 0.001, "bmi = {}", result.bmi);
        assert_eq!(result.category.label(), "Sangat Gemuk (Obese)");
    }

    #[test]
    fn bmi_category_boundaries() {
        assert_eq!(BmiCategory::from_bmi(18.49), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(18.5), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(24.99), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(29.99), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(30.0), BmiCategory::Obese);
    }

    #[test]
    fn bmi_rejects_non_positive_input() {
        assert_eq!(
            calculate_bmi(0.0, 70.0),
            Err(CalculatorError::InvalidBodyMeasurements)
        );
        assert_eq!(
            calculate_bmi(170.0, -1.0),
            Err(CalculatorError::InvalidBodyMeasurements)
        );
        assert_eq!(
            calculate_bmi(f64::NAN, 70.0),
            Err(CalculatorError::InvalidBodyMeasurements)
        );
    }

    #[test]
    fn sedentary_male_calories() {
        let result =
            estimate_calories(30, Gender::Male, 175.0, 70.0, ActivityLevel::Sedentary).unwrap();

        assert!((result.bmr - 1648.75).abs() < 1e-9, "bmr = {}", result.bmr);
        assert!((result.tdee - 1978.5).abs() < 1e-9, "tdee = {}", result.tdee);
        assert_eq!(result.rounded_tdee(), 1979);
    }

    #[test]
    fn female_calories_use_lower_constant() {
        let male =
            estimate_calories(40, Gender::Male, 165.0, 60.0, ActivityLevel::Moderate).unwrap();
        let female =
            estimate_calories(40, Gender::Female, 165.0, 60.0, ActivityLevel::Moderate).unwrap();

        assert!((male.bmr - female.bmr - 166.0).abs() < 1e-9);
        assert!((female.tdee - female.bmr * 1.55).abs() < 1e-9);
    }

    #[test]
    fn calories_reject_invalid_input() {
        assert_eq!(
            estimate_calories(0, Gender::Male, 175.0, 70.0, ActivityLevel::Light),
            Err(CalculatorError::InvalidCalorieInput)
        );
        assert_eq!(
            estimate_calories(30, Gender::Female, 175.0, 0.0, ActivityLevel::Light),
            Err(CalculatorError::InvalidCalorieInput)
        );
    }

    #[test]
    fn parses_gender_and_activity() {
        assert_eq!("Perempuan".parse(), Ok(Gender::Female));
        assert_eq!("M".parse(), Ok(Gender::Male));
        assert_eq!("very_active".parse(), Ok(ActivityLevel::VeryActive));
        assert_eq!("VERY-ACTIVE".parse(), Ok(ActivityLevel::VeryActive));
        assert_eq!(
            "couch".parse::<ActivityLevel>(),
            Err(CalculatorError::UnknownActivity("couch".to_string()))
        );
        assert_eq!(
            "x".parse::<Gender>(),
            Err(CalculatorError::UnknownGender("x".to_string()))
        );
    }
}
