use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calculators::Gender;

use super::ToolInputError;

const SKIP: &str = "-";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub dob: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<Gender>,
}

impl UserProfile {
    /// Parses `<name...> <YYYY-MM-DD> <gender>`. A `-` leaves that field empty.
    pub fn parse(args: &str) -> Result<Self, ToolInputError> {
        let invalid = || ToolInputError::InvalidProfile(args.trim().to_string());

        let mut words = args.split_whitespace().rev();
        let (Some(gender), Some(dob)) = (words.next(), words.next()) else {
            return Err(invalid());
        };
        let name = words.rev().collect::<Vec<_>>().join(" ");

        let gender = match gender {
            SKIP => None,
            gender => Some(gender.parse::<Gender>().map_err(|_| invalid())?),
        };
        let dob = match dob {
            SKIP => None,
            dob => Some(NaiveDate::parse_from_str(dob, "%Y-%m-%d").map_err(|_| invalid())?),
        };
        let name = match name.as_str() {
            "" | SKIP => None,
            name => Some(name.to_string()),
        };

        Ok(Self { name, dob, gender })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_profile() {
        let profile = UserProfile::parse("Budi Santoso 1990-04-12 male").unwrap();

        assert_eq!(profile.name.as_deref(), Some("Budi Santoso"));
        assert_eq!(profile.dob, NaiveDate::from_ymd_opt(1990, 4, 12));
        assert_eq!(profile.gender, Some(Gender::Male));
    }

    #[test]
    fn dash_skips_fields() {
        let profile = UserProfile::parse("- - perempuan").unwrap();

        assert_eq!(
            profile,
            UserProfile {
                name: None,
                dob: None,
                gender: Some(Gender::Female)
            }
        );
    }

    #[test]
    fn rejects_bad_dates_and_short_input() {
        assert!(UserProfile::parse("Budi 12/04/1990 male").is_err());
        assert!(UserProfile::parse("male").is_err());
    }

    #[test]
    fn missing_fields_read_as_empty() {
        let profile: UserProfile = serde_json::from_str(r#"{"name":"Sari"}"#).unwrap();

        assert_eq!(profile.name.as_deref(), Some("Sari"));
        assert_eq!(profile.dob, None);
    }
}
