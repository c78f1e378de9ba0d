//! Structural input validation.
//!
//! Runs before any repository call. Checks cover input shape only: key-code
//! patterns, the enumerated `IsOfficial` values, non-empty text columns.
//! Referential integrity and uniqueness belong to the repositories and the
//! store. Every failure names the offending field with expected/actual detail.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::{CityPatch, Country, CountryLanguage, CountryPatch, LanguagePatch, NewCity};

static COUNTRY_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[A-Za-z]{3}$").expect("static pattern"));
static CODE2_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[A-Za-z]{2}$").expect("static pattern"));
static IS_OFFICIAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^(T|F)$").expect("static pattern"));

/// Result type for validation checks.
pub type ValidationResult = Result<(), ValidationError>;

/// A single failed structural check, with field-level detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Wire name of the offending field.
    pub field: String,
    /// Expected shape or value set.
    pub expected: String,
    /// What the payload actually carried.
    pub actual: String,
}

impl ValidationError {
    pub fn new(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    fn empty_field(field: &str) -> Self {
        Self::new(field, "non-empty string", "empty string")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid field '{}': expected {}, got {}",
            self.field, self.expected, self.actual
        )
    }
}

impl std::error::Error for ValidationError {}

fn check_country_code(field: &str, value: &str) -> ValidationResult {
    if COUNTRY_CODE_RE.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new(
            field,
            "3-letter country code",
            format!("'{}'", value),
        ))
    }
}

fn check_is_official(value: &str) -> ValidationResult {
    if IS_OFFICIAL_RE.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new(
            "IsOfficial",
            "one of 'T', 'F'",
            format!("'{}'", value),
        ))
    }
}

fn check_non_empty(field: &str, value: &str) -> ValidationResult {
    if value.is_empty() {
        Err(ValidationError::empty_field(field))
    } else {
        Ok(())
    }
}

/// Validate a country create payload.
pub fn validate_new_country(country: &Country) -> ValidationResult {
    check_country_code("Code", &country.code)?;
    check_non_empty("Name", &country.name)?;
    if !CODE2_RE.is_match(&country.code2) {
        return Err(ValidationError::new(
            "Code2",
            "2-letter country code",
            format!("'{}'", country.code2),
        ));
    }
    Ok(())
}

/// Validate a country patch payload.
pub fn validate_country_patch(patch: &CountryPatch) -> ValidationResult {
    if let Some(name) = &patch.name {
        check_non_empty("Name", name)?;
    }
    if let Some(code2) = &patch.code2 {
        if !CODE2_RE.is_match(code2) {
            return Err(ValidationError::new(
                "Code2",
                "2-letter country code",
                format!("'{}'", code2),
            ));
        }
    }
    Ok(())
}

/// Validate a city create payload.
pub fn validate_new_city(city: &NewCity) -> ValidationResult {
    check_non_empty("Name", &city.name)?;
    check_country_code("CountryCode", &city.country_code)?;
    check_non_empty("District", &city.district)
}

/// Validate a city patch payload.
pub fn validate_city_patch(patch: &CityPatch) -> ValidationResult {
    if let Some(name) = &patch.name {
        check_non_empty("Name", name)?;
    }
    if let Some(code) = &patch.country_code {
        check_country_code("CountryCode", code)?;
    }
    if let Some(district) = &patch.district {
        check_non_empty("District", district)?;
    }
    Ok(())
}

/// Validate a language create payload.
pub fn validate_new_language(language: &CountryLanguage) -> ValidationResult {
    check_country_code("CountryCode", &language.country_code)?;
    check_non_empty("Language", &language.language)?;
    check_is_official(&language.is_official)
}

/// Validate a language patch payload.
pub fn validate_language_patch(patch: &LanguagePatch) -> ValidationResult {
    if let Some(flag) = &patch.is_official {
        check_is_official(flag)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn language(is_official: &str) -> CountryLanguage {
        CountryLanguage {
            country_code: "XYZ".to_string(),
            language: "Testish".to_string(),
            is_official: is_official.to_string(),
            percentage: 50.0,
        }
    }

    #[test]
    fn test_is_official_enumeration() {
        assert!(validate_new_language(&language("T")).is_ok());
        assert!(validate_new_language(&language("F")).is_ok());

        for bad in ["t", "f", "true", "X", ""] {
            let err = validate_new_language(&language(bad)).unwrap_err();
            assert_eq!(err.field, "IsOfficial");
        }
    }

    #[test]
    fn test_country_code_pattern() {
        let mut city: NewCity = serde_json::from_value(json!({
            "Name": "Springfield",
            "CountryCode": "USA",
            "District": "Unknown",
            "Population": 1
        }))
        .unwrap();
        assert!(validate_new_city(&city).is_ok());

        // Lowercase is accepted; length and non-letters are not.
        city.country_code = "usa".to_string();
        assert!(validate_new_city(&city).is_ok());
        for bad in ["US", "USAA", "U1A", ""] {
            city.country_code = bad.to_string();
            let err = validate_new_city(&city).unwrap_err();
            assert_eq!(err.field, "CountryCode");
        }
    }

    #[test]
    fn test_percentage_is_not_range_checked() {
        let mut lang = language("T");
        lang.percentage = 250.0;
        assert!(validate_new_language(&lang).is_ok());
    }

    #[test]
    fn test_error_message_carries_field_detail() {
        let err = validate_new_language(&language("yes")).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("IsOfficial"));
        assert!(msg.contains("'T', 'F'"));
        assert!(msg.contains("'yes'"));
    }

    #[test]
    fn test_patch_validation_only_checks_present_fields() {
        assert!(validate_language_patch(&LanguagePatch::default()).is_ok());
        let patch = LanguagePatch {
            is_official: Some("Q".to_string()),
            percentage: None,
        };
        assert!(validate_language_patch(&patch).is_err());
    }
}
