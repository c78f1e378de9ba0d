//! Country language record and patch payload.

use serde::{Deserialize, Serialize};

/// A countrylanguage row, identified by the composite key
/// (`CountryCode`, `Language`). Also the create payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct CountryLanguage {
    pub country_code: String,
    pub language: String,
    /// "T" or "F". Checked by the validation layer, never by the store.
    pub is_official: String,
    /// Share of the population speaking the language. Not range-checked.
    pub percentage: f64,
}

impl CountryLanguage {
    /// The composite key as stored in the table.
    pub fn key(&self) -> (String, String) {
        (self.country_code.clone(), self.language.clone())
    }
}

/// Partial update for a language row. Both key columns are immutable and
/// not accepted here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct LanguagePatch {
    #[serde(default)]
    pub is_official: Option<String>,
    #[serde(default)]
    pub percentage: Option<f64>,
}

impl LanguagePatch {
    /// Merge the patch into an existing record.
    pub fn apply(&self, language: &mut CountryLanguage) {
        if let Some(v) = &self.is_official {
            language.is_official = v.clone();
        }
        if let Some(v) = self.percentage {
            language.percentage = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_patch_rejects_key_columns() {
        for body in [
            json!({"CountryCode": "ABC"}),
            json!({"Language": "Other"}),
        ] {
            let result: Result<LanguagePatch, _> = serde_json::from_value(body);
            assert!(result.is_err());
        }
    }

    #[test]
    fn test_patch_merges_only_present_fields() {
        let mut lang = CountryLanguage {
            country_code: "XYZ".to_string(),
            language: "Testish".to_string(),
            is_official: "F".to_string(),
            percentage: 12.5,
        };
        let patch: LanguagePatch = serde_json::from_value(json!({"IsOfficial": "T"})).unwrap();
        patch.apply(&mut lang);
        assert_eq!(lang.is_official, "T");
        assert_eq!(lang.percentage, 12.5);
    }
}
