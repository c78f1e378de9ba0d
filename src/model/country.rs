//! Country record and patch payload.

use serde::{Deserialize, Serialize};

/// A country row. Also the create payload: the caller supplies the `Code`
/// primary key, so the request body and the stored record have the same shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Country {
    /// Primary key, 3-letter code. Immutable once created.
    pub code: String,
    pub name: String,
    pub continent: String,
    pub region: String,
    pub surface_area: f64,
    #[serde(default)]
    pub indep_year: Option<i32>,
    pub population: i64,
    #[serde(default)]
    pub life_expectancy: Option<f64>,
    #[serde(default, rename = "GNP")]
    pub gnp: Option<f64>,
    #[serde(default, rename = "GNPOld")]
    pub gnp_old: Option<f64>,
    pub local_name: String,
    pub government_form: String,
    #[serde(default)]
    pub head_of_state: Option<String>,
    /// Optional reference to the capital city id.
    #[serde(default)]
    pub capital: Option<i64>,
    /// 2-letter secondary code.
    pub code2: String,
}

/// Partial update for a country. `Code` is not listed: the key column is
/// immutable, and an attempt to send it fails deserialization.
///
/// `None` means "field absent from the payload, keep the prior value".
/// Optional columns therefore cannot be reset to null through a patch.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct CountryPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub continent: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub surface_area: Option<f64>,
    #[serde(default)]
    pub indep_year: Option<i32>,
    #[serde(default)]
    pub population: Option<i64>,
    #[serde(default)]
    pub life_expectancy: Option<f64>,
    #[serde(default, rename = "GNP")]
    pub gnp: Option<f64>,
    #[serde(default, rename = "GNPOld")]
    pub gnp_old: Option<f64>,
    #[serde(default)]
    pub local_name: Option<String>,
    #[serde(default)]
    pub government_form: Option<String>,
    #[serde(default)]
    pub head_of_state: Option<String>,
    #[serde(default)]
    pub capital: Option<i64>,
    #[serde(default)]
    pub code2: Option<String>,
}

impl CountryPatch {
    /// Merge the patch into an existing record. Only fields present in the
    /// payload are written; everything else keeps its prior value.
    pub fn apply(&self, country: &mut Country) {
        if let Some(v) = &self.name {
            country.name = v.clone();
        }
        if let Some(v) = &self.continent {
            country.continent = v.clone();
        }
        if let Some(v) = &self.region {
            country.region = v.clone();
        }
        if let Some(v) = self.surface_area {
            country.surface_area = v;
        }
        if let Some(v) = self.indep_year {
            country.indep_year = Some(v);
        }
        if let Some(v) = self.population {
            country.population = v;
        }
        if let Some(v) = self.life_expectancy {
            country.life_expectancy = Some(v);
        }
        if let Some(v) = self.gnp {
            country.gnp = Some(v);
        }
        if let Some(v) = self.gnp_old {
            country.gnp_old = Some(v);
        }
        if let Some(v) = &self.local_name {
            country.local_name = v.clone();
        }
        if let Some(v) = &self.government_form {
            country.government_form = v.clone();
        }
        if let Some(v) = &self.head_of_state {
            country.head_of_state = Some(v.clone());
        }
        if let Some(v) = self.capital {
            country.capital = Some(v);
        }
        if let Some(v) = &self.code2 {
            country.code2 = v.clone();
        }
    }

    /// True when the payload carried no fields at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.continent.is_none()
            && self.region.is_none()
            && self.surface_area.is_none()
            && self.indep_year.is_none()
            && self.population.is_none()
            && self.life_expectancy.is_none()
            && self.gnp.is_none()
            && self.gnp_old.is_none()
            && self.local_name.is_none()
            && self.government_form.is_none()
            && self.head_of_state.is_none()
            && self.capital.is_none()
            && self.code2.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn sample() -> Country {
        Country {
            code: "XYZ".to_string(),
            name: "Testland".to_string(),
            continent: "Europe".to_string(),
            region: "Nowhere".to_string(),
            surface_area: 1000.5,
            indep_year: Some(1991),
            population: 5_000_000,
            life_expectancy: Some(78.2),
            gnp: Some(12345.0),
            gnp_old: None,
            local_name: "Testland".to_string(),
            government_form: "Republic".to_string(),
            head_of_state: Some("A. Person".to_string()),
            capital: None,
            code2: "XY".to_string(),
        }
    }

    #[test]
    fn test_wire_field_names_are_pascal_case() {
        let v = serde_json::to_value(sample()).unwrap();
        assert!(v.get("Code").is_some());
        assert!(v.get("SurfaceArea").is_some());
        assert!(v.get("GNP").is_some());
        assert!(v.get("GNPOld").is_some());
        assert!(v.get("HeadOfState").is_some());
        assert!(v.get("Code2").is_some());
    }

    #[test]
    fn test_create_body_may_omit_optional_fields() {
        let body = json!({
            "Code": "ABC",
            "Name": "Minimal",
            "Continent": "Asia",
            "Region": "Somewhere",
            "SurfaceArea": 1.0,
            "Population": 10,
            "LocalName": "Minimal",
            "GovernmentForm": "Monarchy",
            "Code2": "AB"
        });
        let c: Country = serde_json::from_value(body).unwrap();
        assert_eq!(c.indep_year, None);
        assert_eq!(c.gnp, None);
        assert_eq!(c.capital, None);
    }

    #[test]
    fn test_patch_rejects_key_column() {
        let body = json!({"Code": "ZZZ", "Name": "Renamed"});
        let result: Result<CountryPatch, _> = serde_json::from_value(body);
        assert!(result.is_err());
    }

    #[test]
    fn test_patch_merges_only_present_fields() {
        let mut c = sample();
        let patch: CountryPatch =
            serde_json::from_value(json!({"Population": 42, "HeadOfState": "B. Person"})).unwrap();
        patch.apply(&mut c);
        assert_eq!(c.population, 42);
        assert_eq!(c.head_of_state.as_deref(), Some("B. Person"));
        assert_eq!(c.name, "Testland");
        assert_eq!(c.life_expectancy, Some(78.2));
    }

    #[test]
    fn test_empty_patch_is_empty() {
        let patch: CountryPatch = serde_json::from_value(json!({})).unwrap();
        assert!(patch.is_empty());
        assert!(!CountryPatch { population: Some(1), ..Default::default() }.is_empty());
    }
}
