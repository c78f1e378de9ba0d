//! City record and payloads.

use serde::{Deserialize, Serialize};

/// A city row. The `ID` is assigned by the store on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct City {
    #[serde(rename = "ID")]
    pub id: i64,
    pub name: String,
    /// Required reference to an existing country.
    pub country_code: String,
    pub district: String,
    pub population: i64,
}

/// Create payload: everything except the store-assigned id.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct NewCity {
    pub name: String,
    pub country_code: String,
    pub district: String,
    pub population: i64,
}

impl NewCity {
    /// Build the full row once the store has assigned an id.
    pub fn into_city(self, id: i64) -> City {
        City {
            id,
            name: self.name,
            country_code: self.country_code,
            district: self.district,
            population: self.population,
        }
    }
}

/// Partial update for a city. `ID` is immutable and not accepted.
/// `CountryCode` is accepted but revalidated against an existing country
/// before the write goes through.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct CityPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub population: Option<i64>,
}

impl CityPatch {
    /// Merge the patch into an existing record.
    pub fn apply(&self, city: &mut City) {
        if let Some(v) = &self.name {
            city.name = v.clone();
        }
        if let Some(v) = &self.country_code {
            city.country_code = v.clone();
        }
        if let Some(v) = &self.district {
            city.district = v.clone();
        }
        if let Some(v) = self.population {
            city.population = v;
        }
    }
}
