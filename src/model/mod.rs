//! Entity records and request payloads for the world schema.
//!
//! Three tables: country (user-supplied 3-letter code), city (store-assigned
//! sequential id), countrylanguage (composite key, no surrogate id).
//!
//! Wire field names are PascalCase (`Code`, `CountryCode`, `IsOfficial`, ...).
//! Patch types accept only mutable columns; unknown fields are rejected at
//! deserialization, which is how key immutability is enforced at the edge.

mod city;
mod country;
mod language;

pub use city::{City, CityPatch, NewCity};
pub use country::{Country, CountryPatch};
pub use language::{CountryLanguage, LanguagePatch};
