//! Country repository.
//!
//! Country codes are stored with the caller's casing but every keyed lookup
//! (get, update, delete) uppercases the path parameter first, matching the
//! original service's behavior.

use crate::model::{Country, CountryPatch};
use crate::storage::{CascadeOutcome, Store};

use super::errors::{RepoError, RepoResult};
use super::Page;

/// Repository for the country table. Constructed per request; holds no state
/// beyond the store handle.
pub struct CountryRepository<'a> {
    store: &'a Store,
}

impl<'a> CountryRepository<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Creates a country. Fails with `Conflict` if the code is taken.
    /// The code is stored exactly as given.
    pub fn create(&self, country: Country) -> RepoResult<Country> {
        let mut txn = self.store.write()?;
        if txn.get_country(&country.code).is_some() {
            return Err(RepoError::conflict(format!(
                "country code '{}' already exists",
                country.code
            )));
        }
        Ok(txn.insert_country(country)?)
    }

    /// Case-insensitive lookup by code.
    pub fn get(&self, code: &str) -> RepoResult<Country> {
        let code = code.to_uppercase();
        self.store
            .read()?
            .get_country(&code)
            .ok_or_else(|| RepoError::not_found(format!("country '{}' not found", code)))
    }

    /// Returns one page in table iteration order. No total count.
    pub fn list(&self, page: Page) -> RepoResult<Vec<Country>> {
        Ok(self.store.read()?.list_countries(page.offset, page.limit))
    }

    /// Partial update. Fields absent from the patch keep their prior value.
    pub fn update(&self, code: &str, patch: &CountryPatch) -> RepoResult<Country> {
        let code = code.to_uppercase();
        let mut txn = self.store.write()?;
        let mut country = txn
            .get_country(&code)
            .ok_or_else(|| RepoError::not_found(format!("country '{}' not found", code)))?;
        patch.apply(&mut country);
        Ok(txn.replace_country(country)?)
    }

    /// Deletes the country and cascades to its cities and languages in one
    /// store transaction.
    pub fn delete(&self, code: &str) -> RepoResult<CascadeOutcome> {
        let code = code.to_uppercase();
        let mut txn = self.store.write()?;
        if txn.get_country(&code).is_none() {
            return Err(RepoError::not_found(format!("country '{}' not found", code)));
        }
        Ok(txn.delete_country(&code)?)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{new_store, sample_country};
    use super::*;

    #[test]
    fn test_get_is_case_insensitive() {
        let (_tmp, store) = new_store();
        let repo = CountryRepository::new(&store);
        repo.create(sample_country("XYZ")).unwrap();

        for lookup in ["XYZ", "xyz", "xYz"] {
            let found = repo.get(lookup).unwrap();
            assert_eq!(found.code, "XYZ");
        }
    }

    #[test]
    fn test_create_conflict_on_existing_code() {
        let (_tmp, store) = new_store();
        let repo = CountryRepository::new(&store);
        repo.create(sample_country("XYZ")).unwrap();

        let err = repo.create(sample_country("XYZ")).unwrap_err();
        assert!(matches!(err, RepoError::Conflict(_)));
    }

    #[test]
    fn test_update_merges_partial_payload() {
        let (_tmp, store) = new_store();
        let repo = CountryRepository::new(&store);
        let original = repo.create(sample_country("XYZ")).unwrap();

        let patch: CountryPatch =
            serde_json::from_value(serde_json::json!({"Population": 99})).unwrap();
        let updated = repo.update("xyz", &patch).unwrap();

        assert_eq!(updated.population, 99);
        assert_eq!(updated.name, original.name);
        assert_eq!(updated.surface_area, original.surface_area);
    }

    #[test]
    fn test_update_missing_country_not_found() {
        let (_tmp, store) = new_store();
        let repo = CountryRepository::new(&store);
        let err = repo.update("ZZZ", &CountryPatch::default()).unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[test]
    fn test_list_pages_are_disjoint() {
        let (_tmp, store) = new_store();
        let repo = CountryRepository::new(&store);
        for code in ["AAA", "BBB", "CCC", "DDD"] {
            repo.create(sample_country(code)).unwrap();
        }

        let first = repo.list(Page { offset: 0, limit: 2 }).unwrap();
        let second = repo.list(Page { offset: 2, limit: 2 }).unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
        for c in &first {
            assert!(!second.iter().any(|d| d.code == c.code));
        }
    }
}
