//! City repository.

use crate::model::{City, CityPatch, NewCity};
use crate::storage::Store;

use super::errors::{RepoError, RepoResult};
use super::Page;

/// Repository for the city table.
pub struct CityRepository<'a> {
    store: &'a Store,
}

impl<'a> CityRepository<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Creates a city. The referenced country must exist at write time; the
    /// existence check and the insert share one write transaction, with the
    /// store's foreign-key constraint behind them.
    pub fn create(&self, new: NewCity) -> RepoResult<City> {
        let mut txn = self.store.write()?;
        if !txn.country_exists(&new.country_code) {
            return Err(RepoError::UnprocessableReference(new.country_code));
        }
        Ok(txn.insert_city(new)?)
    }

    pub fn get(&self, id: i64) -> RepoResult<City> {
        self.store
            .read()?
            .get_city(id)
            .ok_or_else(|| RepoError::not_found(format!("city {} not found", id)))
    }

    pub fn list(&self, page: Page) -> RepoResult<Vec<City>> {
        Ok(self.store.read()?.list_cities(page.offset, page.limit))
    }

    /// Partial update. Reassigning `CountryCode` is allowed, but only to a
    /// country that exists, the same check as on create.
    pub fn update(&self, id: i64, patch: &CityPatch) -> RepoResult<City> {
        let mut txn = self.store.write()?;
        let mut city = txn
            .get_city(id)
            .ok_or_else(|| RepoError::not_found(format!("city {} not found", id)))?;
        if let Some(code) = &patch.country_code {
            if !txn.country_exists(code) {
                return Err(RepoError::UnprocessableReference(code.clone()));
            }
        }
        patch.apply(&mut city);
        Ok(txn.replace_city(city)?)
    }

    /// Unconditional delete; cities have no children.
    pub fn delete(&self, id: i64) -> RepoResult<()> {
        let mut txn = self.store.write()?;
        if txn.get_city(id).is_none() {
            return Err(RepoError::not_found(format!("city {} not found", id)));
        }
        Ok(txn.delete_city(id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{new_store, sample_city, sample_country};
    use super::super::CountryRepository;
    use super::*;

    #[test]
    fn test_create_rejects_unknown_country_and_persists_nothing() {
        let (_tmp, store) = new_store();
        let repo = CityRepository::new(&store);

        let err = repo.create(sample_city("ZZZ")).unwrap_err();
        assert!(matches!(err, RepoError::UnprocessableReference(_)));
        assert_eq!(repo.list(Page::default()).unwrap().len(), 0);
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let (_tmp, store) = new_store();
        CountryRepository::new(&store)
            .create(sample_country("XYZ"))
            .unwrap();
        let repo = CityRepository::new(&store);

        let a = repo.create(sample_city("XYZ")).unwrap();
        let b = repo.create(sample_city("XYZ")).unwrap();
        assert_eq!(b.id, a.id + 1);
    }

    #[test]
    fn test_update_validates_reassigned_country_code() {
        let (_tmp, store) = new_store();
        CountryRepository::new(&store)
            .create(sample_country("XYZ"))
            .unwrap();
        let repo = CityRepository::new(&store);
        let city = repo.create(sample_city("XYZ")).unwrap();

        let patch: CityPatch =
            serde_json::from_value(serde_json::json!({"CountryCode": "ZZZ"})).unwrap();
        let err = repo.update(city.id, &patch).unwrap_err();
        assert!(matches!(err, RepoError::UnprocessableReference(_)));

        // The failed update must not have touched the row.
        assert_eq!(repo.get(city.id).unwrap().country_code, "XYZ");
    }

    #[test]
    fn test_update_merges_partial_payload() {
        let (_tmp, store) = new_store();
        CountryRepository::new(&store)
            .create(sample_country("XYZ"))
            .unwrap();
        let repo = CityRepository::new(&store);
        let city = repo.create(sample_city("XYZ")).unwrap();

        let patch: CityPatch =
            serde_json::from_value(serde_json::json!({"Population": 12345})).unwrap();
        let updated = repo.update(city.id, &patch).unwrap();
        assert_eq!(updated.population, 12345);
        assert_eq!(updated.name, city.name);
        assert_eq!(updated.district, city.district);
    }

    #[test]
    fn test_delete_missing_city_not_found() {
        let (_tmp, store) = new_store();
        let repo = CityRepository::new(&store);
        let err = repo.delete(404).unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }
}
