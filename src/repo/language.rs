//! Country-language repository.
//!
//! Rows are keyed by the composite (CountryCode, Language). The country code
//! half of keyed lookups is uppercased like the country repository's; the
//! language name is matched exactly as given.

use crate::model::{CountryLanguage, LanguagePatch};
use crate::storage::Store;

use super::errors::{RepoError, RepoResult};
use super::Page;

/// Repository for the countrylanguage table.
pub struct LanguageRepository<'a> {
    store: &'a Store,
}

impl<'a> LanguageRepository<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Creates a language row. The referenced country must exist (the same
    /// pre-write check the city repository runs) and the composite key must
    /// be free.
    pub fn create(&self, language: CountryLanguage) -> RepoResult<CountryLanguage> {
        let mut txn = self.store.write()?;
        if !txn.country_exists(&language.country_code) {
            return Err(RepoError::UnprocessableReference(language.country_code));
        }
        if txn
            .get_language(&language.country_code, &language.language)
            .is_some()
        {
            return Err(RepoError::conflict(format!(
                "language '{}' already exists for country '{}'",
                language.language, language.country_code
            )));
        }
        Ok(txn.insert_language(language)?)
    }

    /// Exact composite lookup; the country code is uppercased first.
    pub fn get(&self, country_code: &str, language: &str) -> RepoResult<CountryLanguage> {
        let country_code = country_code.to_uppercase();
        self.store
            .read()?
            .get_language(&country_code, language)
            .ok_or_else(|| {
                RepoError::not_found(format!(
                    "language record ('{}', '{}') not found",
                    country_code, language
                ))
            })
    }

    pub fn list(&self, page: Page) -> RepoResult<Vec<CountryLanguage>> {
        Ok(self.store.read()?.list_languages(page.offset, page.limit))
    }

    /// Partial update of the non-key columns. The patch type cannot carry
    /// key fields, so the composite key is immutable here by construction.
    pub fn update(
        &self,
        country_code: &str,
        language: &str,
        patch: &LanguagePatch,
    ) -> RepoResult<CountryLanguage> {
        let country_code = country_code.to_uppercase();
        let mut txn = self.store.write()?;
        let mut row = txn.get_language(&country_code, language).ok_or_else(|| {
            RepoError::not_found(format!(
                "language record ('{}', '{}') not found",
                country_code, language
            ))
        })?;
        patch.apply(&mut row);
        Ok(txn.replace_language(row)?)
    }

    pub fn delete(&self, country_code: &str, language: &str) -> RepoResult<()> {
        let country_code = country_code.to_uppercase();
        let mut txn = self.store.write()?;
        if txn.get_language(&country_code, language).is_none() {
            return Err(RepoError::not_found(format!(
                "language record ('{}', '{}') not found",
                country_code, language
            )));
        }
        Ok(txn.delete_language(&country_code, language)?)
    }
}
