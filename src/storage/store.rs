//! Durable relational store for the three world tables.
//!
//! Tables live in memory behind a single `RwLock` and are made durable by the
//! journal: a mutation is checked against constraints, appended (fsync), and
//! only then applied, so an acknowledged write is always on disk. `open`
//! replays the journal through the same apply path, which makes recovery
//! deterministic.
//!
//! The store is the authoritative enforcement point for the schema's
//! constraints: Country.Code uniqueness, the (CountryCode, Language)
//! composite key, and the City/CountryLanguage foreign keys. Repositories
//! pre-check the same conditions for friendlier errors; a violation that
//! reaches the store is reported as a constraint error and surfaces to the
//! client as a generic internal failure.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::errors::{StorageError, StorageResult};
use super::journal::{JournalEntry, JournalReader, JournalWriter};
use crate::model::{City, Country, CountryLanguage, NewCity};

/// Children removed by a cascading country delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeOutcome {
    pub cities_removed: usize,
    pub languages_removed: usize,
}

/// The three tables plus the city id sequence.
///
/// `next_city_id` only moves forward: it tracks one past the highest id ever
/// journalled, so ids are never reused even after deletes or restarts.
#[derive(Debug)]
struct Tables {
    countries: BTreeMap<String, Country>,
    cities: BTreeMap<i64, City>,
    languages: BTreeMap<(String, String), CountryLanguage>,
    next_city_id: i64,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            countries: BTreeMap::new(),
            cities: BTreeMap::new(),
            languages: BTreeMap::new(),
            next_city_id: 1,
        }
    }
}

impl Tables {
    /// Applies one journal entry. Shared by live writes and startup replay;
    /// constraint checks happen before an entry is journalled, never here.
    fn apply(&mut self, entry: &JournalEntry) {
        match entry {
            JournalEntry::InsertCountry { country } | JournalEntry::ReplaceCountry { country } => {
                self.countries.insert(country.code.clone(), country.clone());
            }
            JournalEntry::DeleteCountry { code } => {
                self.countries.remove(code);
                self.cities.retain(|_, city| city.country_code != *code);
                self.languages.retain(|(cc, _), _| cc != code);
            }
            JournalEntry::InsertCity { city } => {
                if city.id >= self.next_city_id {
                    self.next_city_id = city.id + 1;
                }
                self.cities.insert(city.id, city.clone());
            }
            JournalEntry::ReplaceCity { city } => {
                self.cities.insert(city.id, city.clone());
            }
            JournalEntry::DeleteCity { id } => {
                self.cities.remove(id);
            }
            JournalEntry::InsertLanguage { language }
            | JournalEntry::ReplaceLanguage { language } => {
                self.languages.insert(language.key(), language.clone());
            }
            JournalEntry::DeleteLanguage {
                country_code,
                language,
            } => {
                self.languages
                    .remove(&(country_code.clone(), language.clone()));
            }
        }
    }

    fn get_country(&self, code: &str) -> Option<&Country> {
        self.countries.get(code)
    }

    fn country_exists(&self, code: &str) -> bool {
        self.countries.contains_key(code)
    }

    fn list_countries(&self, offset: usize, limit: usize) -> Vec<Country> {
        self.countries.values().skip(offset).take(limit).cloned().collect()
    }

    fn get_city(&self, id: i64) -> Option<&City> {
        self.cities.get(&id)
    }

    fn list_cities(&self, offset: usize, limit: usize) -> Vec<City> {
        self.cities.values().skip(offset).take(limit).cloned().collect()
    }

    fn get_language(&self, country_code: &str, language: &str) -> Option<&CountryLanguage> {
        self.languages
            .get(&(country_code.to_string(), language.to_string()))
    }

    fn list_languages(&self, offset: usize, limit: usize) -> Vec<CountryLanguage> {
        self.languages.values().skip(offset).take(limit).cloned().collect()
    }

    fn row_counts(&self) -> (usize, usize, usize) {
        (self.countries.len(), self.cities.len(), self.languages.len())
    }
}

/// The persistence store. One per process, shared behind `Arc`.
#[derive(Debug)]
pub struct Store {
    tables: RwLock<Tables>,
    journal: Mutex<JournalWriter>,
}

impl Store {
    /// Opens the store at `data_dir`, replaying the journal into memory and
    /// trimming any torn tail record left by a crash.
    pub fn open(data_dir: &Path) -> StorageResult<Self> {
        let mut writer = JournalWriter::open(data_dir)?;

        let mut tables = Tables::default();
        let mut reader = JournalReader::open(writer.path())?;
        while let Some(entry) = reader.read_next()? {
            tables.apply(&entry);
        }

        let file_len = fs::metadata(writer.path())
            .map_err(|e| StorageError::io_error("failed to stat journal", e))?
            .len();
        if reader.valid_len() < file_len {
            writer.truncate_to(reader.valid_len())?;
        }

        Ok(Self {
            tables: RwLock::new(tables),
            journal: Mutex::new(writer),
        })
    }

    /// Begins a read transaction for one request.
    pub fn read(&self) -> StorageResult<ReadTxn<'_>> {
        let tables = self
            .tables
            .read()
            .map_err(|_| StorageError::lock_poisoned())?;
        Ok(ReadTxn { tables })
    }

    /// Begins a write transaction for one request. Holds the table write lock
    /// and the journal, so the caller's existence checks and the subsequent
    /// mutation are a single atomic unit.
    pub fn write(&self) -> StorageResult<WriteTxn<'_>> {
        let tables = self
            .tables
            .write()
            .map_err(|_| StorageError::lock_poisoned())?;
        let journal = self
            .journal
            .lock()
            .map_err(|_| StorageError::lock_poisoned())?;
        Ok(WriteTxn { tables, journal })
    }

    /// Current (countries, cities, languages) row counts.
    pub fn row_counts(&self) -> StorageResult<(usize, usize, usize)> {
        Ok(self.read()?.tables.row_counts())
    }
}

/// Read-only view of the tables for the duration of one request.
pub struct ReadTxn<'a> {
    tables: RwLockReadGuard<'a, Tables>,
}

impl ReadTxn<'_> {
    pub fn get_country(&self, code: &str) -> Option<Country> {
        self.tables.get_country(code).cloned()
    }

    pub fn list_countries(&self, offset: usize, limit: usize) -> Vec<Country> {
        self.tables.list_countries(offset, limit)
    }

    pub fn get_city(&self, id: i64) -> Option<City> {
        self.tables.get_city(id).cloned()
    }

    pub fn list_cities(&self, offset: usize, limit: usize) -> Vec<City> {
        self.tables.list_cities(offset, limit)
    }

    pub fn get_language(&self, country_code: &str, language: &str) -> Option<CountryLanguage> {
        self.tables.get_language(country_code, language).cloned()
    }

    pub fn list_languages(&self, offset: usize, limit: usize) -> Vec<CountryLanguage> {
        self.tables.list_languages(offset, limit)
    }
}

/// Exclusive view of the tables for the duration of one request.
///
/// Every mutation follows the same commit order: check constraints, append
/// to the journal, apply in memory. A failed append leaves the tables
/// untouched.
pub struct WriteTxn<'a> {
    tables: RwLockWriteGuard<'a, Tables>,
    journal: MutexGuard<'a, JournalWriter>,
}

impl WriteTxn<'_> {
    pub fn get_country(&self, code: &str) -> Option<Country> {
        self.tables.get_country(code).cloned()
    }

    pub fn country_exists(&self, code: &str) -> bool {
        self.tables.country_exists(code)
    }

    pub fn get_city(&self, id: i64) -> Option<City> {
        self.tables.get_city(id).cloned()
    }

    pub fn get_language(&self, country_code: &str, language: &str) -> Option<CountryLanguage> {
        self.tables.get_language(country_code, language).cloned()
    }

    fn commit(&mut self, entry: JournalEntry) -> StorageResult<()> {
        self.journal.append(&entry)?;
        self.tables.apply(&entry);
        Ok(())
    }

    pub fn insert_country(&mut self, country: Country) -> StorageResult<Country> {
        if self.tables.country_exists(&country.code) {
            return Err(StorageError::duplicate_key("country", &country.code));
        }
        self.commit(JournalEntry::InsertCountry {
            country: country.clone(),
        })?;
        Ok(country)
    }

    pub fn replace_country(&mut self, country: Country) -> StorageResult<Country> {
        if !self.tables.country_exists(&country.code) {
            return Err(StorageError::missing_row("country", &country.code));
        }
        self.commit(JournalEntry::ReplaceCountry {
            country: country.clone(),
        })?;
        Ok(country)
    }

    /// Removes the country and, by cascade, every city and language row
    /// referencing it. One journal entry covers the whole cascade.
    pub fn delete_country(&mut self, code: &str) -> StorageResult<CascadeOutcome> {
        if !self.tables.country_exists(code) {
            return Err(StorageError::missing_row("country", code));
        }
        let cities_removed = self
            .tables
            .cities
            .values()
            .filter(|city| city.country_code == code)
            .count();
        let languages_removed = self
            .tables
            .languages
            .keys()
            .filter(|(cc, _)| cc.as_str() == code)
            .count();

        self.commit(JournalEntry::DeleteCountry {
            code: code.to_string(),
        })?;
        Ok(CascadeOutcome {
            cities_removed,
            languages_removed,
        })
    }

    /// Inserts a city, assigning the next sequential id.
    pub fn insert_city(&mut self, new: NewCity) -> StorageResult<City> {
        if !self.tables.country_exists(&new.country_code) {
            return Err(StorageError::foreign_key_violation("city", &new.country_code));
        }
        let city = new.into_city(self.tables.next_city_id);
        self.commit(JournalEntry::InsertCity { city: city.clone() })?;
        Ok(city)
    }

    pub fn replace_city(&mut self, city: City) -> StorageResult<City> {
        if self.tables.get_city(city.id).is_none() {
            return Err(StorageError::missing_row("city", city.id));
        }
        if !self.tables.country_exists(&city.country_code) {
            return Err(StorageError::foreign_key_violation("city", &city.country_code));
        }
        self.commit(JournalEntry::ReplaceCity { city: city.clone() })?;
        Ok(city)
    }

    pub fn delete_city(&mut self, id: i64) -> StorageResult<()> {
        if self.tables.get_city(id).is_none() {
            return Err(StorageError::missing_row("city", id));
        }
        self.commit(JournalEntry::DeleteCity { id })
    }

    pub fn insert_language(&mut self, language: CountryLanguage) -> StorageResult<CountryLanguage> {
        if self
            .tables
            .get_language(&language.country_code, &language.language)
            .is_some()
        {
            return Err(StorageError::duplicate_key(
                "countrylanguage",
                format!("({}, {})", language.country_code, language.language),
            ));
        }
        if !self.tables.country_exists(&language.country_code) {
            return Err(StorageError::foreign_key_violation(
                "countrylanguage",
                &language.country_code,
            ));
        }
        self.commit(JournalEntry::InsertLanguage {
            language: language.clone(),
        })?;
        Ok(language)
    }

    pub fn replace_language(&mut self, language: CountryLanguage) -> StorageResult<CountryLanguage> {
        if self
            .tables
            .get_language(&language.country_code, &language.language)
            .is_none()
        {
            return Err(StorageError::missing_row(
                "countrylanguage",
                format!("({}, {})", language.country_code, language.language),
            ));
        }
        self.commit(JournalEntry::ReplaceLanguage {
            language: language.clone(),
        })?;
        Ok(language)
    }

    pub fn delete_language(&mut self, country_code: &str, language: &str) -> StorageResult<()> {
        if self.tables.get_language(country_code, language).is_none() {
            return Err(StorageError::missing_row(
                "countrylanguage",
                format!("({}, {})", country_code, language),
            ));
        }
        self.commit(JournalEntry::DeleteLanguage {
            country_code: country_code.to_string(),
            language: language.to_string(),
        })
    }
}
