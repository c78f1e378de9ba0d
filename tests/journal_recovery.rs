//! Journal durability and recovery tests.
//!
//! - replaying the journal after a reopen reproduces the tables exactly
//! - the city id sequence never moves backwards, even across restarts
//! - a corrupted record halts startup; a torn tail record does not

use std::fs::{self, OpenOptions};

use serde_json::json;
use tempfile::TempDir;

use atlasd::model::{Country, CountryLanguage, NewCity};
use atlasd::repo::{CityRepository, CountryRepository, LanguageRepository, Page};
use atlasd::storage::Store;

// =============================================================================
// Helper Functions
// =============================================================================

fn country(code: &str) -> Country {
    serde_json::from_value(json!({
        "Code": code,
        "Name": format!("Country {}", code),
        "Continent": "Europe",
        "Region": "Test Region",
        "SurfaceArea": 1000.0,
        "Population": 1_000_000,
        "LocalName": format!("Country {}", code),
        "GovernmentForm": "Republic",
        "Code2": &code[..2]
    }))
    .unwrap()
}

fn city(code: &str) -> NewCity {
    serde_json::from_value(json!({
        "Name": "Testville",
        "CountryCode": code,
        "District": "Central",
        "Population": 500
    }))
    .unwrap()
}

fn language(code: &str, name: &str) -> CountryLanguage {
    CountryLanguage {
        country_code: code.to_string(),
        language: name.to_string(),
        is_official: "T".to_string(),
        percentage: 75.0,
    }
}

// =============================================================================
// Replay
// =============================================================================

/// A reopened store sees exactly the rows that were acknowledged.
#[test]
fn test_reopen_reproduces_tables() {
    let tmp = TempDir::new().unwrap();
    {
        let store = Store::open(tmp.path()).unwrap();
        CountryRepository::new(&store).create(country("XYZ")).unwrap();
        CityRepository::new(&store).create(city("XYZ")).unwrap();
        LanguageRepository::new(&store)
            .create(language("XYZ", "Testish"))
            .unwrap();
    }

    let store = Store::open(tmp.path()).unwrap();
    assert_eq!(store.row_counts().unwrap(), (1, 1, 1));

    let fetched = CountryRepository::new(&store).get("xyz").unwrap();
    assert_eq!(fetched.code, "XYZ");
    let fetched = CityRepository::new(&store).get(1).unwrap();
    assert_eq!(fetched.country_code, "XYZ");
}

/// Updates and deletes replay too, including the cascade.
#[test]
fn test_reopen_after_cascade_delete() {
    let tmp = TempDir::new().unwrap();
    {
        let store = Store::open(tmp.path()).unwrap();
        CountryRepository::new(&store).create(country("XYZ")).unwrap();
        CountryRepository::new(&store).create(country("ABC")).unwrap();
        CityRepository::new(&store).create(city("XYZ")).unwrap();
        CityRepository::new(&store).create(city("ABC")).unwrap();
        LanguageRepository::new(&store)
            .create(language("XYZ", "Testish"))
            .unwrap();
        CountryRepository::new(&store).delete("XYZ").unwrap();
    }

    let store = Store::open(tmp.path()).unwrap();
    assert_eq!(store.row_counts().unwrap(), (1, 1, 0));
    assert!(CountryRepository::new(&store).get("XYZ").is_err());
    assert_eq!(
        CityRepository::new(&store)
            .list(Page::default())
            .unwrap()
            .len(),
        1
    );
}

/// Ids assigned before a restart are never reassigned after it.
#[test]
fn test_city_ids_monotonic_across_restart() {
    let tmp = TempDir::new().unwrap();
    {
        let store = Store::open(tmp.path()).unwrap();
        CountryRepository::new(&store).create(country("XYZ")).unwrap();
        let repo = CityRepository::new(&store);
        repo.create(city("XYZ")).unwrap();
        let second = repo.create(city("XYZ")).unwrap();
        repo.delete(second.id).unwrap();
    }

    let store = Store::open(tmp.path()).unwrap();
    let third = CityRepository::new(&store).create(city("XYZ")).unwrap();
    assert_eq!(third.id, 3);
}

// =============================================================================
// Corruption & Torn Writes
// =============================================================================

/// A flipped byte in a committed record is fatal at startup.
#[test]
fn test_corrupted_journal_fails_open() {
    let tmp = TempDir::new().unwrap();
    {
        let store = Store::open(tmp.path()).unwrap();
        CountryRepository::new(&store).create(country("XYZ")).unwrap();
    }

    let path = tmp.path().join("journal.dat");
    let mut bytes = fs::read(&path).unwrap();
    let mid = bytes.len() / 2;
    bytes[mid] ^= 0xFF;
    fs::write(&path, bytes).unwrap();

    let err = Store::open(tmp.path()).unwrap_err();
    assert!(err.is_fatal());
}

/// A half-written tail record (crash mid-append) is trimmed, and the store
/// keeps working afterwards.
#[test]
fn test_torn_tail_is_trimmed_on_open() {
    let tmp = TempDir::new().unwrap();
    {
        let store = Store::open(tmp.path()).unwrap();
        let repo = CountryRepository::new(&store);
        repo.create(country("XYZ")).unwrap();
        repo.create(country("ABC")).unwrap();
    }

    let path = tmp.path().join("journal.dat");
    let len = fs::metadata(&path).unwrap().len();
    let file = OpenOptions::new().write(true).open(&path).unwrap();
    file.set_len(len - 5).unwrap();
    drop(file);

    let store = Store::open(tmp.path()).unwrap();
    // The torn second record is gone, the first survived.
    assert_eq!(store.row_counts().unwrap(), (1, 0, 0));
    assert!(CountryRepository::new(&store).get("XYZ").is_ok());

    // New writes land cleanly on the trimmed journal.
    CountryRepository::new(&store).create(country("DEF")).unwrap();
    drop(store);
    let store = Store::open(tmp.path()).unwrap();
    assert_eq!(store.row_counts().unwrap(), (2, 0, 0));
}
