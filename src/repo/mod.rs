//! Entity repositories.
//!
//! One repository per table, constructed per request over a shared store
//! handle. Repositories own the pre-write referential-integrity checks and
//! the partial-update merge; structural validation has already happened by
//! the time a payload gets here, and the store's constraints back up every
//! pre-check.

mod city;
mod country;
mod errors;
mod language;

pub use city::CityRepository;
pub use country::CountryRepository;
pub use errors::{RepoError, RepoResult};
pub use language::LanguageRepository;

/// One page of a list request, already clamped by the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: usize,
    pub limit: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 20,
        }
    }
}
