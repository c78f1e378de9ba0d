//! List query parameters.

use serde::Deserialize;

use crate::repo::Page;

/// Default page size when `limit` is absent.
pub const DEFAULT_LIMIT: usize = 20;

/// Hard ceiling on a single page. A larger `limit` is clamped, not rejected,
/// so a greedy client still gets data without the server materializing an
/// unbounded result set.
pub const MAX_LIMIT: usize = 1000;

/// Raw `skip`/`limit` query parameters of the list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub skip: usize,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl ListParams {
    /// Resolves defaults and the clamp into a concrete page.
    pub fn page(&self) -> Page {
        Page {
            offset: self.skip,
            limit: self.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT),
        }
    }
}
