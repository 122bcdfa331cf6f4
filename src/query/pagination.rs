use crate::errors::ApiError;

/// Default page size, also the divisor for the `/count-employees` page count.
pub const DEFAULT_PAGE_SIZE: u64 = 100;

/// Validated 1-indexed page bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: u64,
    pub limit: u64,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageParams {
    /// Parse raw `page`/`limit` query values. Absent values fall back to the
    /// defaults; present but non-numeric or zero values are rejected rather
    /// than silently coerced.
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Result<Self, ApiError> {
        Ok(Self {
            page: parse_positive("page", page, 1)?,
            limit: parse_positive("limit", limit, DEFAULT_PAGE_SIZE)?,
        })
    }

    #[must_use]
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.limit
    }
}

fn parse_positive(name: &str, raw: Option<&str>, default: u64) -> Result<u64, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value
            .parse::<u64>()
            .ok()
            .filter(|v| *v >= 1)
            .ok_or_else(|| {
                ApiError::validation(format!("'{name}' must be a positive integer, got '{value}'"))
            }),
    }
}
