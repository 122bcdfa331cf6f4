//! Request parameters: raw query strings in, validated structs out.
//!
//! Everything arrives as optional strings and is parsed explicitly so that
//! malformed values surface as validation errors instead of being coerced to
//! defaults. Validation happens before any store execution.

use crate::errors::ApiError;
use crate::query::filter::split_departments;
use crate::query::pagination::PageParams;
use crate::query::sort::SortSpec;
use serde::Deserialize;
use utoipa::IntoParams;

/// Raw `GET /employees` query string.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// 1-indexed page number, default 1.
    pub page: Option<String>,
    /// Page size, default 100.
    pub limit: Option<String>,
}

impl ListParams {
    pub fn validate(&self) -> Result<PageParams, ApiError> {
        PageParams::parse(self.page.as_deref(), self.limit.as_deref())
    }
}

/// Raw `GET /employees/query` query string. Field names follow the endpoint's
/// camelCase wire format.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EmployeeQueryParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    /// Case-insensitive substring matched against first or last name.
    pub search_value: Option<String>,
    pub salary_start: Option<String>,
    pub salary_end: Option<String>,
    pub sort_field: Option<String>,
    /// `ASC` or `DESC`, case-insensitive.
    pub sort_by: Option<String>,
    /// Comma-separated department names.
    pub departments: Option<String>,
    pub age_min: Option<String>,
    pub age_max: Option<String>,
}

/// Validated form of [`EmployeeQueryParams`].
#[derive(Debug, Clone)]
pub struct EmployeeQuery {
    pub page: PageParams,
    pub search_value: Option<String>,
    /// Present only when both bounds were supplied; a single bound leaves
    /// salary unfiltered.
    pub salary_range: Option<(i64, i64)>,
    pub age_min: Option<i64>,
    pub age_max: Option<i64>,
    pub departments: Vec<String>,
    pub sort: Option<SortSpec>,
}

impl EmployeeQueryParams {
    pub fn validate(&self) -> Result<EmployeeQuery, ApiError> {
        let page = PageParams::parse(self.page.as_deref(), self.limit.as_deref())?;
        let sort = SortSpec::resolve(self.sort_field.as_deref(), self.sort_by.as_deref())?;

        let salary_start = parse_int("salaryStart", self.salary_start.as_deref())?;
        let salary_end = parse_int("salaryEnd", self.salary_end.as_deref())?;
        let salary_range = match (salary_start, salary_end) {
            (Some(start), Some(end)) => Some((start, end)),
            // One bound alone does not filter.
            _ => None,
        };

        Ok(EmployeeQuery {
            page,
            search_value: self
                .search_value
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string),
            salary_range,
            age_min: parse_int("ageMin", self.age_min.as_deref())?,
            age_max: parse_int("ageMax", self.age_max.as_deref())?,
            departments: split_departments(self.departments.as_deref()),
            sort,
        })
    }
}

fn parse_int(name: &str, raw: Option<&str>) -> Result<Option<i64>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse::<i64>().map(Some).map_err(|_| {
            ApiError::validation(format!("'{name}' must be an integer, got '{value}'"))
        }),
    }
}
