//! Response shapes. Field names stay snake_case like the underlying columns;
//! the query envelope's `totalCount` is the one camelCase exception in the
//! wire format.

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TitleView {
    pub title: String,
    pub from_date: NaiveDate,
    pub to_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SalaryView {
    pub salary: i32,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

/// One employee with its nested collections and current department name.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EmployeeView {
    pub emp_no: i32,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    pub titles: Vec<TitleView>,
    pub salaries: Vec<SalaryView>,
    pub department: Option<String>,
}

/// Envelope for `GET /employees/query`.
#[derive(Debug, Serialize, ToSchema)]
pub struct EmployeeQueryResponse {
    pub data: Vec<EmployeeView>,
    #[serde(rename = "totalCount")]
    pub total_count: u64,
}

/// A department's manager row, joined with employee and department names.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ManagerView {
    pub dept_no: String,
    pub dept_name: String,
    pub first_name: String,
    pub last_name: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DepartmentNameView {
    pub dept_name: String,
}
