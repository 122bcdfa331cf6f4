//! Route wiring. Handlers stay thin: extract, validate, delegate to
//! [`crate::ops`], tag errors with the endpoint for log context and wrap the
//! result in JSON.

use crate::errors::ApiError;
use crate::models::employee;
use crate::ops;
use crate::params::{EmployeeQueryParams, ListParams};
use crate::views::{
    DepartmentNameView, EmployeeQueryResponse, EmployeeView, ManagerView, SalaryView, TitleView,
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use sea_orm::DatabaseConnection;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the full application router over a shared pooled connection.
pub fn router(db: DatabaseConnection) -> Router {
    Router::new()
        .route("/department", get(list_current_managers))
        .route("/department/{dept}", get(list_department_managers))
        .route("/count-employees", get(count_employee_pages))
        .route("/employees", get(list_employees))
        .route("/employees/query", get(query_employees))
        .route("/employees/employee/info/{employeenum}", get(employee_info))
        .route(
            "/employees/employee/salary/{employeenum}",
            get(employee_salaries),
        )
        .route(
            "/employees/employee/titles/{employeenum}",
            get(employee_titles),
        )
        .route("/get-departments", get(list_department_names))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

async fn list_current_managers(
    State(db): State<DatabaseConnection>,
) -> Result<Json<Vec<ManagerView>>, ApiError> {
    ops::departments::current_managers(&db)
        .await
        .map(Json)
        .map_err(|err| err.with_endpoint("GET /department"))
}

async fn list_department_managers(
    State(db): State<DatabaseConnection>,
    Path(dept): Path<String>,
) -> Result<Json<Vec<ManagerView>>, ApiError> {
    ops::departments::managers_for(&dept, &db)
        .await
        .map(Json)
        .map_err(|err| err.with_endpoint("GET /department/{dept}"))
}

async fn count_employee_pages(
    State(db): State<DatabaseConnection>,
) -> Result<Json<u64>, ApiError> {
    ops::employees::page_count(&db)
        .await
        .map(Json)
        .map_err(|err| err.with_endpoint("GET /count-employees"))
}

async fn list_employees(
    State(db): State<DatabaseConnection>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<EmployeeView>>, ApiError> {
    let page = params.validate()?;
    ops::employees::list(page, &db)
        .await
        .map(Json)
        .map_err(|err| err.with_endpoint("GET /employees"))
}

async fn query_employees(
    State(db): State<DatabaseConnection>,
    Query(params): Query<EmployeeQueryParams>,
) -> Result<Json<EmployeeQueryResponse>, ApiError> {
    let query = params.validate()?;
    ops::employees::query(&query, &db)
        .await
        .map(Json)
        .map_err(|err| err.with_endpoint("GET /employees/query"))
}

async fn employee_info(
    State(db): State<DatabaseConnection>,
    Path(employeenum): Path<i32>,
) -> Result<Json<Vec<employee::Model>>, ApiError> {
    ops::employees::info(employeenum, &db)
        .await
        .map(Json)
        .map_err(|err| err.with_endpoint("GET /employees/employee/info"))
}

async fn employee_salaries(
    State(db): State<DatabaseConnection>,
    Path(employeenum): Path<i32>,
) -> Result<Json<Vec<SalaryView>>, ApiError> {
    ops::employees::salary_history(employeenum, &db)
        .await
        .map(Json)
        .map_err(|err| err.with_endpoint("GET /employees/employee/salary"))
}

async fn employee_titles(
    State(db): State<DatabaseConnection>,
    Path(employeenum): Path<i32>,
) -> Result<Json<Vec<TitleView>>, ApiError> {
    ops::employees::title_history(employeenum, &db)
        .await
        .map(Json)
        .map_err(|err| err.with_endpoint("GET /employees/employee/titles"))
}

async fn list_department_names(
    State(db): State<DatabaseConnection>,
) -> Result<Json<Vec<DepartmentNameView>>, ApiError> {
    ops::departments::names(&db)
        .await
        .map(Json)
        .map_err(|err| err.with_endpoint("GET /get-departments"))
}
